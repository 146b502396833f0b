// Copyright 2026 shodan-harvest Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shodan facet harvester — batched concurrent scraping of Shodan's
//! search facet pages through headless Chromium.
//!
//! This library crate exposes the core modules for integration testing.

pub mod cli;
pub mod facets;
pub mod fetch;
pub mod progress;
pub mod retry;
pub mod runner;
pub mod sink;
