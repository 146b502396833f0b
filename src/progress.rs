// Copyright 2026 shodan-harvest Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run event types and broadcast channel for per-task reporting.
//!
//! The scheduler and retry layer emit `RunEvent`s, which flow through a
//! `tokio::sync::broadcast` channel to the console printer (and any other
//! subscriber). When no subscriber exists, events are silently dropped,
//! which keeps the core free of presentation concerns.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// An event emitted during a harvest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    /// Monotonically increasing sequence number.
    pub seq: u64,
    /// The kind of run event.
    pub event: RunEventKind,
}

/// The specific kind of run event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunEventKind {
    /// A facet task began its first fetch attempt.
    TaskStarted { facet: String },
    /// An attempt came back without a 200; the task waits and retries.
    TaskRetrying {
        facet: String,
        status: u16,
        attempt: u32,
        delay_ms: u64,
    },
    /// A task resolved with extracted values.
    TaskSucceeded { facet: String, values: usize },
    /// A task resolved without an artifact.
    TaskFailed { facet: String, reason: String },
    /// A task's artifact was written.
    TaskSaved { facet: String, path: String },
    /// All batches finished.
    RunCompleted {
        succeeded: usize,
        failed: usize,
        elapsed_ms: u64,
    },
}

/// Sender handle for emitting run events.
pub type ProgressSender = tokio::sync::broadcast::Sender<RunEvent>;

/// Receiver handle for consuming run events.
pub type ProgressReceiver = tokio::sync::broadcast::Receiver<RunEvent>;

/// Create a new run event channel with a bounded buffer.
///
/// A worst-case run over the static facet list emits up to six events per
/// task (start, three retry notices, resolution, saved) plus the completion
/// event — under 500 in total — so 1024 holds a full run even when the
/// subscriber drains late.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::broadcast::channel(1024)
}

/// Emitter handle shared by the orchestrator, scheduler, and retry layer.
///
/// Constructed without a sender, every `emit` is a no-op; with one, events
/// are sequenced and broadcast, and send errors (no receivers) are ignored.
pub struct Progress {
    tx: Option<ProgressSender>,
    seq: AtomicU64,
}

impl Progress {
    pub fn new(tx: Option<ProgressSender>) -> Self {
        Self {
            tx,
            seq: AtomicU64::new(0),
        }
    }

    /// An emitter that drops everything.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Emit an event, silently ignoring send errors.
    pub fn emit(&self, event: RunEventKind) {
        if let Some(ref sender) = self.tx {
            let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
            let _ = sender.send(RunEvent { seq, event });
        }
    }
}
