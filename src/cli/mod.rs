//! CLI subcommand implementations for the shodan-harvest binary.

pub mod doctor;
pub mod facets_cmd;
pub mod output;
pub mod run_cmd;
