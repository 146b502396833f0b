// Copyright 2026 shodan-harvest Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod cli;
mod facets;
mod fetch;
mod progress;
mod retry;
mod runner;
mod sink;

#[derive(Parser)]
#[command(
    name = "shodan-harvest",
    about = "Batched facet scraper for Shodan's web search",
    version,
    after_help = "Run 'shodan-harvest <command> --help' for details on each command.\nExample: shodan-harvest run \"bmw.com\""
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest every facet category for a search query
    Run {
        /// Search query (e.g. "bmw.com")
        query: String,
        /// Number of facet tasks fetched concurrently
        #[arg(long, default_value_t = runner::DEFAULT_CONCURRENCY)]
        concurrency: usize,
        /// Delay between retry attempts in milliseconds
        #[arg(long = "retry-delay", default_value_t = runner::DEFAULT_RETRY_DELAY_MS)]
        retry_delay: u64,
        /// Page navigation timeout in milliseconds
        #[arg(long, default_value = "30000")]
        timeout: u64,
        /// Directory the per-facet artifacts are written to
        #[arg(long, default_value = "output")]
        output: PathBuf,
        /// Restrict the run to specific facet categories (repeatable)
        #[arg(long = "facet")]
        facets: Vec<String>,
    },
    /// List the facet categories harvested per run
    Facets,
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("SHODAN_HARVEST_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("SHODAN_HARVEST_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("SHODAN_HARVEST_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("SHODAN_HARVEST_NO_COLOR", "1");
    }

    let result = match cli.command {
        Commands::Run {
            query,
            concurrency,
            retry_delay,
            timeout,
            output,
            facets,
        } => {
            cli::run_cmd::run(cli::run_cmd::RunArgs {
                query,
                concurrency,
                retry_delay_ms: retry_delay,
                nav_timeout_ms: timeout,
                output,
                only: facets,
            })
            .await
        }
        Commands::Facets => cli::facets_cmd::run().await,
        Commands::Doctor => cli::doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "shodan-harvest", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
