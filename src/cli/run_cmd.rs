//! `shodan-harvest run <query>` — harvest every facet category.

use crate::cli::output::{self, Styled};
use crate::facets;
use crate::fetch::chromium::ChromiumClient;
use crate::progress::{self, Progress, ProgressReceiver, RunEventKind};
use crate::runner::{self, RunConfig};
use crate::sink::OutputSink;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

/// Arguments of the run subcommand, parsed in `main`.
pub struct RunArgs {
    pub query: String,
    pub concurrency: usize,
    pub retry_delay_ms: u64,
    pub nav_timeout_ms: u64,
    pub output: PathBuf,
    pub only: Vec<String>,
}

/// Run the harvest end to end: validate, launch Chromium, schedule all
/// facet batches, close the browser once the final batch is done.
///
/// Individual task failures never fail the command; the artifacts present
/// under the output directory are the run's result.
pub async fn run(args: RunArgs) -> Result<()> {
    let s = Styled::new();

    let config = RunConfig {
        query: args.query,
        concurrency: args.concurrency,
        retry_delay: Duration::from_millis(args.retry_delay_ms),
    };
    // Fail fast, before any browser or network activity
    config.validate()?;
    let selected = select_facets(&args.only)?;

    init_tracing();

    let sink = OutputSink::new(&args.output);
    sink.ensure_dir()?;

    let client = ChromiumClient::launch(args.nav_timeout_ms).await?;

    if !output::is_quiet() && !output::is_json() {
        eprintln!();
        eprintln!(
            "  {} shodan-harvest v{} — {} categories, {} at a time",
            s.blue("»"),
            env!("CARGO_PKG_VERSION"),
            selected.len(),
            config.concurrency
        );
        eprintln!();
    }

    // The printer task drains run events to the console while batches run
    let (tx, rx) = progress::channel();
    let printer = tokio::spawn(print_events(rx));

    let progress = Progress::new(Some(tx));
    let summary = runner::run(&client, &sink, &selected, &config, &progress).await;

    // Dropping the emitter closes the channel so the printer drains and exits
    drop(progress);
    let _ = printer.await;

    client.shutdown().await?;
    let summary = summary?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "query": config.query,
            "succeeded": summary.succeeded,
            "failed": summary.failed,
            "output": args.output.display().to_string(),
        }));
    } else if !output::is_quiet() {
        eprintln!();
        eprintln!(
            "  {} all batches complete: {} artifacts saved, {} failed",
            s.ok_sym(),
            summary.succeeded,
            summary.failed
        );
    }

    Ok(())
}

/// Resolve the facet list, honoring `--facet` filters.
fn select_facets(only: &[String]) -> Result<Vec<&'static str>> {
    if only.is_empty() {
        return Ok(facets::FACETS.to_vec());
    }
    for name in only {
        if !facets::is_known(name) {
            bail!("unknown facet category: {name} (see `shodan-harvest facets`)");
        }
    }
    Ok(facets::FACETS
        .iter()
        .copied()
        .filter(|f| only.iter().any(|o| o == f))
        .collect())
}

fn init_tracing() {
    let directive = if std::env::var("SHODAN_HARVEST_VERBOSE").is_ok() {
        "shodan_harvest=debug"
    } else {
        "shodan_harvest=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn print_events(mut rx: ProgressReceiver) {
    let s = Styled::new();
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        };

        if output::is_json() {
            output::print_json(&event);
            continue;
        }
        if output::is_quiet() {
            continue;
        }

        match event.event {
            RunEventKind::TaskStarted { .. } => {}
            RunEventKind::TaskRetrying {
                facet,
                status,
                delay_ms,
                ..
            } => eprintln!(
                "  {} rate limit on {} (status {status}), retrying in {}s",
                s.warn_sym(),
                s.cyan(&facet),
                delay_ms / 1000
            ),
            RunEventKind::TaskSucceeded { facet, values } => eprintln!(
                "  {} retrieved {values} values for {}",
                s.ok_sym(),
                s.cyan(&facet)
            ),
            RunEventKind::TaskFailed { facet, reason } => eprintln!(
                "  {} {}: {}",
                s.fail_sym(),
                s.cyan(&facet),
                s.red(&reason)
            ),
            RunEventKind::TaskSaved { facet, path } => eprintln!(
                "  {} {} saved to {}",
                s.green("💾"),
                s.cyan(&facet),
                s.underline(&path)
            ),
            RunEventKind::RunCompleted { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_facets_defaults_to_full_list() {
        let selected = select_facets(&[]).unwrap();
        assert_eq!(selected, facets::FACETS.to_vec());
    }

    #[test]
    fn test_select_facets_filters_and_keeps_order() {
        let only = vec!["ip".to_string(), "country".to_string()];
        let selected = select_facets(&only).unwrap();
        // List order wins over flag order
        assert_eq!(selected, vec!["country", "ip"]);
    }

    #[test]
    fn test_select_facets_rejects_unknown_names() {
        let only = vec!["bogus".to_string()];
        assert!(select_facets(&only).is_err());
    }
}
