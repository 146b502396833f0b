//! Run orchestration: config validation, batch scheduling, persistence.
//!
//! The scheduler walks the facet list in fixed windows of `concurrency`
//! tasks. Every task in a window runs concurrently; the next window starts
//! only after the whole window has resolved and persisted (a full barrier),
//! which caps peak open browser pages deterministically.

use crate::fetch::FacetClient;
use crate::progress::{Progress, RunEventKind};
use crate::retry::{fetch_with_retry, TaskFailure, TaskResult};
use crate::sink::OutputSink;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Default number of facet tasks fetched concurrently.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default delay between retry attempts.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 30_000;

/// Rejected before any browser activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no query supplied")]
    MissingQuery,
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub query: String,
    pub concurrency: usize,
    pub retry_delay: Duration,
}

impl RunConfig {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            concurrency: DEFAULT_CONCURRENCY,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.trim().is_empty() {
            return Err(ConfigError::MissingQuery);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}

/// How a run ended. Individual task failures do not fail the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Drive every facet through fetch, retry, and persistence.
///
/// Each facet is attempted exactly once; a task failure never cancels its
/// siblings or later windows. Artifacts of a window are durable before the
/// barrier releases.
pub async fn run(
    client: &dyn FacetClient,
    sink: &OutputSink,
    facets: &[&str],
    config: &RunConfig,
    progress: &Progress,
) -> anyhow::Result<RunSummary> {
    config.validate()?;
    sink.ensure_dir()?;

    let start = std::time::Instant::now();
    let mut summary = RunSummary::default();

    for batch in facets.chunks(config.concurrency) {
        let resolutions = futures::future::join_all(batch.iter().map(|&facet| async move {
            progress.emit(RunEventKind::TaskStarted {
                facet: facet.to_string(),
            });

            let result =
                fetch_with_retry(client, &config.query, facet, config.retry_delay, progress)
                    .await;

            match result {
                TaskResult::Success(values) => {
                    progress.emit(RunEventKind::TaskSucceeded {
                        facet: facet.to_string(),
                        values: values.len(),
                    });
                    match sink.persist(facet, &values) {
                        Ok(path) => {
                            progress.emit(RunEventKind::TaskSaved {
                                facet: facet.to_string(),
                                path: path.display().to_string(),
                            });
                            true
                        }
                        Err(e) => {
                            let reason = TaskFailure::Persist(format!("{e:#}"));
                            progress.emit(RunEventKind::TaskFailed {
                                facet: facet.to_string(),
                                reason: reason.to_string(),
                            });
                            false
                        }
                    }
                }
                TaskResult::Failure(reason) => {
                    progress.emit(RunEventKind::TaskFailed {
                        facet: facet.to_string(),
                        reason: reason.to_string(),
                    });
                    false
                }
            }
        }))
        .await;

        for saved in resolutions {
            if saved {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }
    }

    progress.emit(RunEventKind::RunCompleted {
        succeeded: summary.succeeded,
        failed: summary.failed,
        elapsed_ms: start.elapsed().as_millis() as u64,
    });
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "run complete"
    );

    Ok(summary)
}
