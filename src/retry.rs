//! Bounded retry with fixed delay around one facet fetch.

use crate::fetch::{FacetClient, FacetResponse};
use crate::progress::{Progress, RunEventKind};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Attempt cap. Fixed by policy; configuration only tunes the delay.
pub const MAX_ATTEMPTS: u32 = 3;

/// Why a task produced no artifact.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskFailure {
    /// The last response carried no extractable values.
    #[error("no data")]
    NoData,
    /// The values were extracted but the artifact could not be written.
    #[error("could not save artifact: {0}")]
    Persist(String),
}

/// Outcome of one task after retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    Success(Vec<String>),
    Failure(TaskFailure),
}

/// Fetch one facet, retrying on anything but a 200 with a fixed delay after
/// every failed attempt, the final one included. Each attempt uses a fresh
/// browsing context (the client opens one per call), so nothing is held
/// open across the delay.
///
/// The *last* response is evaluated even when every attempt was non-200: a
/// rate-limited page can still carry data, and only an empty value list
/// makes the task fail.
pub async fn fetch_with_retry(
    client: &dyn FacetClient,
    query: &str,
    facet: &str,
    delay: Duration,
    progress: &Progress,
) -> TaskResult {
    let mut attempts = 0u32;

    let last = loop {
        let resp = match client.fetch(query, facet).await {
            Ok(resp) => resp,
            Err(e) => {
                // A navigation error is indistinguishable from a non-200
                // response for retry purposes.
                warn!(facet, "fetch attempt failed: {e:#}");
                FacetResponse {
                    status: 0,
                    values: Vec::new(),
                }
            }
        };

        if resp.status == 200 {
            break resp;
        }

        // Every failed attempt pays the delay, the last one included
        attempts += 1;
        progress.emit(RunEventKind::TaskRetrying {
            facet: facet.to_string(),
            status: resp.status,
            attempt: attempts,
            delay_ms: delay.as_millis() as u64,
        });
        tokio::time::sleep(delay).await;

        if attempts >= MAX_ATTEMPTS {
            break resp;
        }
    };

    if last.values.is_empty() {
        TaskResult::Failure(TaskFailure::NoData)
    } else {
        TaskResult::Success(last.values)
    }
}
