//! Facet fetching abstraction.
//!
//! Defines the `FacetClient` trait that abstracts over the browser engine
//! (currently Chromium via chromiumoxide), so the scheduler and retry layer
//! can be exercised with fake clients that script rate limits and empty
//! pages deterministically.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// Fixed endpoint the facet pages live under.
pub const FACET_ENDPOINT: &str = "https://www.shodan.io/search/facet";

/// Result of fetching one facet page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetResponse {
    /// HTTP status of the navigation response. 0 when no response arrived.
    pub status: u16,
    /// Values scraped from the rendered page, document order preserved.
    pub values: Vec<String>,
}

/// A client that can fetch and extract one facet page per call.
///
/// Each call must use a fresh, isolated browsing context so no state leaks
/// between tasks, and must release that context on every path. A navigation
/// failure surfaces as `Err`; the retry layer treats it like a non-200
/// response.
#[async_trait]
pub trait FacetClient: Send + Sync {
    async fn fetch(&self, query: &str, facet: &str) -> Result<FacetResponse>;
}

/// Build the facet page URL for a query. The query is percent-encoded; the
/// facet name is embedded as-is (category names are plain tokens).
pub fn facet_url(query: &str, facet: &str) -> Result<Url> {
    let url = Url::parse_with_params(FACET_ENDPOINT, &[("query", query), ("facet", facet)])?;
    Ok(url)
}

/// Strip quote characters from an extracted value. Shodan wraps some facet
/// values in quotes in the page markup.
pub(crate) fn strip_quotes(raw: &str) -> String {
    raw.replace(&['"', '\''][..], "")
}
