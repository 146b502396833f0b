//! Chromium-backed facet client using chromiumoxide.

use super::{facet_url, strip_quotes, FacetClient, FacetResponse};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Script evaluated in the rendered facet page: the facet values are the
/// `<strong>` elements of the result list.
const EXTRACT_VALUES_JS: &str =
    r#"Array.from(document.querySelectorAll("strong")).map(e => e.innerHTML)"#;

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. SHODAN_HARVEST_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("SHODAN_HARVEST_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.shodan-harvest/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".shodan-harvest/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".shodan-harvest/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".shodan-harvest/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".shodan-harvest/chromium/chrome-linux64/chrome"),
                home.join(".shodan-harvest/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    if let Ok(path) = which::which("google-chrome") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium") {
        return Some(path);
    }
    if let Ok(path) = which::which("chromium-browser") {
        return Some(path);
    }

    // 4. Common macOS locations
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Facet client driving a single shared headless Chromium instance.
///
/// The browser is launched once per run; every `fetch` opens its own page
/// (an isolated context) and closes it before returning.
pub struct ChromiumClient {
    browser: Browser,
    active_pages: Arc<AtomicUsize>,
    nav_timeout_ms: u64,
}

impl ChromiumClient {
    /// Launch a headless Chromium instance.
    pub async fn launch(nav_timeout_ms: u64) -> Result<Self> {
        let chrome_path = find_chromium().context(
            "Chromium not found. Install Chrome or set SHODAN_HARVEST_CHROMIUM_PATH.",
        )?;
        debug!("using Chromium at {}", chrome_path.display());

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the CDP handler task
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        info!("Chromium launched");

        Ok(Self {
            browser,
            active_pages: Arc::new(AtomicUsize::new(0)),
            nav_timeout_ms,
        })
    }

    /// Close the browser. Called once, after the final batch has completed.
    pub async fn shutdown(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("failed to close browser")?;
        let _ = self.browser.wait().await;
        Ok(())
    }

    /// Number of currently open pages.
    pub fn active_pages(&self) -> usize {
        self.active_pages.load(Ordering::Relaxed)
    }

    async fn fetch_on_page(&self, page: &Page, query: &str, facet: &str) -> Result<FacetResponse> {
        let url = facet_url(query, facet)?;

        let nav = tokio::time::timeout(
            Duration::from_millis(self.nav_timeout_ms),
            page.goto(url.as_str()),
        )
        .await;

        match nav {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {}ms", self.nav_timeout_ms),
        }

        // Status of the document response; absent means the load never
        // produced one, which the retry layer treats like any non-200.
        let status = page
            .wait_for_navigation_response()
            .await
            .ok()
            .flatten()
            .and_then(|req| req.response.as_ref().map(|r| r.status as u16))
            .unwrap_or(0);

        let raw: Vec<String> = page
            .evaluate(EXTRACT_VALUES_JS)
            .await
            .context("value extraction failed")?
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert extracted values: {e:?}"))?;

        let values = raw.iter().map(|v| strip_quotes(v)).collect();

        Ok(FacetResponse { status, values })
    }
}

#[async_trait]
impl FacetClient for ChromiumClient {
    async fn fetch(&self, query: &str, facet: &str) -> Result<FacetResponse> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;

        self.active_pages.fetch_add(1, Ordering::Relaxed);

        // The page is closed on every path, error included.
        let result = self.fetch_on_page(&page, query, facet).await;

        self.active_pages.fetch_sub(1, Ordering::Relaxed);
        let _ = page.close().await;

        result
    }
}
