//! End-to-end orchestrator tests with a scripted facet client.
//!
//! The real browser is swapped for a client that replays per-facet response
//! scripts, so rate limiting, empty pages, and recovery are deterministic.

use anyhow::Result;
use async_trait::async_trait;
use shodan_harvest::fetch::{FacetClient, FacetResponse};
use shodan_harvest::progress::{self, Progress, RunEventKind};
use shodan_harvest::runner::{run, RunConfig};
use shodan_harvest::sink::OutputSink;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Replays a per-facet sequence of responses; repeats the last entry once a
/// script is exhausted.
struct ScriptedClient {
    scripts: HashMap<String, Vec<FacetResponse>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    fn script(mut self, facet: &str, responses: Vec<FacetResponse>) -> Self {
        assert!(!responses.is_empty());
        self.scripts.insert(facet.to_string(), responses);
        self
    }

    fn calls(&self, facet: &str) -> usize {
        self.calls.lock().unwrap().get(facet).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl FacetClient for ScriptedClient {
    async fn fetch(&self, _query: &str, facet: &str) -> Result<FacetResponse> {
        let idx = {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.entry(facet.to_string()).or_insert(0);
            let idx = *n;
            *n += 1;
            idx
        };
        let script = self.scripts.get(facet).expect("unscripted facet");
        Ok(script.get(idx).unwrap_or_else(|| script.last().unwrap()).clone())
    }
}

fn ok(values: &[&str]) -> FacetResponse {
    FacetResponse {
        status: 200,
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

fn rate_limited() -> FacetResponse {
    FacetResponse {
        status: 429,
        values: Vec::new(),
    }
}

fn config(query: &str, concurrency: usize) -> RunConfig {
    RunConfig {
        query: query.to_string(),
        concurrency,
        retry_delay: Duration::from_millis(100),
    }
}

#[tokio::test(start_paused = true)]
async fn country_saved_while_rate_limited_sibling_fails() {
    let tmp = TempDir::new().unwrap();
    let sink = OutputSink::new(tmp.path());
    let client = ScriptedClient::new()
        .script("country", vec![ok(&["US"])])
        .script("ip", vec![rate_limited()]);

    let summary = run(
        &client,
        &sink,
        &["country", "ip"],
        &config("example.com", 2),
        &Progress::disabled(),
    )
    .await
    .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    // The artifact holds exactly the extracted value
    let country = std::fs::read_to_string(sink.artifact_path("country")).unwrap();
    assert_eq!(country, "US");

    // The failed facet leaves no artifact, and its siblings were untouched
    assert!(!sink.artifact_path("ip").exists());
    assert_eq!(client.calls("country"), 1);
    assert_eq!(client.calls("ip"), 3);
}

#[tokio::test(start_paused = true)]
async fn every_facet_is_processed_exactly_once() {
    let tmp = TempDir::new().unwrap();
    let sink = OutputSink::new(tmp.path());
    let facets = ["asn", "city", "country", "ip", "port"];
    let mut client = ScriptedClient::new();
    for facet in facets {
        client = client.script(facet, vec![ok(&[facet])]);
    }

    let summary = run(
        &client,
        &sink,
        &facets,
        &config("example.com", 2),
        &Progress::disabled(),
    )
    .await
    .unwrap();

    assert_eq!(summary.succeeded, facets.len());
    for facet in facets {
        assert_eq!(client.calls(facet), 1);
        assert_eq!(
            std::fs::read_to_string(sink.artifact_path(facet)).unwrap(),
            facet
        );
    }
}

#[tokio::test(start_paused = true)]
async fn rerun_overwrites_artifact_without_stale_content() {
    let tmp = TempDir::new().unwrap();
    let sink = OutputSink::new(tmp.path());

    let first = ScriptedClient::new().script("port", vec![ok(&["80", "443", "8080"])]);
    run(
        &first,
        &sink,
        &["port"],
        &config("example.com", 1),
        &Progress::disabled(),
    )
    .await
    .unwrap();

    let second = ScriptedClient::new().script("port", vec![ok(&["22"])]);
    run(
        &second,
        &sink,
        &["port"],
        &config("example.com", 1),
        &Progress::disabled(),
    )
    .await
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(sink.artifact_path("port")).unwrap(),
        "22"
    );
}

#[tokio::test]
async fn empty_query_aborts_before_any_fetch() {
    let tmp = TempDir::new().unwrap();
    let sink = OutputSink::new(tmp.path().join("output"));
    let client = ScriptedClient::new().script("country", vec![ok(&["US"])]);

    let result = run(
        &client,
        &sink,
        &["country"],
        &config("", 2),
        &Progress::disabled(),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(client.total_calls(), 0);
    assert!(!sink.dir().exists());
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_with_data_still_persist() {
    // Every attempt is rate-limited but the page renders values anyway: the
    // last response is what gets evaluated, so the artifact is written.
    let tmp = TempDir::new().unwrap();
    let sink = OutputSink::new(tmp.path());
    let limited_with_data = FacetResponse {
        status: 429,
        values: vec!["203.0.113.9".to_string()],
    };
    let client = ScriptedClient::new().script("ip", vec![limited_with_data]);

    let summary = run(
        &client,
        &sink,
        &["ip"],
        &config("example.com", 1),
        &Progress::disabled(),
    )
    .await
    .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(client.calls("ip"), 3);
    assert_eq!(
        std::fs::read_to_string(sink.artifact_path("ip")).unwrap(),
        "203.0.113.9"
    );
}

#[tokio::test(start_paused = true)]
async fn run_events_report_each_task_and_completion() {
    let tmp = TempDir::new().unwrap();
    let sink = OutputSink::new(tmp.path());
    let client = ScriptedClient::new()
        .script("country", vec![ok(&["US", "DE"])])
        .script("tag", vec![ok(&[])]);

    let (tx, mut rx) = progress::channel();
    let progress = Progress::new(Some(tx));
    run(
        &client,
        &sink,
        &["country", "tag"],
        &config("example.com", 2),
        &progress,
    )
    .await
    .unwrap();
    drop(progress);

    let mut saved = Vec::new();
    let mut failed = Vec::new();
    let mut completed = None;
    while let Ok(event) = rx.try_recv() {
        match event.event {
            RunEventKind::TaskSaved { facet, .. } => saved.push(facet),
            RunEventKind::TaskFailed { facet, reason } => failed.push((facet, reason)),
            RunEventKind::RunCompleted {
                succeeded, failed, ..
            } => completed = Some((succeeded, failed)),
            _ => {}
        }
    }

    assert_eq!(saved, vec!["country".to_string()]);
    assert_eq!(failed, vec![("tag".to_string(), "no data".to_string())]);
    assert_eq!(completed, Some((1, 1)));
}
