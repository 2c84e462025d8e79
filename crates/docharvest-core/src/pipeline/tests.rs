use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use super::*;
use crate::error::{FailureKind, ItemError};
use crate::http::{HttpError, HttpResponse, Transport};
use crate::input::normalize_inputs;
use crate::model::RunResult;
use crate::resolver::MarkerFrameLocator;

enum Route {
    Body(Vec<u8>),
    Status(u32),
}

/// In-memory web: URL → response, with optional per-URL delay and a hook
/// called on every request.
#[derive(Default)]
struct FakeWeb {
    routes: HashMap<String, Route>,
    delays: HashMap<String, Duration>,
    hits: Mutex<Vec<String>>,
    on_get: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl FakeWeb {
    fn page(mut self, url: &str, src: &str) -> Self {
        let html = format!(r#"<html><body><iframe id="ifrm" src="{src}"></iframe></body></html>"#);
        self.routes.insert(url.to_string(), Route::Body(html.into_bytes()));
        self
    }

    fn html(mut self, url: &str, html: &str) -> Self {
        self.routes
            .insert(url.to_string(), Route::Body(html.as_bytes().to_vec()));
        self
    }

    fn asset(mut self, url: &str, bytes: &[u8]) -> Self {
        self.routes.insert(url.to_string(), Route::Body(bytes.to_vec()));
        self
    }

    fn status(mut self, url: &str, code: u32) -> Self {
        self.routes.insert(url.to_string(), Route::Status(code));
        self
    }

    fn delay(mut self, url: &str, d: Duration) -> Self {
        self.delays.insert(url.to_string(), d);
        self
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

impl Transport for FakeWeb {
    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, HttpError> {
        self.hits.lock().unwrap().push(url.to_string());
        if let Some(hook) = &self.on_get {
            hook(url);
        }
        if let Some(d) = self.delays.get(url) {
            std::thread::sleep(*d);
        }
        match self.routes.get(url) {
            Some(Route::Body(body)) => Ok(HttpResponse {
                body: body.clone(),
                ..Default::default()
            }),
            Some(Route::Status(code)) => Err(HttpError::Status {
                url: url.to_string(),
                code: *code,
            }),
            None => Err(HttpError::Status {
                url: url.to_string(),
                code: 404,
            }),
        }
    }
}

fn locator() -> Arc<MarkerFrameLocator> {
    Arc::new(MarkerFrameLocator::new("iframe", "ifrm").unwrap())
}

fn options(max_concurrent: usize) -> RunOptions {
    RunOptions {
        max_concurrent,
        ..RunOptions::default()
    }
}

async fn run(web: Arc<FakeWeb>, inputs: &[&str], max_concurrent: usize) -> RunResult {
    run_batch(
        normalize_inputs(inputs),
        web,
        locator(),
        &options(max_concurrent),
        None,
        None,
    )
    .await
    .unwrap()
}

fn archive_entries(result: &RunResult) -> HashMap<String, Vec<u8>> {
    let mut zip = zip::ZipArchive::new(Cursor::new(result.archive.bytes.as_slice())).unwrap();
    let mut out = HashMap::new();
    for i in 0..zip.len() {
        let mut file = zip.by_index(i).unwrap();
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).unwrap();
        out.insert(file.name().to_string(), bytes);
    }
    out
}

#[tokio::test]
async fn single_page_resolves_and_archives() {
    let web = Arc::new(
        FakeWeb::default()
            .page("https://site/a", "/docs/1.pdf")
            .asset("https://site/docs/1.pdf", b"B-bytes"),
    );
    let result = run(Arc::clone(&web), &["https://site/a"], 4).await;

    assert_eq!(result.success_count, 1);
    assert_eq!(result.failure_count, 0);
    let entry = result.outcomes[0].result.as_ref().unwrap();
    assert_eq!(entry.entry_name, "1.pdf");
    assert_eq!(entry.asset_url, "https://site/docs/1.pdf");
    assert_eq!(entry.size_bytes, 7);
    assert_eq!(entry.sha256, crate::checksum::sha256_hex(b"B-bytes"));

    let entries = archive_entries(&result);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries["1.pdf"], b"B-bytes");
    assert_eq!(web.hits(), vec!["https://site/a", "https://site/docs/1.pdf"]);
}

#[tokio::test]
async fn page_without_marker_fails_without_fetching_asset() {
    let web = Arc::new(FakeWeb::default().html("https://site/b", "<p>no viewer</p>"));
    let result = run(Arc::clone(&web), &["https://site/b"], 4).await;

    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count, 1);
    let err = result.outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(*err, ItemError::AssetNotFound);
    assert_eq!(err.kind(), FailureKind::AssetNotFound);
    assert!(result.archive.is_empty());
    assert_eq!(web.hits().len(), 1);
}

#[tokio::test]
async fn same_asset_filename_is_disambiguated() {
    let web = Arc::new(
        FakeWeb::default()
            .page("https://site/p1", "https://one.example/x/doc.pdf")
            .page("https://site/p2", "https://two.example/y/doc.pdf")
            .asset("https://one.example/x/doc.pdf", b"first")
            .asset("https://two.example/y/doc.pdf", b"second"),
    );
    // One worker so the first input is named first.
    let result = run(web, &["https://site/p1", "https://site/p2"], 1).await;

    let names: Vec<&str> = result
        .outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().entry_name.as_str())
        .collect();
    assert_eq!(names, vec!["doc.pdf", "doc_2.pdf"]);
    let entries = archive_entries(&result);
    assert_eq!(entries["doc.pdf"], b"first");
    assert_eq!(entries["doc_2.pdf"], b"second");
}

#[tokio::test]
async fn concurrent_collisions_still_unique_and_content_matches() {
    let mut web = FakeWeb::default();
    let mut inputs = Vec::new();
    for i in 0..12 {
        let page = format!("https://site/p{i}");
        let asset = format!("https://cdn{i}.example/doc.pdf");
        web = web
            .page(&page, &asset)
            .asset(&asset, format!("content-{i}").as_bytes());
        inputs.push(page);
    }
    let inputs: Vec<&str> = inputs.iter().map(String::as_str).collect();
    let result = run(Arc::new(web), &inputs, 6).await;

    assert_eq!(result.success_count, 12);
    let entries = archive_entries(&result);
    assert_eq!(entries.len(), 12);
    for (i, outcome) in result.outcomes.iter().enumerate() {
        let entry = outcome.result.as_ref().unwrap();
        assert_eq!(entries[&entry.entry_name], format!("content-{i}").into_bytes());
    }
}

#[tokio::test]
async fn non_url_inputs_are_dropped_not_failed() {
    let web = Arc::new(
        FakeWeb::default()
            .page("https://site/c", "/c.pdf")
            .asset("https://site/c.pdf", b"c"),
    );
    let result = run(web, &["not-a-url", "https://site/c"], 4).await;
    assert_eq!(result.total(), 1);
    assert_eq!(result.outcomes[0].item.url, "https://site/c");
    assert_eq!(result.failure_count, 0);
}

#[tokio::test]
async fn failure_does_not_stop_later_items() {
    let web = Arc::new(
        FakeWeb::default()
            .page("https://site/1", "/1.pdf")
            .asset("https://site/1.pdf", b"one")
            .status("https://site/2", 500)
            .page("https://site/3", "/3.pdf")
            .status("https://site/3.pdf", 403)
            .page("https://site/4", "/4.pdf")
            .asset("https://site/4.pdf", b"four"),
    );
    let result = run(
        web,
        &["https://site/1", "https://site/2", "https://site/3", "https://site/4"],
        2,
    )
    .await;

    assert_eq!(result.total(), 4);
    let kinds: Vec<Option<FailureKind>> = result
        .outcomes
        .iter()
        .map(|o| o.result.as_ref().err().map(ItemError::kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            None,
            Some(FailureKind::PageFetchError),
            Some(FailureKind::AssetFetchError),
            None
        ]
    );
    assert_eq!(result.success_count, result.archive.entry_count());
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 2);

    let failures: Vec<(&str, String)> = result
        .failures()
        .map(|(url, e)| (url, e.to_string()))
        .collect();
    assert_eq!(
        failures,
        vec![
            ("https://site/2", "GET https://site/2 returned HTTP 500".to_string()),
            ("https://site/3", "GET https://site/3.pdf returned HTTP 403".to_string()),
        ]
    );
}

#[tokio::test]
async fn outcomes_follow_input_order_not_completion_order() {
    let web = Arc::new(
        FakeWeb::default()
            .page("https://site/slow", "/slow.pdf")
            .asset("https://site/slow.pdf", b"slow")
            .delay("https://site/slow", Duration::from_millis(300))
            .page("https://site/fast", "/fast.pdf")
            .asset("https://site/fast.pdf", b"fast"),
    );
    let (tx, mut rx) = mpsc::channel(16);
    let result = run_batch(
        normalize_inputs(["https://site/slow", "https://site/fast"]),
        web,
        locator(),
        &options(2),
        Some(tx),
        None,
    )
    .await
    .unwrap();

    let urls: Vec<&str> = result.outcomes.iter().map(|o| o.item.url.as_str()).collect();
    assert_eq!(urls, vec!["https://site/slow", "https://site/fast"]);

    let mut snapshots = Vec::new();
    while let Some(p) = rx.recv().await {
        snapshots.push(p);
    }
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].current_url, "https://site/fast");
    assert_eq!(snapshots[0].completed, 1);
    assert_eq!(snapshots[1].current_url, "https://site/slow");
    assert!(snapshots[1].is_last());
    assert_eq!(snapshots[1].succeeded, 2);
}

#[tokio::test]
async fn all_failures_still_complete_with_empty_archive() {
    let web = Arc::new(FakeWeb::default());
    let result = run(web, &["https://site/x", "https://site/y"], 4).await;
    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count, 2);
    assert!(result.archive.is_empty());
    assert!(archive_entries(&result).is_empty());
}

#[tokio::test]
async fn empty_input_yields_empty_valid_archive() {
    let result = run(Arc::new(FakeWeb::default()), &[], 4).await;
    assert_eq!(result.total(), 0);
    assert!(!result.cancelled);
    assert!(archive_entries(&result).is_empty());
    assert_eq!(result.archive.suggested_filename, "downloads.zip");
}

#[tokio::test]
async fn abort_before_start_cancels_every_item() {
    let web = Arc::new(FakeWeb::default().page("https://site/a", "/a.pdf"));
    let control = RunControl::new();
    control.request_abort();
    let result = run_batch(
        normalize_inputs(["https://site/a", "https://site/b"]),
        Arc::clone(&web) as Arc<dyn Transport>,
        locator(),
        &options(4),
        None,
        Some(control),
    )
    .await
    .unwrap();

    assert!(result.cancelled);
    assert_eq!(result.total(), 2);
    assert!(result
        .outcomes
        .iter()
        .all(|o| o.result.as_ref().err() == Some(&ItemError::Cancelled)));
    assert!(web.hits().is_empty());
}

#[tokio::test]
async fn abort_mid_run_lets_in_flight_item_finish() {
    let control = RunControl::new();
    let hook_control = control.clone();
    let mut web = FakeWeb::default()
        .page("https://site/1", "/1.pdf")
        .asset("https://site/1.pdf", b"one")
        .page("https://site/2", "/2.pdf")
        .asset("https://site/2.pdf", b"two");
    web.on_get = Some(Box::new(move |url| {
        if url == "https://site/1" {
            hook_control.request_abort();
        }
    }));
    let (tx, mut rx) = mpsc::channel(16);
    let result = run_batch(
        normalize_inputs(["https://site/1", "https://site/2", "https://site/3"]),
        Arc::new(web),
        locator(),
        &options(1),
        Some(tx),
        Some(control),
    )
    .await
    .unwrap();

    assert!(result.cancelled);
    assert!(result.outcomes[0].is_success());
    assert_eq!(
        result.outcomes[1].result.as_ref().unwrap_err(),
        &ItemError::Cancelled
    );
    assert_eq!(
        result.outcomes[2].result.as_ref().unwrap_err(),
        &ItemError::Cancelled
    );
    assert_eq!(result.archive.entry_count(), 1);

    let mut last = None;
    while let Some(p) = rx.recv().await {
        last = Some(p);
    }
    let last = last.unwrap();
    assert_eq!(last.completed, 3);
    assert_eq!(last.failed, 2);
}

#[tokio::test]
async fn abort_after_every_item_started_is_not_a_cancellation() {
    let control = RunControl::new();
    let hook_control = control.clone();
    let mut web = FakeWeb::default()
        .page("https://site/1", "/1.pdf")
        .asset("https://site/1.pdf", b"one")
        .page("https://site/2", "/2.pdf")
        .asset("https://site/2.pdf", b"two");
    web.on_get = Some(Box::new(move |url| {
        if url == "https://site/1.pdf" {
            hook_control.request_abort();
        }
    }));
    let result = run_batch(
        normalize_inputs(["https://site/1", "https://site/2"]),
        Arc::new(web),
        locator(),
        &options(4),
        None,
        Some(control),
    )
    .await
    .unwrap();

    assert!(!result.cancelled);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 0);
    assert_eq!(result.archive.entry_count(), 2);
}
