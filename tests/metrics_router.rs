// tests/metrics_router.rs
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use chrono::{TimeZone, Utc};
use http::{Request, StatusCode};
use jobwatch::ingest::filter::Filters;
use jobwatch::ingest::http::AdapterCtx;
use jobwatch::ingest::keywords::KeywordMatcher;
use jobwatch::ingest::providers::remoteok::RemoteOkAdapter;
use jobwatch::metrics::Metrics;
use tower::ServiceExt; // for `oneshot`

#[tokio::test]
async fn metrics_exposed_after_parse() {
    // One recorder per process; keep this the only test in the file.
    let metrics = Metrics::init().expect("recorder");

    let ctx = AdapterCtx::new(
        Filters {
            matcher: Arc::new(KeywordMatcher::default()),
            remote_only: true,
        },
        Duration::from_secs(5),
    )
    .unwrap();
    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string("tests/fixtures/remoteok.json").unwrap())
            .unwrap();
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
    RemoteOkAdapter::new(ctx).parse_listings(&body, now).unwrap();

    let req = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = metrics.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let s = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(s.contains("adapter_listings_total"));
    assert!(s.contains("source=\"remoteok\""));
}
