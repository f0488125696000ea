// src/ingest/mod.rs
pub mod config;
pub mod filter;
pub mod http;
pub mod keywords;
pub mod lenient;
pub mod providers;
pub mod recency;
pub mod scheduler;
pub mod types;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::ingest::types::{JobPosting, Source, SourceAdapter};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "adapter_listings_total",
            "Listings returned by providers before filtering."
        );
        describe_counter!(
            "adapter_matches_total",
            "Listings that passed recency, remote and keyword gates."
        );
        describe_counter!(
            "adapter_errors_total",
            "Provider fetch/parse errors and timeouts."
        );
        describe_histogram!("adapter_fetch_ms", "Provider fetch time in milliseconds.");
        describe_counter!("notify_sent_total", "Notifications delivered.");
        describe_counter!("notify_errors_total", "Notification delivery failures.");
        describe_counter!("seen_inserted_total", "Postings recorded as seen.");
        describe_counter!("cycle_errors_total", "Cycles aborted by a store error.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last finished a cycle."
        );
    });
}

pub(crate) fn record_listings(source: Source, n: usize) {
    counter!("adapter_listings_total", "source" => source.as_str()).increment(n as u64);
}

/// Normalize text: decode entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 5000 chars
    if out.chars().count() > 5000 {
        out = out.chars().take(5000).collect();
    }

    out
}

/// Outcome of one adapter within a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterOutcome {
    Skipped,
    Ok(usize),
    Failed,
    TimedOut,
}

/// Runs every enabled adapter concurrently, each bounded by `timeout`, and
/// concatenates their candidates in adapter order. A failing or hanging
/// adapter contributes nothing; it never fails the collection.
pub async fn run_once(
    adapters: &[Box<dyn SourceAdapter>],
    now: DateTime<Utc>,
    timeout: Duration,
) -> (Vec<JobPosting>, Vec<(Source, AdapterOutcome)>) {
    ensure_metrics_described();

    let fetches = adapters.iter().map(|a| async move {
        let source = a.source();
        if !a.enabled() {
            tracing::info!(provider = a.name(), "skipped (no API key configured)");
            return (source, AdapterOutcome::Skipped, Vec::new());
        }

        let t0 = Instant::now();
        let res = tokio::time::timeout(timeout, a.fetch_latest(now)).await;
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("adapter_fetch_ms", "source" => source.as_str()).record(ms);

        match res {
            Ok(Ok(v)) => {
                tracing::info!(provider = a.name(), matches = v.len(), "found matching jobs");
                counter!("adapter_matches_total", "source" => source.as_str())
                    .increment(v.len() as u64);
                (source, AdapterOutcome::Ok(v.len()), v)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = ?e, provider = a.name(), "provider error");
                counter!("adapter_errors_total", "source" => source.as_str()).increment(1);
                (source, AdapterOutcome::Failed, Vec::new())
            }
            Err(_) => {
                tracing::warn!(provider = a.name(), ?timeout, "provider timed out");
                counter!("adapter_errors_total", "source" => source.as_str()).increment(1);
                (source, AdapterOutcome::TimedOut, Vec::new())
            }
        }
    });

    let mut found = Vec::new();
    let mut outcomes = Vec::with_capacity(adapters.len());
    for (source, outcome, mut v) in join_all(fetches).await {
        found.append(&mut v);
        outcomes.push((source, outcome));
    }
    (found, outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_strips_markup_and_collapses_ws() {
        let s = "  <p>Senior&nbsp;&nbsp;<b>Rust</b>\n engineer</p>  ";
        assert_eq!(normalize_text(s), "Senior Rust engineer");
    }

    #[test]
    fn normalize_text_maps_smart_quotes() {
        assert_eq!(normalize_text("“ok” ‘x’"), r#""ok" 'x'"#);
    }
}
