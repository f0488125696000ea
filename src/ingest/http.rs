// src/ingest/http.rs
//! Outbound request plumbing shared by the adapters: one client, one bounded
//! GET per call, RapidAPI header pair.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

use crate::ingest::filter::Filters;

pub const USER_AGENT: &str = "job-bot/1.0";

/// What every adapter needs besides its own credentials.
#[derive(Debug, Clone)]
pub struct AdapterCtx {
    pub client: Client,
    pub filters: Filters,
    pub timeout: Duration,
}

impl AdapterCtx {
    pub fn new(filters: Filters, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            filters,
            timeout,
        })
    }
}

pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("building http client")
}

pub fn rapidapi_headers<'a>(key: &'a str, host: &'a str) -> [(&'static str, &'a str); 2] {
    [("x-rapidapi-key", key), ("x-rapidapi-host", host)]
}

/// Single GET; non-2xx is an error.
pub async fn get_text(
    ctx: &AdapterCtx,
    url: &str,
    query: &[(&str, String)],
    headers: &[(&str, &str)],
) -> Result<String> {
    let mut req = ctx.client.get(url).timeout(ctx.timeout).query(query);
    for (k, v) in headers {
        req = req.header(*k, *v);
    }
    let resp = req
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} non-2xx"))?;
    resp.text()
        .await
        .with_context(|| format!("reading body of {url}"))
}

pub async fn get_json(
    ctx: &AdapterCtx,
    url: &str,
    query: &[(&str, String)],
    headers: &[(&str, &str)],
) -> Result<Value> {
    let body = get_text(ctx, url, query, headers).await?;
    serde_json::from_str(&body).with_context(|| format!("parsing JSON from {url}"))
}

/// Prefix relative links with the provider's origin.
pub fn absolutize(link: Option<String>, origin: &str) -> Option<String> {
    let link = link.filter(|l| !l.trim().is_empty())?;
    if link.starts_with("http") {
        Some(link)
    } else {
        Some(format!("{origin}{link}"))
    }
}

/// Deserializes each element independently so one malformed listing does
/// not take its siblings down.
pub fn typed_items<T: serde::de::DeserializeOwned>(
    items: &[Value],
    provider: &'static str,
) -> Vec<(T, Value)> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            continue;
        }
        match <T as serde::Deserialize>::deserialize(item) {
            Ok(t) => out.push((t, item.clone())),
            Err(e) => {
                tracing::debug!(provider, error = %e, "skipping malformed listing");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_keeps_absolute_links() {
        assert_eq!(
            absolutize(Some("/job/1".into()), "https://www.indeed.com").as_deref(),
            Some("https://www.indeed.com/job/1")
        );
        assert_eq!(
            absolutize(Some("https://x.test/a".into()), "https://www.indeed.com").as_deref(),
            Some("https://x.test/a")
        );
        assert_eq!(absolutize(Some("".into()), "https://o"), None);
        assert_eq!(absolutize(None, "https://o"), None);
    }

    #[derive(serde::Deserialize)]
    struct Row {
        id: u32,
    }

    #[test]
    fn typed_items_keeps_raw_and_skips_bad_rows() {
        let items = vec![
            serde_json::json!({"id": 1, "extra": "x"}),
            serde_json::json!({"id": "not a number"}),
            serde_json::json!("notice"),
            serde_json::json!({"id": 3}),
        ];
        let rows = typed_items::<Row>(&items, "test");
        let ids: Vec<u32> = rows.iter().map(|(r, _)| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(rows[0].1, items[0]);
    }
}
