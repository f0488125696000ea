// src/ingest/providers/angellist.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::filter::Draft;
use crate::ingest::http::{get_json, typed_items, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::lenient::{self, non_empty};
use crate::ingest::recency::{parse_text, Window};
use crate::ingest::types::{JobPosting, Source, SourceAdapter};
use crate::ingest::{normalize_text, record_listings};

pub const DEFAULT_BASE_URL: &str = "https://api.angel.co";

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    title: Option<String>,
    #[serde(default)]
    startup: Option<Startup>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    angellist_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Startup {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    name: Option<String>,
}

/// AngelList / Wellfound remote jobs. No credentials.
pub struct AngelListAdapter {
    ctx: AdapterCtx,
    base_url: String,
}

impl AngelListAdapter {
    pub fn new(ctx: AdapterCtx) -> Self {
        Self {
            ctx,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn parse_listings(&self, body: &Value, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let items = body
            .get("jobs")
            .and_then(Value::as_array)
            .context("angellist: missing `jobs` array")?;
        record_listings(Source::AngelList, items.len());

        let drafts = typed_items::<Item>(items, "angellist")
            .into_iter()
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Hour))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.id?;
    let created = it.created_at.unwrap_or_default();
    let title = it.title.unwrap_or_default();
    let company = it.startup.and_then(|s| s.name).unwrap_or_default();
    let desc = it.description.as_deref().map(normalize_text);
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        desc.as_deref(),
        it.location.as_deref(),
    ]);

    let mut posting = JobPosting::new(Source::AngelList, &native);
    posting.title = title;
    posting.company = company;
    posting.url = it.angellist_url;
    posting.created_at = created.clone();
    posting.location = non_empty(it.location);
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at: parse_text(&created),
        match_text,
        remote_flag: None,
    })
}

#[async_trait]
impl SourceAdapter for AngelListAdapter {
    fn source(&self) -> Source {
        Source::AngelList
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let url = format!("{}/1/jobs", self.base_url);
        let query = [
            ("keywords", "developer,programmer,engineer".to_string()),
            ("remote", "true".to_string()),
            ("per_page", "50".to_string()),
        ];
        let body = get_json(&self.ctx, &url, &query, &[]).await?;
        self.parse_listings(&body, now)
    }
}
