// src/ingest/providers/authentic.rs
use anyhow::Result;
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

pub const DEFAULT_BASE_URL: &str = "https://authenticjobs.com";

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    post_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    title: Option<String>,
    #[serde(default)]
    company: Option<Named>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    name: Option<String>,
}

/// Authentic Jobs public API. No credentials.
pub struct AuthenticAdapter {
    ctx: AdapterCtx,
    base_url: String,
}

impl AuthenticAdapter {
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

    /// `{listings: {listing: [...]}}`; a missing path yields nothing.
    pub fn parse_listings(&self, body: &Value, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let items = body
            .get("listings")
            .and_then(|l| l.get("listing"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        record_listings(Source::Authentic, items.len());

        let drafts = typed_items::<Item>(items, "authentic")
            .into_iter()
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Hour))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.id?;
    let posted = it.post_date.unwrap_or_default();
    let title = it.title.unwrap_or_default();
    let company = it.company.and_then(|c| c.name).unwrap_or_default();
    let desc = it.description.as_deref().map(normalize_text);
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        desc.as_deref(),
        it.location.as_deref(),
    ]);

    let mut posting = JobPosting::new(Source::Authentic, &native);
    posting.title = title;
    posting.company = company;
    posting.url = it.url;
    posting.created_at = posted.clone();
    posting.location = non_empty(it.location);
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at: parse_text(&posted),
        match_text,
        remote_flag: None,
    })
}

#[async_trait]
impl SourceAdapter for AuthenticAdapter {
    fn source(&self) -> Source {
        Source::Authentic
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let url = format!("{}/api/", self.base_url);
        let query = [
            ("method", "aj.jobs.search".to_string()),
            ("keywords", "developer,programmer,engineer".to_string()),
            ("perpage", "50".to_string()),
            ("format", "json".to_string()),
        ];
        let body = get_json(&self.ctx, &url, &query, &[]).await?;
        self.parse_listings(&body, now)
    }
}
