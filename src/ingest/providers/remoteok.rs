// src/ingest/providers/remoteok.rs
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::filter::Draft;
use crate::ingest::http::{get_json, typed_items, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::lenient;
use crate::ingest::recency::{parse_text, Window};
use crate::ingest::types::{JobPosting, Source, SourceAdapter};
use crate::ingest::{normalize_text, record_listings};

pub const DEFAULT_BASE_URL: &str = "https://remoteok.com";

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    epoch: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    position: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    company: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    url: Option<String>,
}

/// RemoteOK public feed. No credentials; everything on it is remote.
pub struct RemoteOkAdapter {
    ctx: AdapterCtx,
    base_url: String,
}

impl RemoteOkAdapter {
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
        let Some(items) = body.as_array() else {
            bail!("remoteok: expected a top-level array");
        };
        record_listings(Source::RemoteOk, items.len());

        let drafts = typed_items::<Item>(items, "remoteok")
            .into_iter()
            // the first element is a legal notice without an id
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Hour))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.id?;
    let (posted_at, created_at) = match it.epoch.filter(|e| *e > 0) {
        Some(epoch) => {
            let ts = Utc.timestamp_opt(epoch, 0).single();
            let shown = ts
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();
            (ts, shown)
        }
        None => {
            let text = it.date.or(it.created_at).unwrap_or_default();
            (parse_text(&text), text)
        }
    };

    let title = it.position.or(it.title).unwrap_or_default();
    let company = it.company.unwrap_or_default();
    let tags = it.tags.join(" ");
    let desc = it.description.as_deref().map(normalize_text);
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        Some(tags.as_str()),
        desc.as_deref(),
    ]);

    let mut posting = JobPosting::new(Source::RemoteOk, &native);
    posting.title = title;
    posting.company = company;
    posting.url = it.url;
    posting.created_at = created_at;
    posting.location = lenient::non_empty(it.location);
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at,
        match_text,
        remote_flag: None,
    })
}

#[async_trait]
impl SourceAdapter for RemoteOkAdapter {
    fn source(&self) -> Source {
        Source::RemoteOk
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let url = format!("{}/api", self.base_url);
        let body = get_json(&self.ctx, &url, &[], &[]).await?;
        self.parse_listings(&body, now)
    }
}
