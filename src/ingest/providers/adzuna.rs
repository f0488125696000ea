// src/ingest/providers/adzuna.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::filter::Draft;
use crate::ingest::http::{get_json, typed_items, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::lenient;
use crate::ingest::record_listings;
use crate::ingest::recency::{parse_text, Window};
use crate::ingest::types::{JobPosting, Source, SourceAdapter};

pub const DEFAULT_BASE_URL: &str = "https://api.adzuna.com";

#[derive(Debug, Clone)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    created: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    title: Option<String>,
    #[serde(default)]
    company: Option<Company>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    description: Option<String>,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Company {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    label: Option<String>,
}

/// Adzuna search, newest first, scoped to the configured country.
pub struct AdzunaAdapter {
    ctx: AdapterCtx,
    credentials: Option<AdzunaCredentials>,
    country: String,
    base_url: String,
}

impl AdzunaAdapter {
    pub fn new(ctx: AdapterCtx, credentials: Option<AdzunaCredentials>, country: &str) -> Self {
        Self {
            ctx,
            credentials,
            country: country.to_ascii_lowercase(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn parse_listings(&self, body: &Value, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let items = body
            .get("results")
            .and_then(Value::as_array)
            .context("adzuna: missing `results` array")?;
        record_listings(Source::Adzuna, items.len());

        let drafts = typed_items::<Item>(items, "adzuna")
            .into_iter()
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Hour))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.id?;
    let created = it.created.unwrap_or_default();
    let title = it.title.unwrap_or_default();
    let (company, company_url) = match it.company {
        Some(c) => (c.display_name.unwrap_or_default(), c.url),
        None => (String::new(), None),
    };
    let category = it.category.and_then(|c| c.label);
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        it.description.as_deref(),
        category.as_deref(),
    ]);

    let mut posting = JobPosting::new(Source::Adzuna, &native);
    posting.title = title;
    posting.company = company;
    posting.url = it.redirect_url.or(company_url);
    posting.created_at = created.clone();
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at: parse_text(&created),
        match_text,
        remote_flag: None,
    })
}

#[async_trait]
impl SourceAdapter for AdzunaAdapter {
    fn source(&self) -> Source {
        Source::Adzuna
    }

    fn enabled(&self) -> bool {
        self.credentials.is_some()
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let Some(creds) = &self.credentials else {
            return Ok(Vec::new());
        };
        let url = format!("{}/v1/api/jobs/{}/search/1", self.base_url, self.country);
        let query = [
            ("app_id", creds.app_id.clone()),
            ("app_key", creds.app_key.clone()),
            ("what", "software developer".to_string()),
            ("where", "United States".to_string()),
            ("results_per_page", "20".to_string()),
            ("sort_by", "date".to_string()),
        ];
        let body = get_json(&self.ctx, &url, &query, &[]).await?;
        self.parse_listings(&body, now)
    }
}
