// src/ingest/providers/jsearch.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::filter::Draft;
use crate::ingest::http::{get_json, rapidapi_headers, typed_items, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::lenient;
use crate::ingest::record_listings;
use crate::ingest::recency::{parse_text, Window};
use crate::ingest::types::{JobPosting, Source, SourceAdapter};

pub const HOST: &str = "jsearch.p.rapidapi.com";

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_posted_at_datetime_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    employer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    job_is_remote: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_apply_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    job_min_salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    job_max_salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_employment_type_text: Option<String>,
}

/// JSearch (RapidAPI), today's postings for the configured country.
pub struct JSearchAdapter {
    ctx: AdapterCtx,
    api_key: Option<String>,
    country: String,
    base_url: String,
}

impl JSearchAdapter {
    pub fn new(ctx: AdapterCtx, api_key: Option<String>, country: &str) -> Self {
        Self {
            ctx,
            api_key,
            country: country.to_string(),
            base_url: format!("https://{HOST}"),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn parse_listings(&self, body: &Value, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let items = body
            .get("data")
            .and_then(Value::as_array)
            .context("jsearch: missing `data` array")?;
        record_listings(Source::JSearch, items.len());

        let drafts = typed_items::<Item>(items, "jsearch")
            .into_iter()
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Day))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.job_id?;
    let posted = it.job_posted_at_datetime_utc.unwrap_or_default();
    let is_remote = it.job_is_remote.unwrap_or(false);
    let title = it.job_title.unwrap_or_default();
    let company = it.employer_name.unwrap_or_default();
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        it.job_description.as_deref(),
        it.job_location.as_deref(),
    ]);

    let mut posting = JobPosting::new(Source::JSearch, &native);
    posting.title = title;
    posting.company = company;
    posting.url = it.job_apply_link;
    posting.created_at = posted.clone();
    posting.location = lenient::non_empty(it.job_location);
    posting.is_remote = Some(is_remote);
    posting.salary_min = it.job_min_salary;
    posting.salary_max = it.job_max_salary;
    posting.employment_type = lenient::non_empty(it.job_employment_type_text);
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at: parse_text(&posted),
        match_text,
        remote_flag: Some(is_remote),
    })
}

#[async_trait]
impl SourceAdapter for JSearchAdapter {
    fn source(&self) -> Source {
        Source::JSearch
    }

    fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let url = format!("{}/search", self.base_url);
        let query = [
            ("query", "developer software engineer programmer remote".to_string()),
            ("page", "1".to_string()),
            ("num_pages", "1".to_string()),
            ("country", self.country.clone()),
            ("date_posted", "today".to_string()),
        ];
        let body = get_json(&self.ctx, &url, &query, &rapidapi_headers(key, HOST)).await?;
        self.parse_listings(&body, now)
    }
}
