// src/ingest/providers/active_jobs.rs
use anyhow::{bail, Result};
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

pub const HOST: &str = "active-jobs-db.p.rapidapi.com";

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    date_posted: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    organization: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    locations_derived: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    remote_derived: Option<bool>,
    /// JSON document encoded as a string.
    #[serde(default)]
    salary_raw: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    employment_type: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    url: Option<String>,
}

/// Active Jobs DB (RapidAPI), ATS postings from the last hour.
pub struct ActiveJobsAdapter {
    ctx: AdapterCtx,
    api_key: Option<String>,
    base_url: String,
}

impl ActiveJobsAdapter {
    pub fn new(ctx: AdapterCtx, api_key: Option<String>) -> Self {
        Self {
            ctx,
            api_key,
            base_url: format!("https://{HOST}"),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn parse_listings(&self, body: &Value, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let Some(items) = body.as_array() else {
            bail!("active_jobs: expected a top-level array");
        };
        record_listings(Source::ActiveJobs, items.len());

        let drafts = typed_items::<Item>(items, "active_jobs")
            .into_iter()
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Hour))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.id?;
    let posted = it.date_posted.unwrap_or_default();
    let is_remote = it.remote_derived.unwrap_or(false);
    let title = it.title.unwrap_or_default();
    let company = it.organization.unwrap_or_default();
    let location = it.locations_derived.join(", ");
    let (salary_min, salary_max) = lenient::salary_range(it.salary_raw.as_ref());
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        Some(location.as_str()),
    ]);

    let mut posting = JobPosting::new(Source::ActiveJobs, &native);
    posting.title = title;
    posting.company = company;
    posting.url = it.url;
    posting.created_at = posted.clone();
    posting.location = lenient::non_empty(Some(location));
    posting.is_remote = Some(is_remote);
    posting.salary_min = salary_min;
    posting.salary_max = salary_max;
    posting.employment_type = lenient::non_empty(Some(it.employment_type.join(", ")));
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at: parse_text(&posted),
        match_text,
        remote_flag: Some(is_remote),
    })
}

#[async_trait]
impl SourceAdapter for ActiveJobsAdapter {
    fn source(&self) -> Source {
        Source::ActiveJobs
    }

    fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let url = format!("{}/active-ats-1h", self.base_url);
        let query = [
            ("offset", "0".to_string()),
            (
                "title_filter",
                "developer OR engineer OR programmer OR software".to_string(),
            ),
            (
                "location_filter",
                "United States OR Canada OR Remote OR US OR America".to_string(),
            ),
            ("description_type", "text".to_string()),
        ];
        let body = get_json(&self.ctx, &url, &query, &rapidapi_headers(key, HOST)).await?;
        self.parse_listings(&body, now)
    }
}
