// src/ingest/providers/indeed.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::filter::Draft;
use crate::ingest::http::{absolutize, get_json, rapidapi_headers, typed_items, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::lenient::{self, non_empty};
use crate::ingest::record_listings;
use crate::ingest::recency::{RawTimestamp, Window};
use crate::ingest::types::{Extras, JobPosting, Source, SourceAdapter};

pub const HOST: &str = "indeed12.p.rapidapi.com";
const ORIGIN: &str = "https://www.indeed.com";

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub_date_ts_milli: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    location: Option<String>,
    #[serde(default)]
    salary: Option<Salary>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    formatted_relative_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Salary {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    max: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    kind: Option<String>,
}

/// Indeed search (RapidAPI). Publication time arrives as epoch milliseconds.
pub struct IndeedAdapter {
    ctx: AdapterCtx,
    api_key: Option<String>,
    base_url: String,
}

impl IndeedAdapter {
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
        let items = body
            .get("hits")
            .and_then(Value::as_array)
            .context("indeed: missing `hits` array")?;
        record_listings(Source::Indeed, items.len());

        let drafts = typed_items::<Item>(items, "indeed")
            .into_iter()
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Hour))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.id?;
    let posted_at = it
        .pub_date_ts_milli
        .filter(|ms| *ms > 0)
        .and_then(|ms| RawTimestamp::EpochMillis(ms).to_instant());
    let title = it.title.unwrap_or_default();
    let company = it.company_name.unwrap_or_default();
    let location = it.location.unwrap_or_default();
    let (salary_min, salary_max, salary_type) = match it.salary {
        Some(s) => (s.min, s.max, s.kind),
        None => (None, None, None),
    };
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        Some(location.as_str()),
    ]);

    let mut posting = JobPosting::new(Source::Indeed, &native);
    posting.title = title;
    posting.company = company;
    posting.url = absolutize(it.link, ORIGIN);
    posting.created_at = posted_at
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
    posting.location = non_empty(Some(location));
    posting.salary_min = salary_min;
    posting.salary_max = salary_max;
    posting.extras = Extras::Indeed {
        relative_time: non_empty(it.formatted_relative_time),
        salary_type: non_empty(salary_type),
    };
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at,
        match_text,
        remote_flag: None,
    })
}

#[async_trait]
impl SourceAdapter for IndeedAdapter {
    fn source(&self) -> Source {
        Source::Indeed
    }

    fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let url = format!("{}/jobs/search", self.base_url);
        let query = [
            ("query", "developer".to_string()),
            ("location", "United States".to_string()),
            ("page_id", "1".to_string()),
            ("locality", "us".to_string()),
            ("fromage", "1".to_string()),
            ("radius", "50".to_string()),
            ("sort", "date".to_string()),
        ];
        let body = get_json(&self.ctx, &url, &query, &rapidapi_headers(key, HOST)).await?;
        self.parse_listings(&body, now)
    }
}
