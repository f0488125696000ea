// src/ingest/providers/linkedin.rs
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::filter::Draft;
use crate::ingest::http::{get_json, rapidapi_headers, typed_items, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::lenient::{self, non_empty};
use crate::ingest::record_listings;
use crate::ingest::recency::{parse_text, Window};
use crate::ingest::types::{Extras, JobPosting, Source, SourceAdapter};

pub const HOST: &str = "linkedin-job-search-api.p.rapidapi.com";

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
    #[serde(default)]
    salary_raw: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    employment_type: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    linkedin_org_size: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    linkedin_org_industry: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    linkedin_org_employees: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    recruiter_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    recruiter_title: Option<String>,
}

/// LinkedIn job search (RapidAPI), postings from the last 24 hours with
/// company and recruiter details.
pub struct LinkedInAdapter {
    ctx: AdapterCtx,
    api_key: Option<String>,
    base_url: String,
}

impl LinkedInAdapter {
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
            bail!("linkedin: expected a top-level array");
        };
        record_listings(Source::LinkedIn, items.len());

        let drafts = typed_items::<Item>(items, "linkedin")
            .into_iter()
            .filter_map(|(it, raw)| draft(it, raw));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Day))
    }
}

fn draft(it: Item, raw: Value) -> Option<Draft> {
    let native = it.id?;
    let posted = it.date_posted.unwrap_or_default();
    let is_remote = it.remote_derived.unwrap_or(false);
    let title = it.title.unwrap_or_default();
    let company = it.organization.unwrap_or_default();
    let location = it.locations_derived.join(", ");
    // Only the object form carries a salary here.
    let (salary_min, salary_max) = match &it.salary_raw {
        Some(v @ Value::Object(_)) => lenient::salary_range(Some(v)),
        _ => (None, None),
    };
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        Some(location.as_str()),
        it.linkedin_org_industry.as_deref(),
    ]);

    let mut posting = JobPosting::new(Source::LinkedIn, &native);
    posting.title = title;
    posting.company = company;
    posting.url = it.url;
    posting.created_at = posted.clone();
    posting.location = non_empty(Some(location));
    posting.is_remote = Some(is_remote);
    posting.salary_min = salary_min;
    posting.salary_max = salary_max;
    posting.employment_type = non_empty(Some(it.employment_type.join(", ")));
    posting.extras = Extras::LinkedIn {
        company_size: non_empty(it.linkedin_org_size),
        company_industry: non_empty(it.linkedin_org_industry),
        company_employees: non_empty(it.linkedin_org_employees),
        recruiter_name: non_empty(it.recruiter_name),
        recruiter_title: non_empty(it.recruiter_title),
    };
    posting.raw = raw;

    Some(Draft {
        posting,
        posted_at: parse_text(&posted),
        match_text,
        remote_flag: Some(is_remote),
    })
}

#[async_trait]
impl SourceAdapter for LinkedInAdapter {
    fn source(&self) -> Source {
        Source::LinkedIn
    }

    fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let url = format!("{}/active-jb-24h", self.base_url);
        let query = [
            ("limit", "50".to_string()),
            ("offset", "0".to_string()),
            (
                "title_filter",
                "developer OR engineer OR programmer OR software".to_string(),
            ),
            (
                "location_filter",
                "United States OR United Kingdom OR Canada OR Remote".to_string(),
            ),
        ];
        let body = get_json(&self.ctx, &url, &query, &rapidapi_headers(key, HOST)).await?;
        self.parse_listings(&body, now)
    }
}
