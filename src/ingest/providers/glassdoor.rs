// src/ingest/providers/glassdoor.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ingest::filter::Draft;
use crate::ingest::http::{absolutize, get_json, rapidapi_headers, typed_items, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::lenient::{self, non_empty};
use crate::ingest::record_listings;
use crate::ingest::recency::Window;
use crate::ingest::types::{Extras, JobPosting, Source, SourceAdapter};

pub const HOST: &str = "glassdoor-real-time.p.rapidapi.com";
const ORIGIN: &str = "https://www.glassdoor.com";
const URGENT_LABEL: &str = "search-jobs.urgent-jobs.new";
/// Listings without an age are treated as ancient.
const UNKNOWN_AGE_DAYS: i64 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    UnitedStates,
    Canada,
}

impl Region {
    fn source(self) -> Source {
        match self {
            Region::UnitedStates => Source::Glassdoor,
            Region::Canada => Source::GlassdoorCa,
        }
    }

    fn location(self) -> &'static str {
        match self {
            Region::UnitedStates => "United States",
            Region::Canada => "Canada",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    jobview: Option<JobView>,
}

#[derive(Debug, Deserialize)]
struct JobView {
    #[serde(default)]
    job: Job,
    #[serde(default)]
    header: Header,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Job {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    listing_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_title_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    age_in_days: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    employer_name_from_search: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    location_name: Option<String>,
    #[serde(default)]
    pay_period_adjusted_pay: Option<Pay>,
    #[serde(default)]
    indeed_job_attribute: Option<IndeedAttr>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    easy_apply: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    job_view_url: Option<String>,
    #[serde(default)]
    urgency_signal: Option<Urgency>,
}

#[derive(Debug, Deserialize)]
struct Pay {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    p10: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    p90: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndeedAttr {
    #[serde(default)]
    extracted_job_attributes: Vec<Attr>,
}

#[derive(Debug, Deserialize)]
struct Attr {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Urgency {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    label_key: Option<String>,
}

/// Glassdoor real-time search (RapidAPI). One instance per region; both share
/// the same key.
pub struct GlassdoorAdapter {
    ctx: AdapterCtx,
    api_key: Option<String>,
    region: Region,
    base_url: String,
}

impl GlassdoorAdapter {
    pub fn new(ctx: AdapterCtx, api_key: Option<String>, region: Region) -> Self {
        Self {
            ctx,
            api_key,
            region,
            base_url: format!("https://{HOST}"),
        }
    }

    pub fn us(ctx: AdapterCtx, api_key: Option<String>) -> Self {
        Self::new(ctx, api_key, Region::UnitedStates)
    }

    pub fn canada(ctx: AdapterCtx, api_key: Option<String>) -> Self {
        Self::new(ctx, api_key, Region::Canada)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// `{data: {jobListings: [{jobview: {job, header}}]}}`. Any other shape yields nothing.
    pub fn parse_listings(&self, body: &Value, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        let source = self.region.source();
        let items = body
            .get("data")
            .and_then(|d| d.get("jobListings"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        record_listings(source, items.len());

        let drafts = typed_items::<Listing>(items, source.as_str())
            .into_iter()
            .filter_map(|(it, raw)| draft(source, it, raw, now));
        Ok(self.ctx.filters.admit_all(drafts, now, Window::Week))
    }
}

fn draft(source: Source, it: Listing, raw: Value, now: DateTime<Utc>) -> Option<Draft> {
    let JobView { job, header } = it.jobview?;
    let native = job.listing_id?;
    let age_days = header.age_in_days.unwrap_or(UNKNOWN_AGE_DAYS);
    let posted_at = Duration::try_days(age_days).and_then(|d| now.checked_sub_signed(d));

    let title = job.job_title_text.unwrap_or_default();
    let company = header.employer_name_from_search.unwrap_or_default();
    let location = header.location_name.unwrap_or_default();
    let (salary_min, salary_max) = header
        .pay_period_adjusted_pay
        .map(|p| (p.p10, p.p90))
        .unwrap_or((None, None));
    let job_type = header
        .indeed_job_attribute
        .and_then(|a| a.extracted_job_attributes.into_iter().next())
        .and_then(|a| a.value);
    let is_urgent = header
        .urgency_signal
        .and_then(|u| u.label_key)
        .is_some_and(|k| k == URGENT_LABEL);
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        Some(location.as_str()),
    ]);

    let mut posting = JobPosting::new(source, &native);
    posting.title = title;
    posting.company = company;
    posting.url = absolutize(header.job_view_url, ORIGIN);
    // only an age is known, so the display time is the moment we saw it
    posting.created_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    posting.location = non_empty(Some(location));
    posting.salary_min = salary_min;
    posting.salary_max = salary_max;
    posting.extras = Extras::Glassdoor {
        rating: header.rating,
        job_type: non_empty(job_type),
        easy_apply: header.easy_apply.unwrap_or(false),
        is_urgent,
        age_days: Some(age_days),
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
impl SourceAdapter for GlassdoorAdapter {
    fn source(&self) -> Source {
        self.region.source()
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
            ("query", "developer software engineer programmer remote".to_string()),
            ("location", self.region.location().to_string()),
        ];
        let body = get_json(&self.ctx, &url, &query, &rapidapi_headers(key, HOST)).await?;
        self.parse_listings(&body, now)
    }
}
