// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Originating adapter of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    RemoteOk,
    JSearch,
    ActiveJobs,
    LinkedIn,
    Glassdoor,
    GlassdoorCa,
    Indeed,
    Authentic,
    AngelList,
    StackOverflow,
    Adzuna,
}

impl Source {
    pub const ALL: [Source; 11] = [
        Source::RemoteOk,
        Source::JSearch,
        Source::ActiveJobs,
        Source::LinkedIn,
        Source::Glassdoor,
        Source::GlassdoorCa,
        Source::Indeed,
        Source::Authentic,
        Source::AngelList,
        Source::StackOverflow,
        Source::Adzuna,
    ];

    /// Tag shown in notifications and stored in the seen table.
    pub fn as_str(self) -> &'static str {
        match self {
            Source::RemoteOk => "remoteok",
            Source::JSearch => "jsearch",
            Source::ActiveJobs => "active_jobs",
            Source::LinkedIn => "linkedin",
            Source::Glassdoor => "glassdoor",
            Source::GlassdoorCa => "glassdoor_ca",
            Source::Indeed => "indeed",
            Source::Authentic => "authentic",
            Source::AngelList => "angellist",
            Source::StackOverflow => "stackoverflow",
            Source::Adzuna => "adzuna",
        }
    }

    /// Prefix glued to the provider's native id. Differs from the tag for Active Jobs.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Source::ActiveJobs => "active_",
            Source::RemoteOk => "remoteok_",
            Source::JSearch => "jsearch_",
            Source::LinkedIn => "linkedin_",
            Source::Glassdoor => "glassdoor_",
            Source::GlassdoorCa => "glassdoor_ca_",
            Source::Indeed => "indeed_",
            Source::Authentic => "authentic_",
            Source::AngelList => "angellist_",
            Source::StackOverflow => "stackoverflow_",
            Source::Adzuna => "adzuna_",
        }
    }

    pub fn posting_id(self, native: &str) -> String {
        format!("{}{}", self.id_prefix(), native)
    }

    pub fn parse(s: &str) -> Option<Source> {
        let s = s.trim();
        Source::ALL
            .into_iter()
            .find(|src| src.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-specific enrichment rendered as its own notification block.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Extras {
    #[default]
    None,
    LinkedIn {
        company_size: Option<String>,
        company_industry: Option<String>,
        company_employees: Option<String>,
        recruiter_name: Option<String>,
        recruiter_title: Option<String>,
    },
    Glassdoor {
        rating: Option<f64>,
        job_type: Option<String>,
        easy_apply: bool,
        is_urgent: bool,
        age_days: Option<i64>,
    },
    Indeed {
        relative_time: Option<String>,
        salary_type: Option<String>,
    },
}

/// Canonical record every adapter normalizes into. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub id: String,
    pub source: Source,
    pub title: String,
    pub company: String,
    pub url: Option<String>,
    /// Display timestamp; never re-parsed after the recency gate.
    pub created_at: String,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub employment_type: Option<String>,
    pub extras: Extras,
    /// Original provider record, kept for debugging only.
    pub raw: serde_json::Value,
}

impl JobPosting {
    pub fn new(source: Source, native_id: &str) -> Self {
        Self {
            id: source.posting_id(native_id),
            source,
            title: String::new(),
            company: String::new(),
            url: None,
            created_at: String::new(),
            location: None,
            is_remote: None,
            salary_min: None,
            salary_max: None,
            employment_type: None,
            extras: Extras::None,
            raw: serde_json::Value::Null,
        }
    }
}

/// One provider. Implementations fetch a single page, normalize, and filter.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    fn name(&self) -> &'static str {
        self.source().as_str()
    }

    /// `false` when credentials are missing; disabled adapters are skipped.
    fn enabled(&self) -> bool {
        true
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_with_source() {
        assert_eq!(Source::RemoteOk.posting_id("42"), "remoteok_42");
        assert_eq!(Source::ActiveJobs.posting_id("7"), "active_7");
        assert_eq!(Source::GlassdoorCa.posting_id("9"), "glassdoor_ca_9");
    }

    #[test]
    fn parse_roundtrips_every_tag() {
        for s in Source::ALL {
            assert_eq!(Source::parse(s.as_str()), Some(s));
        }
        assert_eq!(Source::parse("LinkedIn"), Some(Source::LinkedIn));
        assert_eq!(Source::parse("monster"), None);
    }
}
