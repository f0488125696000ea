// src/ingest/filter.rs
//! Gates shared by every adapter: recency, then remote-only, then keywords.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::ingest::keywords::KeywordMatcher;
use crate::ingest::recency::{is_recent_opt, Window};
use crate::ingest::types::JobPosting;

/// Filtering knobs every adapter receives by reference.
#[derive(Debug, Clone)]
pub struct Filters {
    pub matcher: Arc<KeywordMatcher>,
    pub remote_only: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            matcher: Arc::new(KeywordMatcher::default()),
            remote_only: false,
        }
    }
}

/// A normalized listing that has not been gated yet.
#[derive(Debug, Clone)]
pub struct Draft {
    pub posting: JobPosting,
    pub posted_at: Option<DateTime<Utc>>,
    /// Text the keyword gate looks at.
    pub match_text: String,
    /// Set only by providers that report a remote flag.
    pub remote_flag: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Stale,
    NotRemote,
    NoKeyword,
}

impl Filters {
    pub fn verdict(&self, draft: &Draft, now: DateTime<Utc>, window: Window) -> Verdict {
        if !is_recent_opt(draft.posted_at, now, window) {
            return Verdict::Stale;
        }
        if self.remote_only && draft.remote_flag == Some(false) {
            return Verdict::NotRemote;
        }
        if !self.matcher.matches(&draft.match_text) {
            return Verdict::NoKeyword;
        }
        Verdict::Keep
    }

    /// Runs every draft through the gates and keeps the survivors, in order.
    pub fn admit_all(
        &self,
        drafts: impl IntoIterator<Item = Draft>,
        now: DateTime<Utc>,
        window: Window,
    ) -> Vec<JobPosting> {
        let mut out = Vec::new();
        for d in drafts {
            match self.verdict(&d, now, window) {
                Verdict::Keep => out.push(d.posting),
                other => {
                    tracing::trace!(id = %d.posting.id, verdict = ?other, "listing dropped");
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::Source;
    use chrono::{Duration, TimeZone};

    fn draft(mins_ago: i64, text: &str, remote: Option<bool>) -> (Draft, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let d = Draft {
            posting: JobPosting::new(Source::JSearch, "1"),
            posted_at: Some(now - Duration::minutes(mins_ago)),
            match_text: text.to_string(),
            remote_flag: remote,
        };
        (d, now)
    }

    #[test]
    fn gates_apply_in_order() {
        let f = Filters {
            remote_only: true,
            ..Filters::default()
        };
        let (d, now) = draft(90, "react", Some(true));
        assert_eq!(f.verdict(&d, now, Window::Hour), Verdict::Stale);
        let (d, now) = draft(5, "react", Some(false));
        assert_eq!(f.verdict(&d, now, Window::Hour), Verdict::NotRemote);
        let (d, now) = draft(5, "plumber", Some(true));
        assert_eq!(f.verdict(&d, now, Window::Hour), Verdict::NoKeyword);
        let (d, now) = draft(5, "react", Some(true));
        assert_eq!(f.verdict(&d, now, Window::Hour), Verdict::Keep);
    }

    #[test]
    fn remote_gate_ignores_sources_without_flag() {
        let f = Filters {
            remote_only: true,
            ..Filters::default()
        };
        let (d, now) = draft(5, "backend", None);
        assert_eq!(f.verdict(&d, now, Window::Hour), Verdict::Keep);
    }

    #[test]
    fn missing_timestamp_is_stale() {
        let f = Filters::default();
        let (mut d, now) = draft(5, "backend", None);
        d.posted_at = None;
        assert_eq!(f.verdict(&d, now, Window::Week), Verdict::Stale);
    }
}
