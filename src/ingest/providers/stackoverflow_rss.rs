// src/ingest/providers/stackoverflow_rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::ingest::filter::{Draft, Filters};
use crate::ingest::http::{get_text, AdapterCtx};
use crate::ingest::keywords::combine;
use crate::ingest::recency::{parse_text, Window};
use crate::ingest::types::{JobPosting, Source, SourceAdapter};
use crate::ingest::{normalize_text, record_listings};

pub const DEFAULT_FEED_URL: &str = "https://stackoverflow.com/jobs/feed";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    author: Option<String>,
    description: Option<String>,
}

/// Stack Overflow jobs RSS feed. No credentials.
pub struct StackOverflowRssAdapter {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, ctx: AdapterCtx },
}

impl StackOverflowRssAdapter {
    pub fn new(ctx: AdapterCtx) -> Self {
        Self::from_url(ctx, DEFAULT_FEED_URL)
    }

    pub fn from_url(ctx: AdapterCtx, url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                ctx,
            },
        }
    }

    /// Serves a fixed document instead of hitting the network.
    pub fn from_fixture_str(xml: &str) -> Self {
        Self {
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn parse_items_from_str(
        xml: &str,
        filters: &Filters,
        now: DateTime<Utc>,
    ) -> Result<Vec<JobPosting>> {
        let xml_clean = scrub_html_entities_for_xml(xml);
        let rss: Rss = from_str(&xml_clean).context("parsing stackoverflow rss xml")?;
        record_listings(Source::StackOverflow, rss.channel.item.len());

        let drafts = rss.channel.item.into_iter().filter_map(draft);
        Ok(filters.admit_all(drafts, now, Window::Hour))
    }
}

/// Stable id derived from the entry link; survives restarts.
pub fn link_id(link: &str) -> String {
    let digest = Sha256::digest(link.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn draft(it: Item) -> Option<Draft> {
    let link = it.link.filter(|l| !l.trim().is_empty())?;
    let posted_at = it.pub_date.as_deref().and_then(parse_text);
    let title = it.title.unwrap_or_default();
    let company = it.author.unwrap_or_default();
    let summary = it.description.as_deref().map(normalize_text);
    let match_text = combine(&[
        Some(title.as_str()),
        Some(company.as_str()),
        summary.as_deref(),
    ]);

    let mut posting = JobPosting::new(Source::StackOverflow, &link_id(&link));
    posting.title = title;
    posting.company = company;
    posting.created_at = posted_at
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
    posting.raw = serde_json::json!({ "link": link });
    posting.url = Some(link);

    Some(Draft {
        posting,
        posted_at,
        match_text,
        remote_flag: None,
    })
}

#[async_trait]
impl SourceAdapter for StackOverflowRssAdapter {
    fn source(&self) -> Source {
        Source::StackOverflow
    }

    async fn fetch_latest(&self, now: DateTime<Utc>) -> Result<Vec<JobPosting>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s, &Filters::default(), now),
            Mode::Http { url, ctx } => {
                let body = get_text(ctx, url, &[], &[]).await?;
                Self::parse_items_from_str(&body, &ctx.filters, now)
            }
        }
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>jobs</title>
    <item>
      <title>Senior Backend Engineer&nbsp;(Remote)</title>
      <link>https://stackoverflow.com/jobs/101/senior-backend-engineer</link>
      <pubDate>Tue, 10 Jun 2025 11:30:00 GMT</pubDate>
      <author>Acme</author>
      <description>Build &lt;b&gt;APIs&lt;/b&gt; in Rust</description>
    </item>
    <item>
      <title>Barista</title>
      <link>https://stackoverflow.com/jobs/102/barista</link>
      <pubDate>Tue, 10 Jun 2025 11:45:00 GMT</pubDate>
      <author>Cafe</author>
      <description>Coffee</description>
    </item>
    <item>
      <title>Old Frontend Role</title>
      <link>https://stackoverflow.com/jobs/103/frontend</link>
      <pubDate>Mon, 09 Jun 2025 08:00:00 GMT</pubDate>
      <author>Initech</author>
    </item>
  </channel>
</rss>"#;

    #[tokio::test]
    async fn fixture_keeps_recent_keyword_matches() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let p = StackOverflowRssAdapter::from_fixture_str(FEED);
        let out = p.fetch_latest(now).await.expect("feed parses");
        assert_eq!(out.len(), 1);
        let job = &out[0];
        assert_eq!(job.title, "Senior Backend Engineer (Remote)");
        assert_eq!(job.company, "Acme");
        assert_eq!(
            job.id,
            format!(
                "stackoverflow_{}",
                link_id("https://stackoverflow.com/jobs/101/senior-backend-engineer")
            )
        );
        assert_eq!(job.created_at, "2025-06-10T11:30:00Z");
    }

    #[test]
    fn link_id_is_stable_and_short() {
        let a = link_id("https://x.test/1");
        assert_eq!(a, link_id("https://x.test/1"));
        assert_ne!(a, link_id("https://x.test/2"));
        assert_eq!(a.len(), 12);
    }
}
