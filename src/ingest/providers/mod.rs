// src/ingest/providers/mod.rs
pub mod active_jobs;
pub mod adzuna;
pub mod angellist;
pub mod authentic;
pub mod glassdoor;
pub mod indeed;
pub mod jsearch;
pub mod linkedin;
pub mod remoteok;
pub mod stackoverflow_rss;

use crate::config::AppConfig;
use crate::ingest::http::AdapterCtx;
use crate::ingest::types::{Source, SourceAdapter};

use self::{
    active_jobs::ActiveJobsAdapter, adzuna::AdzunaAdapter, angellist::AngelListAdapter,
    authentic::AuthenticAdapter, glassdoor::GlassdoorAdapter, indeed::IndeedAdapter,
    jsearch::JSearchAdapter, linkedin::LinkedInAdapter, remoteok::RemoteOkAdapter,
    stackoverflow_rss::StackOverflowRssAdapter,
};

/// One adapter for `source`, wired from the immutable config.
pub fn build(source: Source, cfg: &AppConfig, ctx: &AdapterCtx) -> Box<dyn SourceAdapter> {
    let keys = &cfg.keys;
    let ctx = ctx.clone();
    match source {
        Source::RemoteOk => Box::new(RemoteOkAdapter::new(ctx)),
        Source::JSearch => Box::new(JSearchAdapter::new(ctx, keys.jsearch.clone(), &cfg.country)),
        Source::ActiveJobs => Box::new(ActiveJobsAdapter::new(ctx, keys.active_jobs.clone())),
        Source::LinkedIn => Box::new(LinkedInAdapter::new(ctx, keys.linkedin.clone())),
        Source::Glassdoor => Box::new(GlassdoorAdapter::us(ctx, keys.glassdoor.clone())),
        Source::GlassdoorCa => Box::new(GlassdoorAdapter::canada(ctx, keys.glassdoor.clone())),
        Source::Indeed => Box::new(IndeedAdapter::new(ctx, keys.indeed.clone())),
        Source::Authentic => Box::new(AuthenticAdapter::new(ctx)),
        Source::AngelList => Box::new(AngelListAdapter::new(ctx)),
        Source::StackOverflow => Box::new(StackOverflowRssAdapter::new(ctx)),
        Source::Adzuna => Box::new(AdzunaAdapter::new(ctx, keys.adzuna.clone(), &cfg.country)),
    }
}

/// Every known adapter, in notification order. Disabled ones are kept so the
/// cycle can report them as skipped.
pub fn build_all(cfg: &AppConfig, ctx: &AdapterCtx) -> Vec<Box<dyn SourceAdapter>> {
    Source::ALL
        .into_iter()
        .map(|s| build(s, cfg, ctx))
        .collect()
}
