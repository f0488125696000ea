// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod store;

pub use crate::config::AppConfig;
pub use crate::ingest::scheduler::{CycleReport, Pipeline};
pub use crate::ingest::types::{JobPosting, Source, SourceAdapter};
pub use crate::notify::{Notifier, TelegramNotifier};
pub use crate::store::SeenStore;

use std::sync::Arc;

use anyhow::Result;

use crate::config::LogFormat;
use crate::ingest::filter::Filters;
use crate::ingest::http::AdapterCtx;
use crate::ingest::keywords::KeywordMatcher;

/// Install the global subscriber: `RUST_LOG` directives, text or JSON lines.
pub fn init_tracing(format: &LogFormat) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    let res = match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer().compact()).try_init(),
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}

/// Shared adapter context from config: keyword list, remote gate, HTTP client.
pub fn adapter_ctx(cfg: &AppConfig) -> Result<AdapterCtx> {
    let keywords = ingest::config::load_keywords(cfg.keywords_path.as_deref())?;
    let filters = Filters {
        matcher: Arc::new(KeywordMatcher::new(keywords)),
        remote_only: cfg.remote_only,
    };
    AdapterCtx::new(filters, cfg.fetch_timeout)
}

/// Assemble the daemon pipeline from config.
pub async fn build_pipeline(cfg: &AppConfig) -> Result<Pipeline> {
    let store = SeenStore::open(&cfg.db_path).await?;
    let ctx = adapter_ctx(cfg)?;
    let adapters = ingest::providers::build_all(cfg, &ctx);
    let notifier: Arc<dyn Notifier> = Arc::new(
        TelegramNotifier::new(cfg.telegram.clone())
            .with_client(ctx.client.clone())
            .with_timeout(cfg.fetch_timeout),
    );
    Ok(Pipeline::new(adapters, store, notifier, cfg.fetch_timeout)
        .with_retention_days(cfg.seen_retention_days))
}
