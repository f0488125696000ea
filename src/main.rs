//! Job watcher daemon entrypoint.
//! Reads config, opens the seen store and polls every provider until Ctrl-C.

use anyhow::Result;
use jobwatch::metrics::Metrics;
use jobwatch::{build_pipeline, init_tracing, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.log_format);

    if let Some(addr) = cfg.metrics_addr {
        let metrics = Metrics::init()?;
        metrics.serve(addr).await?;
    }

    if cfg.telegram.is_none() {
        tracing::warn!("TELEGRAM_TOKEN/TELEGRAM_CHAT_ID not set; alerts will only be logged");
    }
    tracing::info!(
        poll_secs = cfg.poll_interval.as_secs(),
        country = %cfg.country,
        remote_only = cfg.remote_only,
        max_years_exp = cfg.max_years_exp,
        db = %cfg.db_path.display(),
        "starting job watcher"
    );

    // Store failures here are fatal.
    let pipeline = build_pipeline(&cfg).await?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = ?e, "ctrl-c handler failed");
        }
    };
    pipeline.run_forever(cfg.poll_interval, shutdown).await;
    pipeline.store().close().await;
    Ok(())
}
