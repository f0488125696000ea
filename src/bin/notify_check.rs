//! Sends one test alert through the configured notifier (logs only when Telegram is unset).

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use jobwatch::notify::format_message;
use jobwatch::{init_tracing, AppConfig, JobPosting, Notifier, Source, TelegramNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.log_format);

    let notifier = TelegramNotifier::new(cfg.telegram.clone());
    if !notifier.is_configured() {
        tracing::warn!("Telegram not configured; the message below is only logged");
    }

    let mut job = JobPosting::new(Source::RemoteOk, "notify_check");
    job.title = "Connectivity check".into();
    job.company = "jobwatch".into();
    job.created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    notifier.send(&format_message(&job)).await?;
    println!("notify-check done");
    Ok(())
}
