//! Runs a single adapter once against the live provider and prints what it keeps.
//! Usage: source_probe <source>

use anyhow::{anyhow, Result};
use chrono::Utc;
use jobwatch::ingest::providers;
use jobwatch::{adapter_ctx, init_tracing, AppConfig, Source};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.log_format);

    let tag = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: source_probe <source>"))?;
    let source = Source::parse(&tag).ok_or_else(|| {
        let known: Vec<&str> = Source::ALL.iter().map(|s| s.as_str()).collect();
        anyhow!("unknown source `{tag}`; one of: {}", known.join(", "))
    })?;

    let ctx = adapter_ctx(&cfg)?;
    let adapter = providers::build(source, &cfg, &ctx);
    if !adapter.enabled() {
        return Err(anyhow!("{source} has no credentials configured"));
    }

    let jobs = adapter.fetch_latest(Utc::now()).await?;
    println!("{source}: {} candidate(s)", jobs.len());
    for j in &jobs {
        println!(
            "- {} | {} | {} | {}",
            j.id,
            j.title,
            j.company,
            j.url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
