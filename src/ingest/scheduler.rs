// src/ingest/scheduler.rs
//! Collect → dedup → notify → remember, once per cycle, forever.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};

use crate::ingest::types::SourceAdapter;
use crate::ingest::{ensure_metrics_described, run_once};
use crate::notify::{format_message, Notifier};
use crate::store::{SeenRecord, SeenStore};

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Candidates produced by all adapters, before dedup.
    pub candidates: usize,
    /// Candidates not seen before; each was notified (or attempted) and recorded.
    pub new: usize,
    pub notify_failures: usize,
}

pub struct Pipeline {
    adapters: Vec<Box<dyn SourceAdapter>>,
    store: SeenStore,
    notifier: Arc<dyn Notifier>,
    fetch_timeout: Duration,
    retention_days: Option<u32>,
}

impl Pipeline {
    pub fn new(
        adapters: Vec<Box<dyn SourceAdapter>>,
        store: SeenStore,
        notifier: Arc<dyn Notifier>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            adapters,
            store,
            notifier,
            fetch_timeout,
            retention_days: None,
        }
    }

    pub fn with_retention_days(mut self, days: Option<u32>) -> Self {
        self.retention_days = days;
        self
    }

    pub fn store(&self) -> &SeenStore {
        &self.store
    }

    /// One pass. Adapter failures are absorbed during collection; a store
    /// failure aborts the rest of the cycle. Each send is bounded by the
    /// fetch timeout.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<CycleReport> {
        ensure_metrics_described();

        if let Some(days) = self.retention_days {
            let pruned = self.store.prune_older_than(days, now).await?;
            if pruned > 0 {
                tracing::debug!(pruned, days, "pruned old seen records");
            }
        }

        let (found, _outcomes) = run_once(&self.adapters, now, self.fetch_timeout).await;
        let mut report = CycleReport {
            candidates: found.len(),
            ..Default::default()
        };
        tracing::info!(total = found.len(), "total matches");

        for job in &found {
            if self.store.has(&job.id).await? {
                continue;
            }
            report.new += 1;

            let text = format_message(job);
            let sent = tokio::time::timeout(self.fetch_timeout, self.notifier.send(&text))
                .await
                .unwrap_or_else(|_| Err(anyhow!("notifier timed out after {:?}", self.fetch_timeout)));
            match sent {
                Ok(()) => {
                    counter!("notify_sent_total").increment(1);
                    tracing::info!(id = %job.id, "notified");
                }
                Err(e) => {
                    counter!("notify_errors_total").increment(1);
                    report.notify_failures += 1;
                    tracing::warn!(error = ?e, id = %job.id, "notification failed");
                }
            }

            self.store.put(&SeenRecord::from(job)).await?;
        }

        if report.new == 0 {
            tracing::info!("no new jobs this round");
        } else {
            tracing::info!(new = report.new, failures = report.notify_failures, "new jobs found");
        }
        gauge!("pipeline_last_run_ts").set(now.timestamp() as f64);
        Ok(report)
    }

    /// Runs cycles back to back with `interval` between them until `shutdown`
    /// resolves. Only the sleep observes shutdown; a started cycle finishes.
    /// Returns the number of cycles run.
    pub async fn run_forever<F>(&self, interval: Duration, shutdown: F) -> u64
    where
        F: Future,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0u64;
        loop {
            if let Err(e) = self.run_cycle(Utc::now()).await {
                counter!("cycle_errors_total").increment(1);
                tracing::error!(error = ?e, "cycle failed");
            }
            cycles += 1;

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(cycles, "shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
        cycles
    }
}
