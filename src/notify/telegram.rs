// src/notify/telegram.rs
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use super::Notifier;
use crate::config::TelegramConfig;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram Bot API `sendMessage`. Without credentials every send is logged
/// and reported as delivered.
pub struct TelegramNotifier {
    creds: Option<TelegramConfig>,
    api_base: String,
    client: Client,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(creds: Option<TelegramConfig>) -> Self {
        Self {
            creds,
            api_base: DEFAULT_API_BASE.to_string(),
            client: Client::new(),
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Builder for tests/tools pointing at a local server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Upper bound on one `sendMessage` round trip.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.creds.is_some()
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let Some(creds) = &self.creds else {
            tracing::info!(message = text, "Telegram not configured; logging instead");
            return Ok(());
        };

        let url = format!("{}/bot{}/sendMessage", self.api_base, creds.token);
        let body = serde_json::json!({
            "chat_id": creds.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        self.client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("telegram post")?
            .error_for_status()
            .context("telegram non-2xx")?;
        Ok(())
    }
}
