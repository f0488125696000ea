// src/notify/mod.rs
pub mod format;
pub mod telegram;

use anyhow::Result;

pub use format::{format_message, format_salary};
pub use telegram::TelegramNotifier;

/// Delivers one preformatted alert. A failure is reported to the caller,
/// which decides whether it matters.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}
