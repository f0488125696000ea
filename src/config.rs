// src/config.rs
//! Process configuration, read once at startup and never mutated.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::ingest::providers::adzuna::AdzunaCredentials;

pub const DEFAULT_POLL_SECONDS: u64 = 120;
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_MAX_YEARS_EXP: u32 = 5;
pub const DEFAULT_DB_PATH: &str = "/app/seen_jobs.db";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
/// Retention shorter than the widest recency window would re-notify.
pub const MIN_RETENTION_DAYS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Optional provider credentials. `None` disables the adapter.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub jsearch: Option<String>,
    pub active_jobs: Option<String>,
    pub linkedin: Option<String>,
    pub glassdoor: Option<String>,
    pub indeed: Option<String>,
    pub adzuna: Option<AdzunaCredentials>,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub poll_interval: Duration,
    pub country: String,
    pub remote_only: bool,
    pub max_years_exp: u32,
    pub db_path: PathBuf,
    pub telegram: Option<TelegramConfig>,
    pub fetch_timeout: Duration,
    pub keywords_path: Option<PathBuf>,
    pub metrics_addr: Option<SocketAddr>,
    pub seen_retention_days: Option<u32>,
    pub log_format: LogFormat,
    pub keys: ProviderKeys,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let telegram = match (get("TELEGRAM_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(token), Some(chat_id)) => Some(TelegramConfig { token, chat_id }),
            _ => None,
        };

        let adzuna = match (get("ADZUNA_APP_ID"), get("ADZUNA_APP_KEY")) {
            (Some(app_id), Some(app_key)) => Some(AdzunaCredentials { app_id, app_key }),
            _ => None,
        };

        let seen_retention_days = parse_opt::<u32>(&get, "SEEN_RETENTION_DAYS")?;
        if let Some(d) = seen_retention_days {
            if d < MIN_RETENTION_DAYS {
                bail!("SEEN_RETENTION_DAYS must be at least {MIN_RETENTION_DAYS}, got {d}");
            }
        }

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Text,
            Some(f) if f == "text" => LogFormat::Text,
            Some(f) if f == "json" => LogFormat::Json,
            Some(other) => bail!("LOG_FORMAT must be `text` or `json`, got `{other}`"),
        };

        Ok(Self {
            poll_interval: Duration::from_secs(
                parse_opt(&get, "POLL_SECONDS")?.unwrap_or(DEFAULT_POLL_SECONDS),
            ),
            country: get("COUNTRY")
                .map(|c| c.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            remote_only: get("REMOTE_ONLY").map_or(true, |v| v == "1"),
            max_years_exp: parse_opt(&get, "MAX_YEARS_EXP")?.unwrap_or(DEFAULT_MAX_YEARS_EXP),
            db_path: get("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            telegram,
            fetch_timeout: Duration::from_secs(
                parse_opt(&get, "FETCH_TIMEOUT_SECS")?.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            ),
            keywords_path: get("KEYWORDS_PATH").map(PathBuf::from),
            metrics_addr: parse_opt(&get, "METRICS_ADDR")?,
            seen_retention_days,
            log_format,
            keys: ProviderKeys {
                jsearch: get("JSEARCH_API_KEY"),
                active_jobs: get("ACTIVE_JOBS_API_KEY"),
                linkedin: get("LINKEDIN_JOBS_API_KEY"),
                glassdoor: get("GLASSDOOR_API_KEY"),
                indeed: get("INDEED_API_KEY"),
                adzuna,
            },
        })
    }
}

fn parse_opt<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    get(key)
        .map(|v| {
            v.parse::<T>()
                .with_context(|| format!("invalid value for {key}: `{v}`"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(move |k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let c = cfg(&[]).unwrap();
        assert_eq!(c.poll_interval, Duration::from_secs(120));
        assert_eq!(c.country, "us");
        assert!(c.remote_only);
        assert_eq!(c.max_years_exp, 5);
        assert_eq!(c.db_path, PathBuf::from("/app/seen_jobs.db"));
        assert!(c.telegram.is_none());
        assert_eq!(c.fetch_timeout, Duration::from_secs(15));
        assert_eq!(c.log_format, LogFormat::Text);
        assert!(c.keys.jsearch.is_none());
        assert!(c.keys.adzuna.is_none());
    }

    #[test]
    fn empty_values_count_as_absent() {
        let c = cfg(&[("TELEGRAM_TOKEN", "t"), ("TELEGRAM_CHAT_ID", ""), ("POLL_SECONDS", " ")])
            .unwrap();
        assert!(c.telegram.is_none());
        assert_eq!(c.poll_interval, Duration::from_secs(120));
    }

    #[test]
    fn remote_only_is_exactly_one() {
        assert!(!cfg(&[("REMOTE_ONLY", "0")]).unwrap().remote_only);
        assert!(!cfg(&[("REMOTE_ONLY", "yes")]).unwrap().remote_only);
        assert!(cfg(&[("REMOTE_ONLY", "1")]).unwrap().remote_only);
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = cfg(&[("POLL_SECONDS", "soon")]).unwrap_err();
        assert!(format!("{err:#}").contains("POLL_SECONDS"));
    }

    #[test]
    fn short_retention_rejected() {
        assert!(cfg(&[("SEEN_RETENTION_DAYS", "3")]).is_err());
        let c = cfg(&[("SEEN_RETENTION_DAYS", "30")]).unwrap();
        assert_eq!(c.seen_retention_days, Some(30));
    }

    #[test]
    fn adzuna_needs_both_halves() {
        assert!(cfg(&[("ADZUNA_APP_ID", "id")]).unwrap().keys.adzuna.is_none());
        let c = cfg(&[("ADZUNA_APP_ID", "id"), ("ADZUNA_APP_KEY", "k")]).unwrap();
        assert_eq!(c.keys.adzuna.unwrap().app_key, "k");
    }
}
