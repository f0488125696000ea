// tests/config_env.rs
use std::env;
use std::time::Duration;

use jobwatch::config::LogFormat;
use jobwatch::AppConfig;
use serial_test::serial;

const VARS: &[&str] = &[
    "POLL_SECONDS",
    "COUNTRY",
    "REMOTE_ONLY",
    "DB_PATH",
    "TELEGRAM_TOKEN",
    "TELEGRAM_CHAT_ID",
    "LOG_FORMAT",
    "JSEARCH_API_KEY",
    "METRICS_ADDR",
];

fn clear() {
    for v in VARS {
        env::remove_var(v);
    }
}

#[test]
#[serial]
fn reads_process_environment() {
    clear();
    env::set_var("POLL_SECONDS", "30");
    env::set_var("COUNTRY", "GB");
    env::set_var("REMOTE_ONLY", "0");
    env::set_var("TELEGRAM_TOKEN", "tok");
    env::set_var("TELEGRAM_CHAT_ID", "42");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("JSEARCH_API_KEY", "js");
    env::set_var("METRICS_ADDR", "127.0.0.1:9000");

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.poll_interval, Duration::from_secs(30));
    assert_eq!(cfg.country, "gb");
    assert!(!cfg.remote_only);
    assert_eq!(cfg.telegram.as_ref().map(|t| t.chat_id.as_str()), Some("42"));
    assert_eq!(cfg.log_format, LogFormat::Json);
    assert_eq!(cfg.keys.jsearch.as_deref(), Some("js"));
    assert_eq!(cfg.metrics_addr.map(|a| a.port()), Some(9000));
    clear();
}

#[test]
#[serial]
fn bad_metrics_addr_aborts() {
    clear();
    env::set_var("METRICS_ADDR", "not-an-addr");
    let err = AppConfig::from_env().unwrap_err();
    assert!(format!("{err:#}").contains("METRICS_ADDR"));
    clear();
}
