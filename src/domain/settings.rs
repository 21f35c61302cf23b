//! Typed application settings built from a [`ConfigPort`].
//!
//! Every key has a default so an empty file is a valid configuration. Values
//! that are present but unparseable or out of range are rejected with
//! `ConfigInvalid`.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;

use crate::domain::analysis::{DEFAULT_HISTORY_DAYS, trailing_window};
use crate::domain::backtest::RsiStrategyConfig;
use crate::domain::error::QuantError;
use crate::domain::indicator::rsi::DEFAULT_WINDOW;
use crate::domain::screen::{A50_CODES, DEFAULT_THRESHOLD};
use crate::domain::snapshot::DEFAULT_TTL;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_CSV_DIR: &str = "data";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub csv_dir: PathBuf,
    pub listen: String,
    /// Token required by the protected HTTP routes. `None` rejects every
    /// protected request.
    pub auth_token: Option<String>,
    pub rsi_window: usize,
    pub history_days: i64,
    pub strategy: RsiStrategyConfig,
    pub snapshot_ttl: Duration,
    pub screen_codes: Vec<String>,
    pub screen_threshold: f64,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            listen: DEFAULT_LISTEN.to_string(),
            auth_token: None,
            rsi_window: DEFAULT_WINDOW,
            history_days: DEFAULT_HISTORY_DAYS,
            strategy: RsiStrategyConfig::default(),
            snapshot_ttl: DEFAULT_TTL,
            screen_codes: A50_CODES.iter().map(|c| c.to_string()).collect(),
            screen_threshold: DEFAULT_THRESHOLD,
            log_format: LogFormat::Pretty,
        }
    }
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, QuantError> {
    let defaults = Settings::default();

    let csv_dir = non_empty(config, "data", "csv_dir")
        .map(PathBuf::from)
        .unwrap_or(defaults.csv_dir);
    let listen = non_empty(config, "web", "listen").unwrap_or(defaults.listen);
    let auth_token = non_empty(config, "auth", "token");

    let rsi_window = positive_int(config, "analysis", "rsi_window", DEFAULT_WINDOW as i64)? as usize;
    let history_days = positive_int(config, "analysis", "history_days", DEFAULT_HISTORY_DAYS)?;
    if trailing_window(Local::now().date_naive(), history_days).is_none() {
        return Err(invalid("analysis", "history_days", "history_days out of range"));
    }

    let strategy = build_strategy(config)?;

    let ttl_seconds = config.get_int("snapshot", "ttl_seconds", DEFAULT_TTL.as_secs() as i64)?;
    if ttl_seconds < 0 {
        return Err(invalid("snapshot", "ttl_seconds", "ttl_seconds must be non-negative"));
    }

    let screen_codes = match non_empty(config, "screen", "codes") {
        Some(raw) => parse_codes(&raw)?,
        None => defaults.screen_codes,
    };
    let screen_threshold = config.get_double("screen", "threshold", DEFAULT_THRESHOLD)?;
    if !(0.0..=100.0).contains(&screen_threshold) {
        return Err(invalid("screen", "threshold", "threshold must be between 0 and 100"));
    }

    let log_format = match non_empty(config, "logging", "format").as_deref() {
        None | Some("pretty") | Some("text") => LogFormat::Pretty,
        Some("json") => LogFormat::Json,
        Some(other) => {
            return Err(invalid(
                "logging",
                "format",
                &format!("unknown format '{other}', expected pretty or json"),
            ));
        }
    };

    Ok(Settings {
        csv_dir,
        listen,
        auth_token,
        rsi_window,
        history_days,
        strategy,
        snapshot_ttl: Duration::from_secs(ttl_seconds as u64),
        screen_codes,
        screen_threshold,
        log_format,
    })
}

fn build_strategy(config: &dyn ConfigPort) -> Result<RsiStrategyConfig, QuantError> {
    let defaults = RsiStrategyConfig::default();
    let entry_below = config.get_double("strategy", "entry_below", defaults.entry_below)?;
    let exit_above = config.get_double("strategy", "exit_above", defaults.exit_above)?;
    let stop_loss_ratio =
        config.get_double("strategy", "stop_loss_ratio", defaults.stop_loss_ratio)?;

    if !(0.0..=100.0).contains(&entry_below) {
        return Err(invalid("strategy", "entry_below", "entry_below must be between 0 and 100"));
    }
    if !(0.0..=100.0).contains(&exit_above) || exit_above < entry_below {
        return Err(invalid(
            "strategy",
            "exit_above",
            "exit_above must be between entry_below and 100",
        ));
    }
    if stop_loss_ratio <= 0.0 || stop_loss_ratio > 1.0 {
        return Err(invalid(
            "strategy",
            "stop_loss_ratio",
            "stop_loss_ratio must be in (0, 1]",
        ));
    }

    Ok(RsiStrategyConfig {
        entry_below,
        exit_above,
        stop_loss_ratio,
    })
}

/// Comma-separated code list. Blank entries are rejected; repeats are dropped.
pub fn parse_codes(input: &str) -> Result<Vec<String>, QuantError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let code = token.trim().to_uppercase();
        if code.is_empty() {
            return Err(invalid("screen", "codes", "empty entry in code list"));
        }
        if seen.insert(code.clone()) {
            codes.push(code);
        }
    }
    Ok(codes)
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, QuantError> {
    let value = config.get_int(section, key, default)?;
    if value < 1 {
        return Err(invalid(section, key, &format!("{key} must be at least 1")));
    }
    Ok(value)
}

fn invalid(section: &str, key: &str, reason: &str) -> QuantError {
    QuantError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
