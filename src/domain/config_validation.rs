//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::backtest::{DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
use crate::domain::error::SigtraderError;
use crate::domain::universe::parse_instruments;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATA_SOURCES: [&str; 2] = ["yahoo", "csv"];

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_instruments(config)?;
    validate_lookback(config)?;
    validate_end_date(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_rsi(config)?;
    validate_hold_days(config)?;
    validate_moving_averages(config)?;
    validate_secondary_windows(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "yahoo".to_string());
    if !DATA_SOURCES.contains(&source.trim().to_lowercase().as_str()) {
        return Err(invalid(
            "data",
            "source",
            format!("unknown source '{}', expected one of {:?}", source, DATA_SOURCES),
        ));
    }
    if source.trim().eq_ignore_ascii_case("csv") {
        match config.get_string("data", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => {}
            _ => {
                return Err(SigtraderError::ConfigMissing {
                    section: "data".to_string(),
                    key: "csv_dir".to_string(),
                })
            }
        }
    }
    Ok(())
}

/// True when a `[telegram]` section exists and is not switched off with
/// `enabled = false`.
pub fn telegram_enabled(config: &dyn ConfigPort) -> bool {
    config.has_section("telegram") && config.get_bool("telegram", "enabled", true)
}

pub fn validate_telegram_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if !telegram_enabled(config) {
        return Ok(());
    }
    for key in ["token", "chat_id"] {
        match config.get_string("telegram", key) {
            Some(v) if !v.trim().is_empty() => {}
            _ => {
                return Err(SigtraderError::ConfigMissing {
                    section: "telegram".to_string(),
                    key: key.to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Runs every validator in order, stopping at the first failure.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;
    validate_data_config(config)?;
    validate_telegram_config(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SigtraderError {
    SigtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_instruments(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("backtest", "instruments") {
        Some(s) if !s.trim().is_empty() => parse_instruments(&s)
            .map(|_| ())
            .map_err(|e| invalid("backtest", "instruments", e.to_string())),
        _ => Err(SigtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "instruments".to_string(),
        }),
    }
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_int("backtest", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    if value <= 0 {
        return Err(invalid(
            "backtest",
            "lookback_days",
            "lookback_days must be positive",
        ));
    }
    if value > MAX_LOOKBACK_DAYS {
        return Err(invalid(
            "backtest",
            "lookback_days",
            format!("lookback_days must be at most {}", MAX_LOOKBACK_DAYS),
        ));
    }
    Ok(())
}

fn validate_end_date(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    if let Some(s) = config.get_string("backtest", "end_date") {
        parse_date(&s, "backtest", "end_date")?;
    }
    Ok(())
}

pub fn parse_date(value: &str, section: &str, field: &str) -> Result<NaiveDate, SigtraderError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            section,
            field,
            format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

fn validate_rsi(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let period = config.get_int("strategy", "rsi_period", 14);
    if period < 1 {
        return Err(invalid("strategy", "rsi_period", "rsi_period must be at least 1"));
    }
    let threshold = config.get_double("strategy", "rsi_entry_threshold", 30.0);
    if !(threshold > 0.0 && threshold < 100.0) {
        return Err(invalid(
            "strategy",
            "rsi_entry_threshold",
            "rsi_entry_threshold must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_hold_days(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_int("strategy", "hold_days", 5);
    if value < 1 {
        return Err(invalid("strategy", "hold_days", "hold_days must be at least 1"));
    }
    Ok(())
}

fn validate_moving_averages(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let fast = config.get_int("strategy", "dma_fast", 20);
    let slow = config.get_int("strategy", "dma_slow", 50);
    if fast < 1 {
        return Err(invalid("strategy", "dma_fast", "dma_fast must be at least 1"));
    }
    if slow <= fast {
        return Err(invalid(
            "strategy",
            "dma_slow",
            "dma_slow must be greater than dma_fast",
        ));
    }
    Ok(())
}

fn validate_secondary_windows(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    for (key, default, minimum) in [
        ("macd_fast", 12, 1),
        ("macd_slow", 26, 1),
        ("macd_signal", 9, 1),
        ("volatility_window", 10, 2),
        ("roc_period", 5, 1),
    ] {
        if config.get_int("strategy", key, default) < minimum {
            return Err(invalid(
                "strategy",
                key,
                format!("{} must be at least {}", key, minimum),
            ));
        }
    }
    Ok(())
}
