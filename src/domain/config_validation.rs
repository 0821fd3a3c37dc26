//! Configuration validation.
//!
//! Validates all config fields before a run touches any data.

use crate::domain::country::CountryPolicy;
use crate::domain::error::ScreenerError;
use crate::domain::screen::ScreenModeKind;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const INDICATOR_WINDOWS: &[(&str, i64)] = &[
    ("rsi_period", 14),
    ("sma_short", 20),
    ("sma_long", 50),
    ("bollinger_window", 20),
    ("atr_window", 14),
    ("volatility_window", 20),
    ("momentum_window", 125),
    ("volume_window", 20),
];

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_universe_section(config)?;
    validate_data_section(config)?;
    validate_indicators(config)?;
    validate_thresholds(config)?;
    Ok(())
}

pub fn validate_universe_section(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if let Some(policy) = config.get_string("universe", "country_policy") {
        policy
            .parse::<CountryPolicy>()
            .map_err(|reason| ScreenerError::invalid("universe", "country_policy", reason))?;
    }
    if config.get_int("universe", "max_tickers", 400) < 1 {
        return Err(ScreenerError::invalid(
            "universe",
            "max_tickers",
            "max_tickers must be at least 1",
        ));
    }
    Ok(())
}

fn validate_data_section(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if let Some(source) = config.get_string("data", "source") {
        match source.trim().to_lowercase().as_str() {
            "csv" | "sqlite" => {}
            other => {
                return Err(ScreenerError::invalid(
                    "data",
                    "source",
                    format!("unknown data source '{other}' (expected csv or sqlite)"),
                ));
            }
        }
    }
    if config.get_int("data", "lookback_days", 260) < 1 {
        return Err(ScreenerError::invalid(
            "data",
            "lookback_days",
            "lookback_days must be at least 1",
        ));
    }
    if let Some(end) = config.get_string("data", "end_date") {
        NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d").map_err(|_| {
            ScreenerError::invalid(
                "data",
                "end_date",
                "invalid date format (expected YYYY-MM-DD)",
            )
        })?;
    }
    Ok(())
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    for (key, default) in INDICATOR_WINDOWS {
        if config.get_int("indicators", key, *default) < 1 {
            return Err(ScreenerError::invalid(
                "indicators",
                key,
                format!("{key} must be at least 1"),
            ));
        }
    }
    if config.get_double("indicators", "bollinger_k", 2.0) <= 0.0 {
        return Err(ScreenerError::invalid(
            "indicators",
            "bollinger_k",
            "bollinger_k must be positive",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if let Some(mode) = config.get_string("screen", "mode") {
        mode.parse::<ScreenModeKind>()
            .map_err(|reason| ScreenerError::invalid("screen", "mode", reason))?;
    }

    for key in ["min_price", "min_volume", "min_market_cap"] {
        if config.get_double("screen", key, 0.0) < 0.0 {
            return Err(ScreenerError::invalid(
                "screen",
                key,
                format!("{key} must be non-negative"),
            ));
        }
    }

    let rsi_low = config.get_double("screen", "rsi_low", 30.0);
    let rsi_high = config.get_double("screen", "rsi_high", 70.0);
    if !(0.0..=100.0).contains(&rsi_low) || !(0.0..=100.0).contains(&rsi_high) {
        return Err(ScreenerError::invalid(
            "screen",
            "rsi_low",
            "RSI bounds must be between 0 and 100",
        ));
    }
    if rsi_low > rsi_high {
        return Err(ScreenerError::invalid(
            "screen",
            "rsi_low",
            "rsi_low must not exceed rsi_high",
        ));
    }

    let bbw = config.get_double("screen", "bbw_threshold", 20.0);
    if !(0.0..=100.0).contains(&bbw) {
        return Err(ScreenerError::invalid(
            "screen",
            "bbw_threshold",
            "bbw_threshold must be between 0 and 100",
        ));
    }

    for (key, default) in [("atr_max", 2.0), ("sigma_max", 2.5)] {
        if config.get_double("screen", key, default) <= 0.0 {
            return Err(ScreenerError::invalid(
                "screen",
                key,
                format!("{key} must be positive"),
            ));
        }
    }
    Ok(())
}
