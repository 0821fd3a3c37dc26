//! Column layout of exported tables.

use crate::domain::market::with_market_suffix;
use crate::domain::screen::ScoredResult;
use crate::domain::universe::UniverseRow;

/// Every column a screen result can be exported with, in default order.
pub const RESULT_COLUMNS: &[&str] = &[
    "ticker",
    "name",
    "exchange",
    "country_code",
    "sector",
    "isin",
    "close",
    "avg_vol_20",
    "rsi_14",
    "mom",
    "sma_short",
    "sma_long",
    "above_sma_long",
    "bbw",
    "bbw_pct",
    "atr_pct",
    "sigma20_pct",
    "mkt_cap",
    "pe_ratio",
    "score",
];

pub const DEFAULT_EXPORT_COLUMNS: &[&str] = &[
    "ticker",
    "name",
    "exchange",
    "country_code",
    "close",
    "avg_vol_20",
    "rsi_14",
    "mom",
    "sma_short",
    "sma_long",
    "above_sma_long",
    "mkt_cap",
    "pe_ratio",
    "sector",
    "score",
];

/// Header of the generated universe file.
pub const UNIVERSE_COLUMNS: &[&str] = &["ticker", "exchange", "country_code", "name"];

/// Resolve requested column names against the known result columns.
///
/// Unknown names are dropped; an empty result falls back to every column.
pub fn select_columns<S: AsRef<str>>(requested: &[S]) -> Vec<&'static str> {
    let selected: Vec<&'static str> = requested
        .iter()
        .map(|name| name.as_ref().trim())
        .filter_map(|name| RESULT_COLUMNS.iter().find(|c| **c == name).copied())
        .collect();
    if selected.is_empty() {
        RESULT_COLUMNS.to_vec()
    } else {
        selected
    }
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Text of one cell; undefined values are empty.
pub fn result_cell(result: &ScoredResult, column: &str) -> String {
    let row = &result.row;
    let snap = &result.snapshot;
    match column {
        "ticker" => row.ticker.clone(),
        "name" => row.name.clone(),
        "exchange" => row.exchange.clone(),
        "country_code" => row.country_code.clone(),
        "sector" => row.sector.clone(),
        "isin" => row.isin.clone(),
        "close" => snap.close.to_string(),
        "avg_vol_20" => number(snap.avg_volume_20),
        "rsi_14" => number(snap.rsi_14),
        "mom" => number(snap.momentum),
        "sma_short" => number(snap.sma_short),
        "sma_long" => number(snap.sma_long),
        "above_sma_long" => snap.above_long_sma.to_string(),
        "bbw" => number(snap.bollinger_band_width),
        "bbw_pct" => number(snap.bbw_percentile),
        "atr_pct" => number(snap.atr_pct),
        "sigma20_pct" => number(snap.sigma20_pct),
        "mkt_cap" => number(result.fundamentals.market_cap),
        "pe_ratio" => number(result.fundamentals.pe_ratio),
        "score" => result.score.to_string(),
        _ => String::new(),
    }
}

/// Universe output record: ticker (with market suffix), exchange, country, name.
pub fn universe_record(row: &UniverseRow) -> [String; 4] {
    [
        with_market_suffix(&row.ticker, &row.exchange),
        row.exchange.clone(),
        row.country_code.clone(),
        row.name.clone(),
    ]
}
