//! Screening and ranking of indicator snapshots.
//!
//! Two scoring modes:
//! - Trend: price/volume floors, RSI band, optional market-cap floor.
//!   score = 2·mom + 0.5·[close > SMA long] + 0.5·(50 - |RSI - 50|) / 50
//! - Contraction: price/volume floors plus BBW percentile, ATR% and σ20%
//!   ceilings.
//!   score = (100 - BBW%) / 100 + 0.5·max(0, (atr_max - ATR%) / atr_max)
//!         + 0.5·max(0, (σ_max - σ20%) / σ_max)
//!
//! An undefined input fails the row; undefined score terms count as zero.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::snapshot::{compute_snapshot, IndicatorParams, IndicatorSnapshot};
use crate::domain::universe::UniverseRow;
use crate::ports::fundamentals_port::FundamentalsPort;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendThresholds {
    pub min_price: f64,
    pub min_volume: f64,
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub min_market_cap: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            min_price: 1.0,
            min_volume: 20_000.0,
            rsi_low: 30.0,
            rsi_high: 70.0,
            min_market_cap: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractionThresholds {
    pub min_price: f64,
    pub min_volume: f64,
    pub bbw_threshold: f64,
    pub atr_max: f64,
    pub sigma_max: f64,
}

impl Default for ContractionThresholds {
    fn default() -> Self {
        Self {
            min_price: 1.0,
            min_volume: 20_000.0,
            bbw_threshold: 20.0,
            atr_max: 2.0,
            sigma_max: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenMode {
    Trend(TrendThresholds),
    Contraction(ContractionThresholds),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenModeKind {
    Trend,
    Contraction,
}

impl FromStr for ScreenModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trend" | "momentum" => Ok(ScreenModeKind::Trend),
            "contraction" | "squeeze" => Ok(ScreenModeKind::Contraction),
            other => Err(format!(
                "unknown screen mode '{other}' (expected trend or contraction)"
            )),
        }
    }
}

impl fmt::Display for ScreenModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenModeKind::Trend => write!(f, "trend"),
            ScreenModeKind::Contraction => write!(f, "contraction"),
        }
    }
}

/// Best-effort fundamentals; absent values are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fundamentals {
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub row: UniverseRow,
    pub snapshot: IndicatorSnapshot,
    pub fundamentals: Fundamentals,
    pub score: f64,
    pub passes_filter: bool,
}

fn at_least(value: Option<f64>, floor: f64) -> bool {
    value.is_some_and(|v| v >= floor)
}

fn at_most(value: Option<f64>, ceiling: f64) -> bool {
    value.is_some_and(|v| v <= ceiling)
}

impl ScreenMode {
    pub fn kind(&self) -> ScreenModeKind {
        match self {
            ScreenMode::Trend(_) => ScreenModeKind::Trend,
            ScreenMode::Contraction(_) => ScreenModeKind::Contraction,
        }
    }

    pub fn passes(&self, snap: &IndicatorSnapshot, fundamentals: &Fundamentals) -> bool {
        match self {
            ScreenMode::Trend(t) => {
                snap.close >= t.min_price
                    && at_least(snap.avg_volume_20, t.min_volume)
                    && snap
                        .rsi_14
                        .is_some_and(|rsi| rsi >= t.rsi_low && rsi <= t.rsi_high)
                    && (t.min_market_cap <= 0.0
                        || at_least(fundamentals.market_cap, t.min_market_cap))
            }
            ScreenMode::Contraction(c) => {
                snap.close >= c.min_price
                    && at_least(snap.avg_volume_20, c.min_volume)
                    && at_most(snap.bbw_percentile, c.bbw_threshold)
                    && at_most(snap.atr_pct, c.atr_max)
                    && at_most(snap.sigma20_pct, c.sigma_max)
            }
        }
    }

    pub fn score(&self, snap: &IndicatorSnapshot) -> f64 {
        match self {
            ScreenMode::Trend(_) => trend_score(snap),
            ScreenMode::Contraction(c) => contraction_score(snap, c),
        }
    }
}

pub fn trend_score(snap: &IndicatorSnapshot) -> f64 {
    let momentum = snap.momentum.unwrap_or(0.0);
    let trend = if snap.above_long_sma { 1.0 } else { 0.0 };
    let rsi_balance = snap
        .rsi_14
        .map(|rsi| (50.0 - (rsi - 50.0).abs()) / 50.0)
        .unwrap_or(0.0);
    2.0 * momentum + 0.5 * trend + 0.5 * rsi_balance
}

pub fn contraction_score(snap: &IndicatorSnapshot, c: &ContractionThresholds) -> f64 {
    let squeeze = snap
        .bbw_percentile
        .map(|pct| (100.0 - pct) / 100.0)
        .unwrap_or(0.0);
    squeeze + 0.5 * headroom(snap.atr_pct, c.atr_max) + 0.5 * headroom(snap.sigma20_pct, c.sigma_max)
}

/// max(0, (ceiling - value) / ceiling); zero when undefined or ceiling <= 0.
fn headroom(value: Option<f64>, ceiling: f64) -> f64 {
    match value {
        Some(v) if ceiling > 0.0 => ((ceiling - v) / ceiling).max(0.0),
        _ => 0.0,
    }
}

pub fn evaluate(
    row: UniverseRow,
    snapshot: IndicatorSnapshot,
    fundamentals: Fundamentals,
    mode: &ScreenMode,
) -> ScoredResult {
    let passes_filter = mode.passes(&snapshot, &fundamentals);
    let score = mode.score(&snapshot);
    ScoredResult {
        row,
        snapshot,
        fundamentals,
        score,
        passes_filter,
    }
}

/// Compute and score every row that has price data, in universe order.
///
/// Rows without a series, or with an empty one, are left out.
pub fn screen_universe(
    rows: &[UniverseRow],
    prices: &HashMap<String, Vec<OhlcvBar>>,
    params: &IndicatorParams,
    mode: &ScreenMode,
    fundamentals: &(dyn FundamentalsPort + Sync),
) -> Vec<ScoredResult> {
    rows.par_iter()
        .filter_map(|row| {
            let bars = prices.get(&row.ticker)?;
            let snapshot = compute_snapshot(bars, params)?;
            let fund = fundamentals.lookup(&row.ticker);
            Some(evaluate(row.clone(), snapshot, fund, mode))
        })
        .collect()
}

/// Drop failing rows and sort by score descending. Ties keep input order.
pub fn rank(results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    let mut passing: Vec<ScoredResult> = results.into_iter().filter(|r| r.passes_filter).collect();
    passing.sort_by(|a, b| b.score.total_cmp(&a.score));
    passing
}
