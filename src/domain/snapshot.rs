//! Latest-value indicator snapshot for one ticker.
//!
//! Every series is computed over the full price history, then only its last
//! point is kept. Anything that cannot be computed from the available history
//! is `None`.

use crate::domain::indicator::atr::{atr_percent, calculate_atr};
use crate::domain::indicator::bollinger::{band_width_percentile, calculate_bollinger};
use crate::domain::indicator::momentum::calculate_momentum;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::{calculate_sma, calculate_volume_sma};
use crate::domain::indicator::volatility::calculate_volatility;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub sma_short: usize,
    pub sma_long: usize,
    pub bollinger_window: usize,
    pub bollinger_k: f64,
    pub atr_window: usize,
    pub volatility_window: usize,
    pub momentum_window: usize,
    pub volume_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            sma_short: 20,
            sma_long: 50,
            bollinger_window: 20,
            bollinger_k: 2.0,
            atr_window: 14,
            volatility_window: 20,
            momentum_window: 125,
            volume_window: 20,
        }
    }
}

impl IndicatorParams {
    /// Bars needed before every windowed indicator is defined.
    pub fn min_history(&self) -> usize {
        [
            self.bollinger_window,
            self.atr_window,
            self.volatility_window + 1,
            self.sma_long,
            self.sma_short,
            self.momentum_window + 1,
            self.rsi_period + 1,
            self.volume_window,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub avg_volume_20: Option<f64>,
    pub rsi_14: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub momentum: Option<f64>,
    pub above_long_sma: bool,
    pub bollinger_band_width: Option<f64>,
    pub bbw_percentile: Option<f64>,
    pub atr_pct: Option<f64>,
    pub sigma20_pct: Option<f64>,
}

/// Compute the snapshot for one ascending, de-duplicated price series.
/// Returns `None` only for an empty series.
pub fn compute_snapshot(bars: &[OhlcvBar], params: &IndicatorParams) -> Option<IndicatorSnapshot> {
    let last = bars.last()?;
    let close = last.close;

    let sma_long = calculate_sma(bars, params.sma_long).latest();
    let bollinger = calculate_bollinger(bars, params.bollinger_window, params.bollinger_k);

    Some(IndicatorSnapshot {
        close,
        avg_volume_20: calculate_volume_sma(bars, params.volume_window).latest(),
        rsi_14: calculate_rsi(bars, params.rsi_period).latest(),
        sma_short: calculate_sma(bars, params.sma_short).latest(),
        sma_long,
        momentum: calculate_momentum(bars, params.momentum_window).latest(),
        above_long_sma: sma_long.is_some_and(|sma| close > sma),
        bollinger_band_width: bollinger.latest_width(),
        bbw_percentile: band_width_percentile(&bollinger),
        atr_pct: atr_percent(&calculate_atr(bars, params.atr_window), close),
        sigma20_pct: calculate_volatility(bars, params.volatility_window).latest(),
    })
}
