//! Average True Range as a rolling simple mean of True Range.
//!
//! TR[0] = high - low (no previous close)
//! TR[i] = max(high - low, |high - C[i-1]|, |low - C[i-1]|)
//! ATR(n)[i] = mean(TR[i-n+1..=i])
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::mean;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let tr_values: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if period == 0 || i + 1 < period {
                return IndicatorPoint::invalid(bar.date);
            }
            let atr = mean(&tr_values[i + 1 - period..=i]).unwrap_or(0.0);
            IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(atr),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}

/// Latest ATR as a percentage of the latest close.
pub fn atr_percent(series: &IndicatorSeries, close: f64) -> Option<f64> {
    if close == 0.0 {
        return None;
    }
    series.latest().map(|atr| atr / close * 100.0)
}
