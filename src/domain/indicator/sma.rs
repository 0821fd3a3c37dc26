//! Simple moving average over closing price or volume.
//!
//! SMA(n)[i] = sum(X[i-j] for j in 0..n) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::mean;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values: rolling_mean(bars, &closes, period),
    }
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    IndicatorSeries {
        indicator_type: IndicatorType::VolumeSma(period),
        values: rolling_mean(bars, &volumes, period),
    }
}

fn rolling_mean(bars: &[OhlcvBar], inputs: &[f64], period: usize) -> Vec<IndicatorPoint> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if period == 0 || i + 1 < period {
                return IndicatorPoint::invalid(bar.date);
            }
            match mean(&inputs[i + 1 - period..=i]) {
                Some(v) => IndicatorPoint {
                    date: bar.date,
                    valid: true,
                    value: IndicatorValue::Simple(v),
                },
                None => IndicatorPoint::invalid(bar.date),
            }
        })
        .collect()
}
