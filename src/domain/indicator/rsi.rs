//! RSI (Relative Strength Index) indicator implementation.
//!
//! Gains and losses are smoothed with an exponentially weighted mean,
//! alpha = 1/n, without bias adjustment:
//! - avg[0] = x[0] (the first change is taken as 0)
//! - avg[i] = (1 - alpha) * avg[i-1] + alpha * x[i]
//!
//! Formula: RSI = 100 - (100 / (1 + RS)), RS = (avg_gain + eps) / (avg_loss + eps)
//! A flat series gives 50.
//!
//! Warmup: first n bars are invalid (need n price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const RSI_EPSILON: f64 = 1e-9;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: bars.iter().map(|b| IndicatorPoint::invalid(b.date)).collect(),
        };
    }

    let alpha = 1.0 / period as f64;
    let mut values = Vec::with_capacity(bars.len());
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 {
            0.0
        } else {
            bar.close - bars[i - 1].close
        };
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
            avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;
        }

        if i < period {
            values.push(IndicatorPoint::invalid(bar.date));
            continue;
        }

        let rs = (avg_gain + RSI_EPSILON) / (avg_loss + RSI_EPSILON);
        let rsi = 100.0 - (100.0 / (1.0 + rs));
        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
