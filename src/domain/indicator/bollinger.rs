//! Bollinger Bands and Band Width.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! Width = (Upper - Lower) / Middle, undefined when Middle is zero.
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{mean, percentile_rank, population_stddev};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    mult: f64,
) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    for (i, bar) in bars.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Bollinger {
                    upper: 0.0,
                    middle: 0.0,
                    lower: 0.0,
                    width: None,
                },
            });
            continue;
        }

        let window = &closes[i + 1 - period..=i];
        let middle = mean(window).unwrap_or(0.0);
        let stddev = population_stddev(window).unwrap_or(0.0);
        let upper = middle + mult * stddev;
        let lower = middle - mult * stddev;
        let width = if middle == 0.0 {
            None
        } else {
            Some((upper - lower) / middle)
        };

        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
                width,
            },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100: multiplier_x100(mult),
        },
        values,
    }
}

/// Rank of the latest band width against every defined width in the series,
/// as a 0-100 percentage. The whole loaded history is the reference window.
pub fn band_width_percentile(series: &IndicatorSeries) -> Option<f64> {
    let current = series.latest_width()?;
    percentile_rank(&series.widths(), current)
}

/// Multiplier in hundredths. Only the indicator key uses this form.
pub fn multiplier_x100(k: f64) -> u32 {
    (k * 100.0).round().max(0.0) as u32
}
