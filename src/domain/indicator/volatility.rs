//! Rolling volatility of one-period returns.
//!
//! R[i] = C[i] / C[i-1] - 1
//! VOL(n)[i] = population stddev(R[i-n+1..=i]) * 100
//! Warmup: first n bars are invalid (n returns need n+1 closes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{population_stddev, simple_returns};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_volatility(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    // returns[k] is the return ending at bar k + 1
    let returns = simple_returns(&closes);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if period == 0 || i < period {
                return IndicatorPoint::invalid(bar.date);
            }
            match population_stddev(&returns[i - period..i]) {
                Some(sd) => IndicatorPoint {
                    date: bar.date,
                    valid: true,
                    value: IndicatorValue::Simple(sd * 100.0),
                },
                None => IndicatorPoint::invalid(bar.date),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Volatility(period),
        values,
    }
}
