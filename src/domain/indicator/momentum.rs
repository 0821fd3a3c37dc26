//! Momentum as a fractional change in close over a lookback window.
//!
//! MOM(n)[i] = C[i] / C[i-n] - 1
//! If C[i-n] == 0: undefined
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_momentum(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if period == 0 || i < period {
                return IndicatorPoint::invalid(bar.date);
            }
            let prev_close = bars[i - period].close;
            if prev_close == 0.0 {
                return IndicatorPoint::invalid(bar.date);
            }
            IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(bar.close / prev_close - 1.0),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Momentum(period),
        values,
    }
}
