//! Money Flow Index — volume-weighted momentum oscillator in [0, 100].
//!
//! typical = (H+L+C)/3, raw flow = typical * volume. A bar's flow counts as
//! positive when typical rose versus the prior bar, negative when it fell,
//! and is excluded when flat. Sums run over a trailing window of `period`
//! bars, so the first (period - 1) indices are warm-up; the first bar of the
//! series has no prior bar and contributes no directional flow.

use crate::domain::indicator::{
    Indicator, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_MFI_PERIOD: usize = 14;
pub const DEFAULT_MFI_OVERSOLD: f64 = 30.0;
pub const DEFAULT_MFI_OVERBOUGHT: f64 = 70.0;

pub struct Mfi {
    pub period: usize,
}

impl Indicator for Mfi {
    fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Mfi(self.period)
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorSeries {
        calculate_mfi(bars, self.period)
    }
}

pub fn calculate_mfi(bars: &[Bar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Mfi(period));
    }

    // Signed flow per bar: +flow on a rising typical price, -flow on a
    // falling one, 0.0 when flat or at index 0 (no prior bar).
    let typical: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
    let mut positive: Vec<f64> = vec![0.0; bars.len()];
    let mut negative: Vec<f64> = vec![0.0; bars.len()];
    for i in 1..bars.len() {
        let flow = typical[i] * bars[i].volume;
        if typical[i] > typical[i - 1] {
            positive[i] = flow;
        } else if typical[i] < typical[i - 1] {
            negative[i] = flow;
        }
    }

    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i < period - 1 {
            values.push(IndicatorPoint {
                timestamp: bar.timestamp,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
            continue;
        }

        // Window sums are recomputed from scratch each index: a running
        // add/subtract accumulator drifts once a large flow leaves the
        // window, and the sums must never go negative.
        let start = i + 1 - period;
        let pos_sum: f64 = positive[start..=i].iter().sum();
        let neg_sum: f64 = negative[start..=i].iter().sum();

        let mfi = if neg_sum == 0.0 && pos_sum > 0.0 {
            100.0
        } else if neg_sum == 0.0 && pos_sum == 0.0 {
            // No directional flow at all in the window.
            50.0
        } else {
            let money_ratio = pos_sum / neg_sum;
            100.0 - 100.0 / (1.0 + money_ratio)
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Simple(mfi),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Mfi(period),
        values,
    }
}
