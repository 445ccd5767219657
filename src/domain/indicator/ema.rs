//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the simple average of the first n values, then
//! EMA[i] = v[i]*k + EMA[i-1]*(1-k). The first (n-1) points are warm-up.

use crate::domain::indicator::{
    Indicator, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::Bar;

pub struct Ema {
    pub period: usize,
}

impl Indicator for Ema {
    fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Ema(self.period)
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorSeries {
        calculate_ema(bars, self.period)
    }
}

/// Raw EMA recurrence over a value slice. Entries before index `period - 1`
/// are warm-up and hold 0.0; callers track validity separately.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![0.0; values.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if i < period - 1 {
            sum += v;
            out.push(0.0);
        } else if i == period - 1 {
            sum += v;
            ema = sum / period as f64;
            out.push(ema);
        } else {
            ema = v * k + ema * (1.0 - k);
            out.push(ema);
        }
    }

    out
}

pub fn calculate_ema(bars: &[Bar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let emas = ema_values(&closes, period);

    let values = bars
        .iter()
        .zip(emas)
        .enumerate()
        .map(|(i, (bar, ema))| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: i >= period - 1,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
