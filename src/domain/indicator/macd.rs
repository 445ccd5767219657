//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line = EMA(fast) - EMA(slow), defined from index slow-1.
//! Signal line = EMA(signal) of the MACD line, its own seed shifting the
//! defined-from index a further signal-1 bars. Histogram = line - signal.
//!
//! Crossovers are sign transitions of the histogram; between crossovers the
//! histogram sign gives a bullish/bearish bias, with zero counting as
//! neither.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{
    Indicator, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub struct Macd {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        }
    }
}

impl Indicator for Macd {
    fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Macd {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
        }
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorSeries {
        calculate_macd(bars, self.fast, self.slow, self.signal)
    }
}

pub fn calculate_macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries::empty(indicator_type);
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();

    // The signal EMA runs over the defined tail of the MACD line only.
    let macd_warmup = slow - 1;
    let mut signal_line = vec![0.0; bars.len()];
    if macd_line.len() > macd_warmup {
        let tail = ema_values(&macd_line[macd_warmup..], signal_period);
        for (j, v) in tail.into_iter().enumerate() {
            signal_line[macd_warmup + j] = v;
        }
    }

    let warmup = macd_warmup + signal_period - 1;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: i >= warmup,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdBias {
    Bullish,
    Bearish,
    Neutral,
}

/// Per-bar crossover and bias flags derived from the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdState {
    pub bullish_cross: bool,
    pub bearish_cross: bool,
    pub bias: MacdBias,
}

/// Derive crossover/bias flags from a MACD series; `None` during warm-up.
/// A crossover needs a defined previous histogram, so the first defined
/// index never reports one.
pub fn macd_states(series: &IndicatorSeries) -> Vec<Option<MacdState>> {
    let mut out = Vec::with_capacity(series.values.len());
    let mut prev_hist: Option<f64> = None;

    for point in &series.values {
        let hist = match (point.valid, point.value) {
            (true, IndicatorValue::Macd { histogram, .. }) => histogram,
            _ => {
                prev_hist = None;
                out.push(None);
                continue;
            }
        };

        let (bullish_cross, bearish_cross) = match prev_hist {
            Some(prev) => (prev <= 0.0 && hist > 0.0, prev >= 0.0 && hist < 0.0),
            None => (false, false),
        };
        let bias = if hist > 0.0 {
            MacdBias::Bullish
        } else if hist < 0.0 {
            MacdBias::Bearish
        } else {
            MacdBias::Neutral
        };

        prev_hist = Some(hist);
        out.push(Some(MacdState {
            bullish_cross,
            bearish_cross,
            bias,
        }));
    }

    out
}
