//! Per-symbol analysis pipeline.
//!
//! Validates the bar sequence, computes the Heikin-Ashi transform and the
//! declared indicator list, joins the streams per bar and synthesizes the
//! signal series. All series in a [`SymbolAnalysis`] run parallel to the
//! input bars and are published read-only.

use crate::domain::doji::{detect_doji, DEFAULT_DOJI_THRESHOLD};
use crate::domain::error::TrisignalError;
use crate::domain::heikin_ashi::{compute_heikin_ashi, HaBar};
use crate::domain::indicator::macd::{macd_states, Macd, DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::mfi::{
    Mfi, DEFAULT_MFI_OVERBOUGHT, DEFAULT_MFI_OVERSOLD, DEFAULT_MFI_PERIOD,
};
use crate::domain::indicator::{compute_indicators, Indicator, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{validate_bars, Bar};
use crate::domain::signal::{
    synthesize_signals, BarInputs, Direction, SignalRecord, SynthesisConfig,
};

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub doji_threshold: f64,
    pub mfi_period: usize,
    pub mfi_oversold: f64,
    pub mfi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            doji_threshold: DEFAULT_DOJI_THRESHOLD,
            mfi_period: DEFAULT_MFI_PERIOD,
            mfi_oversold: DEFAULT_MFI_OVERSOLD,
            mfi_overbought: DEFAULT_MFI_OVERBOUGHT,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
        }
    }
}

/// Complete result for one symbol: the underlying series plus the signal
/// sequence and summary statistics, exposed read-only for presentation.
#[derive(Debug, Clone)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub ha_bars: Vec<HaBar>,
    pub is_doji: Vec<bool>,
    pub mfi: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub signals: Vec<SignalRecord>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisSummary {
    pub bar_count: usize,
    pub total_signals: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub doji_count: usize,
    pub signal_rate_pct: f64,
    pub doji_rate_pct: f64,
    pub avg_signal_strength: f64,
    pub latest: Option<SignalRecord>,
}

fn summarize(signals: &[SignalRecord], is_doji: &[bool]) -> AnalysisSummary {
    let bar_count = signals.len();
    let buy_signals = signals
        .iter()
        .filter(|s| s.direction == Direction::Buy)
        .count();
    let sell_signals = signals
        .iter()
        .filter(|s| s.direction == Direction::Sell)
        .count();
    let total_signals = buy_signals + sell_signals;
    let doji_count = is_doji.iter().filter(|&&d| d).count();

    let strength_sum: u32 = signals
        .iter()
        .filter(|s| s.direction != Direction::Hold)
        .map(|s| s.strength as u32)
        .sum();

    AnalysisSummary {
        bar_count,
        total_signals,
        buy_signals,
        sell_signals,
        doji_count,
        signal_rate_pct: pct(total_signals, bar_count),
        doji_rate_pct: pct(doji_count, bar_count),
        avg_signal_strength: if total_signals > 0 {
            strength_sum as f64 / total_signals as f64
        } else {
            0.0
        },
        latest: signals.last().cloned(),
    }
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Run the full four-stage pipeline for one symbol.
///
/// An empty bar sequence yields an empty analysis, not an error.
pub fn analyze_symbol(
    symbol: &str,
    bars: Vec<Bar>,
    config: &AnalysisConfig,
) -> Result<SymbolAnalysis, TrisignalError> {
    validate_bars(symbol, &bars)?;

    let ha_bars = compute_heikin_ashi(&bars);
    let is_doji = detect_doji(&ha_bars, config.doji_threshold);

    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Mfi {
            period: config.mfi_period,
        }),
        Box::new(Macd {
            fast: config.macd_fast,
            slow: config.macd_slow,
            signal: config.macd_signal,
        }),
    ];
    let mut computed = compute_indicators(&bars, &indicators);

    let mfi = computed
        .remove(&IndicatorType::Mfi(config.mfi_period))
        .unwrap_or_else(|| IndicatorSeries::empty(IndicatorType::Mfi(config.mfi_period)));
    let macd_type = IndicatorType::Macd {
        fast: config.macd_fast,
        slow: config.macd_slow,
        signal: config.macd_signal,
    };
    let macd = computed
        .remove(&macd_type)
        .unwrap_or_else(|| IndicatorSeries::empty(macd_type.clone()));

    let states = macd_states(&macd);
    let inputs: Vec<BarInputs> = (0..bars.len())
        .map(|i| BarInputs {
            is_doji: is_doji[i],
            mfi: mfi.value_at(i).and_then(|v| v.simple()),
            macd: states.get(i).copied().flatten(),
        })
        .collect();

    let timestamps: Vec<_> = bars.iter().map(|b| b.timestamp).collect();
    let synth = SynthesisConfig {
        mfi_oversold: config.mfi_oversold,
        mfi_overbought: config.mfi_overbought,
    };
    let signals = synthesize_signals(symbol, &timestamps, &inputs, &synth);
    let summary = summarize(&signals, &is_doji);

    Ok(SymbolAnalysis {
        symbol: symbol.to_string(),
        bars,
        ha_bars,
        is_doji,
        mfi,
        macd,
        signals,
        summary,
    })
}
