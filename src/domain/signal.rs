//! Signal synthesis — combines Doji, MFI and MACD outputs per bar into a
//! directional, strength-ranked signal.
//!
//! BUY and SELL candidates score independently on a 3/2/1 confluence table;
//! the stronger side wins and an exact nonzero tie resolves to HOLD. The
//! tie-break is deliberately conservative: two equally strong opposing
//! readings carry no directional edge. MACD enters the table through its
//! crossover flags only; histogram bias rides along on [`MacdState`] for
//! presentation but scores no arm by itself.

use crate::domain::indicator::macd::MacdState;
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
            Direction::Hold => write!(f, "HOLD"),
        }
    }
}

/// Which indicators pushed the winning candidate above strength 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contributors {
    pub doji: bool,
    pub mfi: bool,
    pub macd: bool,
}

impl Contributors {
    pub const NONE: Contributors = Contributors {
        doji: false,
        mfi: false,
        macd: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.doji || self.mfi || self.macd)
    }
}

impl fmt::Display for Contributors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.doji {
            parts.push("Doji");
        }
        if self.mfi {
            parts.push("MFI");
        }
        if self.macd {
            parts.push("MACD");
        }
        write!(f, "{}", parts.join("+"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalRecord {
    pub timestamp: NaiveDateTime,
    pub symbol: String,
    pub direction: Direction,
    pub strength: u8,
    pub contributors: Contributors,
}

#[derive(Debug, Clone, Copy)]
pub struct SynthesisConfig {
    pub mfi_oversold: f64,
    pub mfi_overbought: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            mfi_oversold: 30.0,
            mfi_overbought: 70.0,
        }
    }
}

/// Per-bar indicator inputs. `mfi`/`macd` are `None` during warm-up, which
/// forces HOLD/0 regardless of the Doji flag.
#[derive(Debug, Clone, Copy)]
pub struct BarInputs {
    pub is_doji: bool,
    pub mfi: Option<f64>,
    pub macd: Option<MacdState>,
}

fn buy_candidate(is_doji: bool, mfi: f64, macd: MacdState, cfg: &SynthesisConfig) -> (u8, Contributors) {
    let oversold = mfi < cfg.mfi_oversold;
    let cross = macd.bullish_cross;

    if is_doji && oversold && cross {
        (
            3,
            Contributors {
                doji: true,
                mfi: true,
                macd: true,
            },
        )
    } else if is_doji && (oversold || cross) {
        (
            2,
            Contributors {
                doji: true,
                mfi: oversold,
                macd: cross,
            },
        )
    } else if !is_doji && oversold && cross {
        (
            1,
            Contributors {
                doji: false,
                mfi: true,
                macd: true,
            },
        )
    } else {
        (0, Contributors::NONE)
    }
}

fn sell_candidate(is_doji: bool, mfi: f64, macd: MacdState, cfg: &SynthesisConfig) -> (u8, Contributors) {
    let overbought = mfi > cfg.mfi_overbought;
    let cross = macd.bearish_cross;

    if is_doji && overbought && cross {
        (
            3,
            Contributors {
                doji: true,
                mfi: true,
                macd: true,
            },
        )
    } else if is_doji && (overbought || cross) {
        (
            2,
            Contributors {
                doji: true,
                mfi: overbought,
                macd: cross,
            },
        )
    } else if !is_doji && overbought && cross {
        (
            1,
            Contributors {
                doji: false,
                mfi: true,
                macd: true,
            },
        )
    } else {
        (0, Contributors::NONE)
    }
}

/// Resolve one bar's indicator inputs into (direction, strength, contributors).
pub fn evaluate_bar(inputs: &BarInputs, cfg: &SynthesisConfig) -> (Direction, u8, Contributors) {
    let (Some(mfi), Some(macd)) = (inputs.mfi, inputs.macd) else {
        return (Direction::Hold, 0, Contributors::NONE);
    };

    let (buy, buy_contrib) = buy_candidate(inputs.is_doji, mfi, macd, cfg);
    let (sell, sell_contrib) = sell_candidate(inputs.is_doji, mfi, macd, cfg);

    if buy > sell {
        (Direction::Buy, buy, buy_contrib)
    } else if sell > buy {
        (Direction::Sell, sell, sell_contrib)
    } else {
        // Either both zero, or an exact opposing tie.
        (Direction::Hold, 0, Contributors::NONE)
    }
}

/// Synthesize the full signal series for one symbol. All input slices run
/// parallel to the bar series; timestamps come with the inputs.
pub fn synthesize_signals(
    symbol: &str,
    timestamps: &[NaiveDateTime],
    inputs: &[BarInputs],
    cfg: &SynthesisConfig,
) -> Vec<SignalRecord> {
    timestamps
        .iter()
        .zip(inputs)
        .map(|(&timestamp, bar)| {
            let (direction, strength, contributors) = evaluate_bar(bar, cfg);
            SignalRecord {
                timestamp,
                symbol: symbol.to_string(),
                direction,
                strength,
                contributors,
            }
        })
        .collect()
}
