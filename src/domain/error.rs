//! Domain error types.
//!
//! Insufficient warm-up history is deliberately *not* an error: indicator
//! points before warm-up are marked invalid and synthesize to HOLD/0.

/// Top-level error type for trisignal.
#[derive(Debug, thiserror::Error)]
pub enum TrisignalError {
    #[error("invalid bar sequence for {symbol} at index {index}: {reason}")]
    InvalidBarSequence {
        symbol: String,
        index: usize,
        reason: String,
    },

    #[error("provider failure for {symbol}: {reason}")]
    Provider { symbol: String, reason: String },

    #[error("global timeout elapsed before {symbol} completed")]
    Timeout { symbol: String },

    #[error("analysis worker for {symbol} panicked: {reason}")]
    WorkerPanic { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrisignalError> for std::process::ExitCode {
    fn from(err: &TrisignalError) -> Self {
        let code: u8 = match err {
            TrisignalError::Io(_) => 1,
            TrisignalError::ConfigParse { .. } | TrisignalError::ConfigInvalid { .. } => 2,
            TrisignalError::Provider { .. } => 3,
            TrisignalError::InvalidBarSequence { .. } => 4,
            TrisignalError::Timeout { .. } | TrisignalError::WorkerPanic { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
