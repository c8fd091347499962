//! Engine Error Types

use thiserror::Error;

/// Errors that can occur in the tone filter engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Engine not initialized")]
    NotInitialized,

    #[error("Block of {requested} frames exceeds provisioned capacity of {capacity} frames")]
    BufferTooLarge { requested: usize, capacity: usize },

    #[error("Channel count mismatch: engine has {expected} channels, buffer has {got}")]
    ChannelCountMismatch { expected: usize, got: usize },

    #[error("Engine configuration error: {0}")]
    ConfigError(String),

    #[error("DSP error: {0}")]
    Dsp(#[from] tonefilter_dsp::DspError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
