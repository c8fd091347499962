//! DSP Error Types

use thiserror::Error;

/// Errors that can occur during DSP operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error(
        "Invalid filter parameters: {frequency}Hz center, {bandwidth}Hz bandwidth at sample rate {sample_rate}Hz"
    )]
    InvalidFilterParameter {
        sample_rate: f32,
        frequency: f32,
        bandwidth: f32,
    },

    #[error("Buffer size mismatch: expected {expected}, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },
}
