//! Engine Configuration

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Smallest and largest block capacity the engine will provision (frames)
const MIN_BLOCK_SIZE: usize = 1;
const MAX_BLOCK_SIZE: usize = 65536;

/// Audio format supplied by the host at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz (e.g., 44100, 48000, 96000)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: usize,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Duration of a block of `frames` frames in milliseconds
    pub fn block_duration_ms(&self, frames: usize) -> f32 {
        (frames as f32 / self.sample_rate as f32) * 1000.0
    }

    /// Validate format
    pub fn validate(&self) -> EngineResult<()> {
        if self.channels == 0 {
            return Err(EngineError::UnsupportedFormat(
                "channel count must be at least 1".into(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(EngineError::UnsupportedFormat(
                "sample rate must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Tone filter engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest block (frames) the scratch buffers are sized for at init
    pub max_block_size: usize,

    /// Mix the plugin's parameter starts at (0.0 = dry, 1.0 = wet)
    pub default_mix: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_block_size: 4096,
            default_mix: 1.0,
        }
    }
}

impl EngineConfig {
    /// Create config for hosts that deliver small, fixed blocks
    pub fn low_latency() -> Self {
        Self {
            max_block_size: 512,
            ..Default::default()
        }
    }

    /// Create config for offline rendering with large blocks
    pub fn large_blocks() -> Self {
        Self {
            max_block_size: 16384,
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> EngineResult<()> {
        if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&self.max_block_size) {
            return Err(EngineError::ConfigError(format!(
                "Invalid max block size: {}",
                self.max_block_size
            )));
        }
        if !(0.0..=1.0).contains(&self.default_mix) {
            return Err(EngineError::ConfigError(format!(
                "Invalid default mix: {}",
                self.default_mix
            )));
        }
        Ok(())
    }
}
