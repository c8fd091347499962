//! Tonefilter Core - Tone Filter Engine
//!
//! This crate provides the processing core of the tone filter effect:
//! - Per-channel 48-band filter banks, created at initialization
//! - In-place block processing with a wet/dry mix
//! - Pre-allocated scratch buffers (no allocation per block)
//! - A lock-free shared mix parameter
//! - The host-facing plugin lifecycle (Init / Execute / Reset / Term)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Host / Parameter Thread                    │
//! │   init() / term() / reset()        MixParameter::set()      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ AtomicU32 (mix bits)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Audio Thread                           │
//! │   execute() ──▶ ToneFilterEngine ──▶ ChannelFilterBank × N │
//! │              (Zero allocation in this path)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod engine;
mod error;
mod mix;
mod plugin;

pub use config::{AudioFormat, EngineConfig};
pub use engine::ToneFilterEngine;
pub use error::{EngineError, EngineResult};
pub use mix::{clamp_mix, MixParameter};
pub use plugin::{EffectPlugin, PluginInfo, PluginType, TimeSkip, ToneFilterFx};

// Re-export DSP types for convenience
pub use tonefilter_dsp::{ChannelFilterBank, BAND_COUNT, TONE_FREQUENCIES};
