//! Host Plugin Lifecycle
//!
//! The narrow interface a host drives an effect through:
//! Init → (Execute | Reset | TimeSkip)* → Term.
//!
//! Registration, factories and parameter change notification stay on the
//! host side. The only parameter this effect reads is the shared
//! [`MixParameter`], loaded once per block.

use std::sync::Arc;

use tracing::info;

use crate::config::{AudioFormat, EngineConfig};
use crate::engine::ToneFilterEngine;
use crate::error::EngineResult;
use crate::mix::MixParameter;

/// Kind of plugin reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginType {
    Effect,
}

/// Static plugin metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub plugin_type: PluginType,
    /// Output overwrites the input buffer
    pub is_in_place: bool,
    pub can_process_objects: bool,
    pub build_version: &'static str,
}

/// Outcome of skipping frames while the voice is virtual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSkip {
    /// The effect still has output to produce
    DataReady,
    /// The effect's tail has finished
    NoMoreData,
}

/// Trait for effects driven by an audio host
///
/// # Real-time Safety Contract
///
/// Implementors MUST follow these rules in `execute()`:
/// - NO heap allocations (no Vec::push, no Box::new, no String)
/// - NO syscalls (no file I/O, no network, no mutex locks)
/// - NO unbounded loops
///
/// The host serializes every call; `execute()` never overlaps another call.
pub trait EffectPlugin: Send {
    /// Prepare for the given format; may allocate
    fn init(&mut self, format: AudioFormat) -> EngineResult<()>;

    /// Release everything acquired in `init()`
    fn term(&mut self);

    /// Forget signal history without changing format
    fn reset(&mut self);

    /// Process the first `valid_frames` frames of a planar buffer in place
    fn execute(&mut self, buffer: &mut [&mut [f32]], valid_frames: usize) -> EngineResult<()>;

    /// Skip `frames` frames without producing output
    fn time_skip(&mut self, _frames: usize) -> TimeSkip {
        TimeSkip::DataReady
    }

    fn plugin_info(&self) -> PluginInfo;
}

/// The tone filter effect as seen by the host
pub struct ToneFilterFx {
    engine: ToneFilterEngine,
    mix: Arc<MixParameter>,
}

impl ToneFilterFx {
    /// Create the effect with its own mix parameter at `config.default_mix`
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let mix = Arc::new(MixParameter::new(config.default_mix));
        Self::with_mix_parameter(config, mix)
    }

    /// Create the effect reading an externally owned mix parameter
    pub fn with_mix_parameter(config: EngineConfig, mix: Arc<MixParameter>) -> EngineResult<Self> {
        Ok(Self {
            engine: ToneFilterEngine::new(config)?,
            mix,
        })
    }

    /// Handle for the host's parameter subsystem
    pub fn mix_parameter(&self) -> Arc<MixParameter> {
        Arc::clone(&self.mix)
    }

    pub fn engine(&self) -> &ToneFilterEngine {
        &self.engine
    }
}

impl EffectPlugin for ToneFilterFx {
    fn init(&mut self, format: AudioFormat) -> EngineResult<()> {
        self.engine.initialize(format.channels, format.sample_rate)
    }

    fn term(&mut self) {
        self.engine.teardown();
    }

    fn reset(&mut self) {
        self.engine.reset();
    }

    #[inline]
    fn execute(&mut self, buffer: &mut [&mut [f32]], valid_frames: usize) -> EngineResult<()> {
        // One atomic read per block; changes land on the next block
        let mix = self.mix.get();
        self.engine.process_block(buffer, valid_frames, mix)
    }

    fn plugin_info(&self) -> PluginInfo {
        PluginInfo {
            plugin_type: PluginType::Effect,
            is_in_place: true,
            can_process_objects: false,
            build_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl Drop for ToneFilterFx {
    fn drop(&mut self) {
        if self.engine.is_initialized() {
            info!("Tone filter dropped without Term");
        }
    }
}
