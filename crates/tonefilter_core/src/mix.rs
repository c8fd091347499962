//! Shared Mix Parameter
//!
//! The wet/dry mix is owned by the host's parameter subsystem and read by
//! the audio thread once per block. It is stored as f32 bits in an
//! `AtomicU32` so neither side ever takes a lock.

use std::sync::atomic::{AtomicU32, Ordering};

/// Clamp a mix value to [0.0, 1.0]; NaN becomes fully dry
#[inline]
pub fn clamp_mix(mix: f32) -> f32 {
    if mix.is_nan() {
        0.0
    } else {
        mix.clamp(0.0, 1.0)
    }
}

/// Wet/dry crossfade ratio shared between control and audio threads
#[derive(Debug)]
pub struct MixParameter {
    /// Rust pattern: AtomicF32 doesn't exist, so we use bit-casting
    mix_bits: AtomicU32,
}

impl MixParameter {
    pub fn new(mix: f32) -> Self {
        Self {
            mix_bits: AtomicU32::new(clamp_mix(mix).to_bits()),
        }
    }

    /// Set the mix; out-of-range values are clamped
    pub fn set(&self, mix: f32) {
        self.mix_bits.store(clamp_mix(mix).to_bits(), Ordering::Relaxed);
    }

    /// Current mix, always within [0.0, 1.0]
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.mix_bits.load(Ordering::Relaxed))
    }
}

impl Default for MixParameter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
