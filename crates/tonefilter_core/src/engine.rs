//! Tone Filter Engine
//!
//! Owns one [`ChannelFilterBank`] per channel and runs the per-block
//! pipeline:
//!
//! ```text
//! channel ──▶ 48 × (band-pass ─▶ RMS ─▶ square) ──▶ Σ wet ──┐
//!    │                                                     ├──▶ wet·mix + dry·(1-mix) ──▶ channel
//!    └─────────────────────────── dry ─────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! `Uninitialized ──initialize()──▶ Initialized ──teardown()──▶ Uninitialized`
//!
//! All memory is allocated in `initialize()` (or `reserve_block_size()`).
//! `process_block()` only reuses the pre-sized accumulator and band
//! scratch buffers, so it is safe to call from the audio callback.

use tracing::{debug, info, warn};

use tonefilter_dsp::{ChannelFilterBank, BAND_COUNT};

use crate::config::{AudioFormat, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::mix::clamp_mix;

/// Everything that exists only while the engine is initialized
#[derive(Debug)]
struct Prepared {
    format: AudioFormat,
    /// One bank per channel, never resized until the next initialize()
    banks: Vec<ChannelFilterBank>,
    /// Summed square waves of the channel being processed
    accumulator: Vec<f32>,
    /// Filtered output of the band being processed
    band_scratch: Vec<f32>,
}

/// Per-instance tone-to-square processor
#[derive(Debug)]
pub struct ToneFilterEngine {
    config: EngineConfig,
    state: Option<Prepared>,
}

impl ToneFilterEngine {
    /// Create an uninitialized engine with custom configuration
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
        })
    }

    /// Build the per-channel banks and scratch buffers
    ///
    /// Replaces any previous state wholesale. On error the engine is left
    /// uninitialized.
    pub fn initialize(&mut self, channel_count: usize, sample_rate: u32) -> EngineResult<()> {
        self.state = None;

        let format = AudioFormat::new(sample_rate, channel_count);
        if let Err(e) = format.validate() {
            warn!("Rejected audio format {:?}: {}", format, e);
            return Err(e);
        }

        // Rust pattern: build one bank and clone it; every channel gets identical tuning
        let bank = ChannelFilterBank::new(sample_rate as f32).map_err(|e| {
            warn!("Failed to tune filter bank at {}Hz: {}", sample_rate, e);
            EngineError::from(e)
        })?;
        let banks = vec![bank; channel_count];

        let capacity = self.config.max_block_size;
        self.state = Some(Prepared {
            format,
            banks,
            accumulator: vec![0.0; capacity],
            band_scratch: vec![0.0; capacity],
        });

        info!(
            "Tone filter initialized: {} channels at {}Hz, {} bands, up to {} frames per block ({:.1}ms)",
            channel_count,
            sample_rate,
            BAND_COUNT,
            capacity,
            format.block_duration_ms(capacity)
        );
        Ok(())
    }

    /// Process one block in place
    ///
    /// `channels` holds one slice per channel; the first `sample_count`
    /// frames of each are processed. Every check runs before any sample
    /// or filter state is touched, so on error the buffer comes back
    /// exactly as it went in (dry passthrough).
    ///
    /// # Real-time Safety
    /// This function performs NO allocations, NO locks and NO logging.
    /// Safe to call from audio callback.
    pub fn process_block(
        &mut self,
        channels: &mut [&mut [f32]],
        sample_count: usize,
        mix: f32,
    ) -> EngineResult<()> {
        let state = self.state.as_mut().ok_or(EngineError::NotInitialized)?;

        if channels.len() != state.banks.len() {
            return Err(EngineError::ChannelCountMismatch {
                expected: state.banks.len(),
                got: channels.len(),
            });
        }
        if sample_count > state.accumulator.len() {
            return Err(EngineError::BufferTooLarge {
                requested: sample_count,
                capacity: state.accumulator.len(),
            });
        }
        if let Some(short) = channels.iter().find(|ch| ch.len() < sample_count) {
            return Err(tonefilter_dsp::DspError::BufferSizeMismatch {
                expected: sample_count,
                got: short.len(),
            }
            .into());
        }

        let wet_gain = clamp_mix(mix);
        let dry_gain = 1.0 - wet_gain;

        let accumulator = &mut state.accumulator[..sample_count];
        let scratch = &mut state.band_scratch[..sample_count];

        for (bank, channel) in state.banks.iter_mut().zip(channels.iter_mut()) {
            let samples = &mut channel[..sample_count];

            // Lengths were validated above; nothing below can fail mid-buffer
            accumulator.fill(0.0);
            bank.accumulate(samples, accumulator, scratch);

            for (out, &wet) in samples.iter_mut().zip(accumulator.iter()) {
                *out = wet * wet_gain + *out * dry_gain;
            }
        }

        Ok(())
    }

    /// Grow scratch capacity outside the audio callback
    ///
    /// Call from the control thread when the host announces a larger
    /// block size. Never shrinks.
    pub fn reserve_block_size(&mut self, frames: usize) -> EngineResult<()> {
        let state = self.state.as_mut().ok_or(EngineError::NotInitialized)?;
        if frames <= state.accumulator.len() {
            return Ok(());
        }

        warn!(
            "Growing block capacity from {} to {} frames",
            state.accumulator.len(),
            frames
        );
        state.accumulator.resize(frames, 0.0);
        state.band_scratch.resize(frames, 0.0);
        Ok(())
    }

    /// Clear every filter's history (host Reset)
    ///
    /// Call when the signal is discontinuous, to prevent filter ringing.
    pub fn reset(&mut self) {
        if let Some(state) = self.state.as_mut() {
            for bank in &mut state.banks {
                bank.reset();
            }
            debug!("Tone filter state reset");
        }
    }

    /// Release banks and buffers (host Term)
    pub fn teardown(&mut self) {
        if self.state.take().is_some() {
            info!("Tone filter torn down");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Number of channels, 0 when uninitialized
    pub fn channel_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.banks.len())
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.state.as_ref().map(|s| s.format.sample_rate)
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.state.as_ref().map(|s| s.format)
    }

    /// Current scratch capacity in frames, 0 when uninitialized
    pub fn max_block_size(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.accumulator.len())
    }

    /// Per-band RMS of the last block for `channel`
    pub fn band_levels(&self, channel: usize) -> Option<&[f32; BAND_COUNT]> {
        self.state
            .as_ref()
            .and_then(|s| s.banks.get(channel))
            .map(|bank| bank.band_levels())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for ToneFilterEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonefilter_dsp::{A4_BAND, TONE_FREQUENCIES};

    fn engine(channels: usize) -> ToneFilterEngine {
        let mut engine = ToneFilterEngine::default();
        engine.initialize(channels, 48000).unwrap();
        engine
    }

    fn signal(seed: usize, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = (i + seed * 977) as f32;
                0.5 * (t * 0.031).sin() + 0.3 * (t * 0.173).sin() + 0.1 * (t * 0.011).cos()
            })
            .collect()
    }

    /// Process planar channel vectors through `engine`
    fn run(engine: &mut ToneFilterEngine, data: &mut [Vec<f32>], mix: f32) -> EngineResult<()> {
        let frames = data.first().map_or(0, |c| c.len());
        let mut channels: Vec<&mut [f32]> = data.iter_mut().map(|c| c.as_mut_slice()).collect();
        engine.process_block(&mut channels, frames, mix)
    }

    #[test]
    fn test_starts_uninitialized() {
        let engine = ToneFilterEngine::default();
        assert!(!engine.is_initialized());
        assert_eq!(engine.channel_count(), 0);
        assert_eq!(engine.sample_rate(), None);
    }

    #[test]
    fn test_process_before_initialize() {
        let mut engine = ToneFilterEngine::default();
        let mut data = vec![signal(0, 64)];
        let original = data.clone();
        assert_eq!(run(&mut engine, &mut data, 0.5), Err(EngineError::NotInitialized));
        assert_eq!(data, original);
    }

    #[test]
    fn test_zero_channels_rejected() {
        let mut engine = ToneFilterEngine::default();
        assert!(matches!(
            engine.initialize(0, 48000),
            Err(EngineError::UnsupportedFormat(_))
        ));
        assert!(!engine.is_initialized());
    }

    #[test]
    fn test_failed_reinit_leaves_uninitialized() {
        let mut engine = engine(2);
        // B6 is above Nyquist at 3kHz
        assert!(matches!(engine.initialize(2, 3000), Err(EngineError::Dsp(_))));
        assert!(!engine.is_initialized());
    }

    #[test]
    fn test_initialize_sets_format() {
        let engine = engine(2);
        assert!(engine.is_initialized());
        assert_eq!(engine.channel_count(), 2);
        assert_eq!(engine.sample_rate(), Some(48000));
        assert_eq!(engine.format(), Some(AudioFormat::new(48000, 2)));
        assert_eq!(engine.max_block_size(), engine.config().max_block_size);
    }

    #[test]
    fn test_reinitialize_replaces_channels() {
        let mut engine = engine(2);
        engine.initialize(6, 44100).unwrap();
        assert_eq!(engine.channel_count(), 6);
        assert_eq!(engine.sample_rate(), Some(44100));

        engine.initialize(1, 48000).unwrap();
        assert_eq!(engine.channel_count(), 1);
        assert!(engine.band_levels(1).is_none());
    }

    #[test]
    fn test_dry_mix_is_identity() {
        let mut engine = engine(2);
        for len in [0, 1, 7, 64, 512, 4096] {
            let mut data = vec![signal(1, len), signal(2, len)];
            let original = data.clone();
            run(&mut engine, &mut data, 0.0).unwrap();

            for (out, orig) in data.iter().flatten().zip(original.iter().flatten()) {
                assert!((out - orig).abs() <= 1e-6, "{} vs {}", out, orig);
            }
        }
    }

    #[test]
    fn test_mix_blends_wet_and_dry() {
        let input = vec![signal(3, 512), signal(4, 512)];

        // Same history in both engines, so the wet signal is identical
        let mut wet_engine = engine(2);
        let mut wet = input.clone();
        run(&mut wet_engine, &mut wet, 1.0).unwrap();

        for mix in [0.0_f32, 0.25, 0.5, 0.8, 1.0] {
            let mut blend_engine = engine(2);
            let mut out = input.clone();
            run(&mut blend_engine, &mut out, mix).unwrap();

            for ch in 0..2 {
                for i in 0..512 {
                    let expected = wet[ch][i] * mix + input[ch][i] * (1.0 - mix);
                    assert_eq!(out[ch][i], expected, "mix {} ch {} sample {}", mix, ch, i);
                }
            }
        }
    }

    #[test]
    fn test_full_wet_is_square_sum() {
        let mut engine = engine(1);
        let mut data = vec![signal(5, 256)];
        run(&mut engine, &mut data, 1.0).unwrap();

        // Every sample is a sum of ±level over the 48 bands
        let levels = *engine.band_levels(0).unwrap();
        let bound: f32 = levels.iter().sum();
        assert!(bound > 0.0);
        for &s in &data[0] {
            assert!(s.abs() <= bound * 1.0001);
        }
    }

    #[test]
    fn test_out_of_range_mix_is_clamped() {
        let input = vec![signal(6, 128)];

        let mut clamped = engine(1);
        let mut over = input.clone();
        run(&mut clamped, &mut over, 3.0).unwrap();

        let mut reference = engine(1);
        let mut wet = input.clone();
        run(&mut reference, &mut wet, 1.0).unwrap();
        assert_eq!(over, wet);

        let mut negative = engine(1);
        let mut under = input.clone();
        run(&mut negative, &mut under, -2.0).unwrap();
        assert_eq!(under, input);
    }

    #[test]
    fn test_silent_stereo_block_stays_silent() {
        let mut engine = engine(2);
        let mut data = vec![vec![0.0; 512], vec![0.0; 512]];
        run(&mut engine, &mut data, 0.5).unwrap();
        assert!(data.iter().flatten().all(|&s| s == 0.0));
    }

    #[test]
    fn test_sine_level_in_tuned_band() {
        let sample_rate = 48000.0_f64;
        let freq = TONE_FREQUENCIES[A4_BAND] as f64;
        // 4800 frames is exactly 44 cycles, more than the default capacity
        let block = 4800;
        let mut engine = ToneFilterEngine::new(EngineConfig::large_blocks()).unwrap();
        engine.initialize(1, 48000).unwrap();

        for b in 0..10 {
            let input: Vec<f32> = (b * block..(b + 1) * block)
                .map(|n| (2.0 * std::f64::consts::PI * freq * n as f64 / sample_rate).sin() as f32)
                .collect();
            let mut data = vec![input];
            run(&mut engine, &mut data, 1.0).unwrap();
        }

        let levels = engine.band_levels(0).unwrap();
        let level = levels[A4_BAND];
        assert!(
            (level - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.01,
            "A4 band level: {}",
            level
        );
        let loudest = levels
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(loudest, Some(A4_BAND));
    }

    #[test]
    fn test_block_too_large_is_dry_passthrough() {
        let mut engine = ToneFilterEngine::new(EngineConfig::low_latency()).unwrap();
        engine.initialize(1, 48000).unwrap();

        let mut data = vec![signal(7, 1024)];
        let original = data.clone();
        assert_eq!(
            run(&mut engine, &mut data, 1.0),
            Err(EngineError::BufferTooLarge {
                requested: 1024,
                capacity: 512
            })
        );
        assert_eq!(data, original);
    }

    #[test]
    fn test_reserve_block_size() {
        let mut engine = ToneFilterEngine::new(EngineConfig::low_latency()).unwrap();
        assert_eq!(engine.reserve_block_size(1024), Err(EngineError::NotInitialized));

        engine.initialize(1, 48000).unwrap();
        engine.reserve_block_size(1024).unwrap();
        assert_eq!(engine.max_block_size(), 1024);

        // Never shrinks
        engine.reserve_block_size(256).unwrap();
        assert_eq!(engine.max_block_size(), 1024);

        let mut data = vec![signal(8, 1024)];
        assert!(run(&mut engine, &mut data, 1.0).is_ok());
    }

    #[test]
    fn test_channel_mismatch_leaves_buffer_untouched() {
        let mut engine = engine(2);
        let mut data = vec![signal(9, 64)];
        let original = data.clone();
        assert_eq!(
            run(&mut engine, &mut data, 1.0),
            Err(EngineError::ChannelCountMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(data, original);
    }

    #[test]
    fn test_short_channel_leaves_all_channels_untouched() {
        let mut engine = engine(2);
        let mut left = signal(10, 128);
        let mut right = signal(11, 64);
        let (left_orig, right_orig) = (left.clone(), right.clone());

        let mut channels: Vec<&mut [f32]> = vec![left.as_mut_slice(), right.as_mut_slice()];
        let result = engine.process_block(&mut channels, 128, 1.0);

        assert!(matches!(result, Err(EngineError::Dsp(_))));
        assert_eq!(left, left_orig);
        assert_eq!(right, right_orig);
    }

    #[test]
    fn test_partial_valid_frames() {
        let mut engine = engine(1);
        let mut data = vec![signal(12, 256)];
        let original = data.clone();

        let mut channels: Vec<&mut [f32]> = data.iter_mut().map(|c| c.as_mut_slice()).collect();
        engine.process_block(&mut channels, 100, 1.0).unwrap();

        assert_ne!(data[0][..100], original[0][..100]);
        assert_eq!(data[0][100..], original[0][100..]);
    }

    #[test]
    fn test_history_carries_across_blocks() {
        // Same blocks through both engines; one is reset midway
        let mut continuous = engine(1);
        let mut restarted = engine(1);

        let mut a = vec![signal(13, 256)];
        let mut b = a.clone();
        run(&mut continuous, &mut a, 1.0).unwrap();
        run(&mut restarted, &mut b, 1.0).unwrap();
        assert_eq!(a, b);

        restarted.reset();
        let mut a = vec![signal(14, 256)];
        let mut b = a.clone();
        run(&mut continuous, &mut a, 1.0).unwrap();
        run(&mut restarted, &mut b, 1.0).unwrap();
        assert_ne!(a, b, "history should carry into the next block");
    }

    #[test]
    fn test_teardown() {
        let mut engine = engine(2);
        engine.teardown();
        assert!(!engine.is_initialized());
        assert_eq!(engine.channel_count(), 0);
        assert_eq!(engine.max_block_size(), 0);

        let mut data = vec![signal(15, 32), signal(16, 32)];
        assert_eq!(run(&mut engine, &mut data, 1.0), Err(EngineError::NotInitialized));

        // Can be brought back up
        engine.initialize(2, 48000).unwrap();
        assert!(run(&mut engine, &mut data, 1.0).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            max_block_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            ToneFilterEngine::new(config),
            Err(EngineError::ConfigError(_))
        ));
    }
}
