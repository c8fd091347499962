//! Per-Channel Tone Filter Bank
//!
//! Splits one channel into the 48 tone bands of [`TONE_FREQUENCIES`],
//! turns each band into a square wave at the band's block loudness and
//! sums the square waves into a single wideband signal.
//!
//! Bands are visited in table order. Reordering them yields the same
//! result up to floating-point rounding only; bit-exact output across
//! band orders is not guaranteed.

use crate::band_filter::BandFilter;
use crate::error::DspError;
use crate::loudness;
use crate::square;
use crate::tones::{BAND_BANDWIDTH_HZ, BAND_COUNT, TONE_FREQUENCIES};

/// The 48 band filters of one audio channel
#[derive(Debug, Clone)]
pub struct ChannelFilterBank {
    // Always BAND_COUNT long, index i tuned to TONE_FREQUENCIES[i]
    bands: Vec<BandFilter>,
    /// RMS of each band over the last processed block
    band_levels: [f32; BAND_COUNT],
    sample_rate: f32,
}

impl ChannelFilterBank {
    /// Create a bank tuned for `sample_rate`
    pub fn new(sample_rate: f32) -> Result<Self, DspError> {
        let bands = TONE_FREQUENCIES
            .iter()
            .map(|&freq| BandFilter::new(sample_rate, freq, BAND_BANDWIDTH_HZ))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            bands,
            band_levels: [0.0; BAND_COUNT],
            sample_rate,
        })
    }

    /// Retune every band for a new sample rate
    ///
    /// All coefficients are derived before any band is touched, so a
    /// failure leaves the bank exactly as it was.
    pub fn initialize(&mut self, sample_rate: f32) -> Result<(), DspError> {
        // Validation pass: a throwaway filter per band, no partial retune on error
        for &freq in TONE_FREQUENCIES.iter() {
            BandFilter::new(sample_rate, freq, BAND_BANDWIDTH_HZ)?;
        }

        for (band, &freq) in self.bands.iter_mut().zip(TONE_FREQUENCIES.iter()) {
            band.configure(sample_rate, freq, BAND_BANDWIDTH_HZ)?;
        }
        self.sample_rate = sample_rate;
        Ok(())
    }

    /// Add the square-wave reconstruction of `input` into `accumulator`
    ///
    /// The caller zeroes `accumulator` before the first call of a block.
    /// `scratch` holds each band's filtered signal in turn. Both must be
    /// at least as long as `input`; lengths are checked before any filter
    /// state changes.
    ///
    /// # Real-time Safety
    /// No allocations. O(n * bands) where n = block length.
    pub fn process_block(
        &mut self,
        input: &[f32],
        accumulator: &mut [f32],
        scratch: &mut [f32],
    ) -> Result<(), DspError> {
        let len = input.len();
        if accumulator.len() < len {
            return Err(DspError::BufferSizeMismatch {
                expected: len,
                got: accumulator.len(),
            });
        }
        if scratch.len() < len {
            return Err(DspError::BufferSizeMismatch {
                expected: len,
                got: scratch.len(),
            });
        }

        self.accumulate(input, accumulator, scratch);
        Ok(())
    }

    /// Add the square-wave reconstruction of `input` into `accumulator`
    ///
    /// Unchecked variant of [`process_block`](Self::process_block) that
    /// cannot fail: it processes the length of the shortest of the three
    /// slices. Callers that validated lengths up front use this so no
    /// error path exists once output has been written.
    ///
    /// # Real-time Safety
    /// No allocations. O(n * bands) where n = block length.
    pub fn accumulate(&mut self, input: &[f32], accumulator: &mut [f32], scratch: &mut [f32]) {
        let len = input.len().min(accumulator.len()).min(scratch.len());
        let input = &input[..len];
        let accumulator = &mut accumulator[..len];
        let band_out = &mut scratch[..len];

        for (band, level) in self.bands.iter_mut().zip(self.band_levels.iter_mut()) {
            band.process(input, band_out);

            let rms = loudness::rms(band_out);
            *level = rms;
            square::convert(band_out, rms);

            for (acc, &s) in accumulator.iter_mut().zip(band_out.iter()) {
                *acc += s;
            }
        }
    }

    /// Clear every band's history and the level readout
    pub fn reset(&mut self) {
        for band in &mut self.bands {
            band.reset();
        }
        self.band_levels = [0.0; BAND_COUNT];
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Per-band RMS of the last block, in table order
    pub fn band_levels(&self) -> &[f32; BAND_COUNT] {
        &self.band_levels
    }

    pub fn bands(&self) -> &[BandFilter] {
        &self.bands
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
