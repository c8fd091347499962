//! Single Band-Pass Filter
//!
//! A second-order band-pass with constant 0 dB peak gain, from the
//! RBJ (Robert Bristow-Johnson) Audio EQ Cookbook. The width is given
//! in Hz and converted to Q as `center / bandwidth`, so every band of
//! the bank has the same absolute width regardless of its pitch.
//!
//! Filter state lives in a BiQuad in transposed direct form II, which
//! carries its history from one call to the next: processing a signal
//! in one block or in several consecutive blocks gives identical output.

use biquad::{Biquad, Coefficients, DirectForm2Transposed};

use crate::error::DspError;

/// Compute band-pass coefficients for the given tuning
///
/// Coefficients are derived in f64 and narrowed once, which keeps the
/// narrow high-Q bands accurate at high sample rates.
fn band_pass_coefficients(
    sample_rate: f32,
    center: f32,
    bandwidth: f32,
) -> Result<Coefficients<f32>, DspError> {
    let invalid = DspError::InvalidFilterParameter {
        sample_rate,
        frequency: center,
        bandwidth,
    };

    // Rust pattern: `!(x > 0.0)` also rejects NaN, which `x <= 0.0` would let through
    if !(sample_rate > 0.0 && sample_rate.is_finite()) {
        return Err(invalid);
    }
    if !(center > 0.0 && center.is_finite()) || center >= sample_rate / 2.0 {
        return Err(invalid);
    }
    if !(bandwidth > 0.0 && bandwidth.is_finite()) {
        return Err(invalid);
    }

    let fs = sample_rate as f64;
    let f0 = center as f64;
    let q = f0 / bandwidth as f64;

    let omega = 2.0 * std::f64::consts::PI * f0 / fs;
    let alpha = omega.sin() / (2.0 * q);
    let a0 = 1.0 + alpha;

    Ok(Coefficients {
        a1: (-2.0 * omega.cos() / a0) as f32,
        a2: ((1.0 - alpha) / a0) as f32,
        b0: (alpha / a0) as f32,
        b1: 0.0,
        b2: (-alpha / a0) as f32,
    })
}

/// One band of the filter bank
///
/// Not safe for concurrent use; one audio thread drives it block after block.
#[derive(Debug, Clone)]
pub struct BandFilter {
    filter: DirectForm2Transposed<f32>,
    sample_rate: f32,
    center: f32,
    bandwidth: f32,
}

impl BandFilter {
    /// Create a filter tuned to `center` Hz with `bandwidth` Hz width
    ///
    /// Fails with [`DspError::InvalidFilterParameter`] under the same
    /// conditions as [`configure`](Self::configure).
    pub fn new(sample_rate: f32, center: f32, bandwidth: f32) -> Result<Self, DspError> {
        let coeffs = band_pass_coefficients(sample_rate, center, bandwidth)?;
        Ok(Self {
            filter: DirectForm2Transposed::<f32>::new(coeffs),
            sample_rate,
            center,
            bandwidth,
        })
    }

    /// Re-derive coefficients for a new tuning
    ///
    /// History is kept, so a retune between blocks does not click.
    /// On error the filter keeps its previous tuning.
    ///
    /// # Errors
    /// [`DspError::InvalidFilterParameter`] when the sample rate, center or
    /// bandwidth is non-positive or non-finite, and also when `center` is
    /// at or above Nyquist. For the bank's top band (B6, ~1975.5 Hz) that
    /// means any sample rate below about 3.95 kHz is rejected.
    pub fn configure(
        &mut self,
        sample_rate: f32,
        center: f32,
        bandwidth: f32,
    ) -> Result<(), DspError> {
        let coeffs = band_pass_coefficients(sample_rate, center, bandwidth)?;
        self.filter.update_coefficients(coeffs);
        self.sample_rate = sample_rate;
        self.center = center;
        self.bandwidth = bandwidth;
        Ok(())
    }

    /// Filter `input` into `output`
    ///
    /// Processes `min(input.len(), output.len())` samples.
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = block length.
    #[inline]
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.filter.run(sample);
        }
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.filter.reset_state();
    }

    pub fn center_frequency(&self) -> f32 {
        self.center
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Quality factor derived from the tuning
    pub fn q(&self) -> f32 {
        self.center / self.bandwidth
    }
}
