//! Square Wave Conversion
//!
//! Replaces a filtered band with a constant-envelope square wave: every
//! sample becomes `+rms` or `-rms` depending on the sign of the filtered
//! sample. Magnitude and shape of the band are discarded; only its block
//! loudness and its zero crossings survive.
//!
//! Exactly-zero (and NaN) samples take the negative branch.

/// Convert one filtered sample to its square-wave value
#[inline]
pub fn square(sample: f32, rms: f32) -> f32 {
    if sample > 0.0 {
        rms
    } else {
        -rms
    }
}

/// Convert a filtered block to a square wave in place
///
/// # Real-time Safety
/// No allocations. O(n) where n = block length.
#[inline]
pub fn convert(filtered: &mut [f32], rms: f32) {
    for sample in filtered.iter_mut() {
        *sample = square(*sample, rms);
    }
}
