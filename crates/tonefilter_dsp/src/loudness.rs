//! Block Loudness Estimation
//!
//! Root-mean-square level of one block of samples. Stateless: every
//! block is measured on its own.

/// Root-mean-square amplitude of `samples`
///
/// Returns 0.0 for an empty block. The sum of squares is accumulated in
/// f64, so a block of identical values `v` measures exactly `|v|`.
///
/// # Real-time Safety
/// No allocations. O(n) where n = block length.
#[inline]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_of_squares: f64 = samples
        .iter()
        .map(|&s| {
            let s = s as f64;
            s * s
        })
        .sum();

    (sum_of_squares / samples.len() as f64).sqrt() as f32
}
