//! Fixed Tone Frequency Table
//!
//! The filter bank splits every channel into 48 bands, one per
//! equal-tempered semitone from C3 up to B6 (A4 = 440 Hz).
//! The table is shared by reference by every bank in the process.

/// Number of bands in every channel filter bank
pub const BAND_COUNT: usize = 48;

/// Bandwidth of every band filter (Hz)
pub const BAND_BANDWIDTH_HZ: f32 = 40.0;

/// Center frequencies (Hz) of the 48 tone bands, lowest first
pub static TONE_FREQUENCIES: [f32; BAND_COUNT] = [
    // Octave 3
    130.8128, 138.5913, 146.8324, 155.5635, 164.8138, 174.6141,
    184.9972, 195.9977, 207.6523, 220.0000, 233.0819, 246.9417,
    // Octave 4
    261.6256, 277.1826, 293.6648, 311.1270, 329.6276, 349.2282,
    369.9944, 391.9954, 415.3047, 440.0000, 466.1638, 493.8833,
    // Octave 5
    523.2511, 554.3653, 587.3295, 622.2540, 659.2551, 698.4565,
    739.9888, 783.9909, 830.6094, 880.0000, 932.3275, 987.7666,
    // Octave 6
    1046.5023, 1108.7305, 1174.6591, 1244.5079, 1318.5102, 1396.9129,
    1479.9777, 1567.9817, 1661.2188, 1760.0000, 1864.6550, 1975.5332,
];

/// Index of the band tuned to concert A (440 Hz)
pub const A4_BAND: usize = 21;
