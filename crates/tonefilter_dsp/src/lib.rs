//! Tonefilter DSP - Digital Signal Processing Module
//!
//! This crate provides the building blocks of the tone-to-square filter:
//! - 48 fixed tone bands (equal-tempered, C3 to B6) as static data
//! - Band-pass filters with persistent state across blocks
//! - Block RMS loudness estimation
//! - Square wave conversion at the band's loudness
//! - A per-channel filter bank that sums the converted bands
//!
//! # Architecture
//!
//! Everything on the processing path follows the "no allocation in audio
//! callback" rule. Callers hand in pre-allocated accumulator and scratch
//! buffers; filters only update their own history.

mod band_filter;
mod error;
mod filter_bank;
pub mod loudness;
pub mod square;
mod tones;

pub use band_filter::BandFilter;
pub use error::DspError;
pub use filter_bank::ChannelFilterBank;
pub use tones::{A4_BAND, BAND_BANDWIDTH_HZ, BAND_COUNT, TONE_FREQUENCIES};
