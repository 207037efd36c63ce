// src/core/analysis/spectral_extent.rs
//
// Coarse summary of where a recording's spectral energy stops.

use serde::{Deserialize, Serialize};

use super::bandwidth::highest_bin_above;
use crate::core::dsp::{Stft, FRAME_SIZE};
use crate::core::waveform::Waveform;

/// Time-summed magnitude a bin must exceed to count as occupied
pub const EXTENT_THRESHOLD: f64 = 10.0;

/// Spectral extent of a waveform at its native rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralExtent {
    /// Frequency of the highest occupied bin, 0 when no bin is occupied
    pub top_frequency_hz: f64,
    /// Largest time-summed bin magnitude
    pub max_bin_energy: f64,
    /// Smallest time-summed bin magnitude
    pub min_bin_energy: f64,
}

pub fn analyze_spectral_extent(waveform: &Waveform) -> SpectralExtent {
    let spec = Stft::new(FRAME_SIZE).magnitude(waveform.samples(), waveform.sample_rate());
    let sums = spec.bin_sums();

    let top_frequency_hz = highest_bin_above(&sums, EXTENT_THRESHOLD)
        .map(|bin| spec.bin_frequencies()[bin])
        .unwrap_or(0.0);

    SpectralExtent {
        top_frequency_hz,
        max_bin_energy: sums.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_bin_energy: sums.iter().copied().fold(f64::INFINITY, f64::min),
    }
}
