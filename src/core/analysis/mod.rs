//! Speech quality analysis algorithms
//!
//! Contains the per-file analyses:
//! - Short amplitude reversal detection and repair
//! - Active speech level (ITU-T P.56)
//! - SNR estimation from active speech statistics
//! - Bandwidth classification (bandwise, constant and relative thresholds)
//! - Spectral extent summary

mod bandwidth;
mod sar;
mod snr;
mod spectral_extent;
mod speech_level;

pub use bandwidth::{
    highest_bin_above, BandLevels, BandwidthLabel, BandwidthMethod, BandwidthStrategy, Bandwise,
    ConstThreshold, RelativeThreshold,
};
pub use sar::{detect_sar, repair_sar, SarDetection, SarDetector, SarRepair, SarRepairer};
pub use snr::{estimate_snr, SnrEstimator, SNR_CEILING_DB, SNR_FLOOR_DB};
pub use spectral_extent::{analyze_spectral_extent, SpectralExtent, EXTENT_THRESHOLD};
pub use speech_level::{ActiveSpeechLevel, ActiveSpeechStats, P56Meter};
