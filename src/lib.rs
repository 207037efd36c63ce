//! speechcheckr - Speech recording quality diagnostics
//!
//! Inspects decoded speech recordings for three kinds of problems:
//!
//! - **Short amplitude reversals (SAR)**: wraparound glitches where a sample
//!   jumps to the opposite sign and back within a few samples. They can be
//!   counted, or repaired into a `<name>_SARrestored.wav` copy.
//! - **Signal-to-noise ratio**: estimated from ITU-T P.56 active speech
//!   level and activity factor.
//! - **Effective bandwidth**: NB / WB / SWB / FB (or EMPTY) by three
//!   independent heuristics (bandwise, const, relative).
//!
//! ## Module Structure
//!
//! - `core` - Waveform model, decoding, DSP and the analyses
//! - `cli` - Command-line arguments and output formatting
//! - `config` - Analysis settings
//! - `detection` - Per-file report types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use speechcheckr::core::AnalyzerBuilder;
//! use speechcheckr::core::analysis::BandwidthMethod;
//!
//! let report = AnalyzerBuilder::new()
//!     .bandwidth_methods(&BandwidthMethod::all())
//!     .build("interview.flac")?
//!     .analyze()?;
//!
//! println!("{:?} {:?}", report.speech, report.bandwidth);
//! ```

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Analysis settings
pub mod config;

// Report types
pub mod detection;

pub mod error;

pub use config::AnalysisConfig;
pub use core::analysis::{
    detect_sar, estimate_snr, repair_sar, ActiveSpeechLevel, ActiveSpeechStats, BandwidthLabel,
    BandwidthMethod, BandwidthStrategy, Bandwise, ConstThreshold, P56Meter, RelativeThreshold,
    SarDetection, SarRepair,
};
pub use core::{AnalyzerBuilder, AudioData, SpeechAnalyzer, Waveform};
pub use detection::FileReport;
pub use error::{Result, SpeechCheckError};
