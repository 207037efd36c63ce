// src/config/settings.rs
//
// Analysis settings shared by the library and the CLI. A JSON file may
// provide any subset of fields; missing fields keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::analysis::BandwidthMethod;
use crate::error::{Result, SpeechCheckError};

/// Which analyses run on each file and how they are tuned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Count short amplitude reversals
    pub count_sar: bool,
    /// Repair reversals and write a restored copy when any are found
    pub repair_sar: bool,
    /// Estimate active speech level and SNR
    pub estimate_snr: bool,
    /// Bandwidth heuristics to run, in report order
    pub bandwidth_methods: Vec<BandwidthMethod>,
    /// Absolute magnitude for the const heuristic
    pub const_threshold: f64,
    /// Divisor of the strongest bin for the relative heuristic
    pub relative_factor: f64,
    /// Analysis rate of the bandwise heuristic (Hz)
    pub bandwise_rate: u32,
    /// Cascade margin of the bandwise heuristic (dB)
    pub band_margin_db: f64,
    /// Quantizer resolution assumed by the P.56 meter
    pub quantizer_bits: u32,
    /// File-name suffix of restored copies
    pub restored_suffix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            count_sar: true,
            repair_sar: false,
            estimate_snr: true,
            bandwidth_methods: vec![BandwidthMethod::Relative],
            const_threshold: 10.0,
            relative_factor: 1000.0,
            bandwise_rate: 48000,
            band_margin_db: 1.0,
            quantizer_bits: 16,
            restored_suffix: "_SARrestored".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load settings from a JSON file and validate them
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SpeechCheckError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| SpeechCheckError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.relative_factor > 0.0) {
            return Err(SpeechCheckError::Config(format!(
                "relative_factor must be positive, got {}",
                self.relative_factor
            )));
        }
        if self.bandwise_rate == 0 {
            return Err(SpeechCheckError::Config("bandwise_rate must be positive".into()));
        }
        if self.restored_suffix.is_empty() {
            return Err(SpeechCheckError::Config("restored_suffix must not be empty".into()));
        }
        if !(2..=32).contains(&self.quantizer_bits) {
            return Err(SpeechCheckError::Config(format!(
                "quantizer_bits must be in 2..=32, got {}",
                self.quantizer_bits
            )));
        }
        Ok(())
    }

    /// Whether any analysis at all is enabled
    pub fn has_work(&self) -> bool {
        self.count_sar || self.repair_sar || self.estimate_snr || !self.bandwidth_methods.is_empty()
    }

    /// Replace the bandwidth selection, dropping duplicates but keeping order
    pub fn set_bandwidth_methods(&mut self, methods: &[BandwidthMethod]) {
        self.bandwidth_methods.clear();
        for &m in methods {
            if !self.bandwidth_methods.contains(&m) {
                self.bandwidth_methods.push(m);
            }
        }
    }
}
