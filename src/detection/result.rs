//! Per-file report types

use serde::Serialize;

use crate::core::analysis::{BandwidthLabel, BandwidthMethod, SpectralExtent};

/// Column names of the tabular report, in order
pub const CSV_HEADER: [&str; 11] = [
    "file",
    "sample_rate",
    "duration_secs",
    "sar_count",
    "restored_file",
    "asl_db",
    "activity_factor",
    "snr_db",
    "bandwidth_bandwise",
    "bandwidth_const",
    "bandwidth_relative",
];

/// Short amplitude reversal outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SarSummary {
    pub count: usize,
    /// Sample indices of the reversals
    pub events: Vec<usize>,
    /// Restored copy, present only when a repair was written
    pub restored_file: Option<String>,
}

/// Active speech level and SNR outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpeechSummary {
    pub asl_db: f64,
    pub activity_factor: f64,
    pub snr_db: f64,
}

/// One label per heuristic that ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandwidthSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwise: Option<BandwidthLabel>,
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<BandwidthLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative: Option<BandwidthLabel>,
}

impl BandwidthSummary {
    pub fn set(&mut self, method: BandwidthMethod, label: BandwidthLabel) {
        match method {
            BandwidthMethod::Bandwise => self.bandwise = Some(label),
            BandwidthMethod::Const => self.constant = Some(label),
            BandwidthMethod::Relative => self.relative = Some(label),
        }
    }

    pub fn get(&self, method: BandwidthMethod) -> Option<BandwidthLabel> {
        match method {
            BandwidthMethod::Bandwise => self.bandwise,
            BandwidthMethod::Const => self.constant,
            BandwidthMethod::Relative => self.relative,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bandwise.is_none() && self.constant.is_none() && self.relative.is_none()
    }

    /// Labels that ran, in bandwise/const/relative order
    pub fn entries(&self) -> impl Iterator<Item = (BandwidthMethod, BandwidthLabel)> + '_ {
        BandwidthMethod::all()
            .into_iter()
            .filter_map(move |m| self.get(m).map(|label| (m, label)))
    }
}

/// Complete analysis result for one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub sample_rate: u32,
    pub duration_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sar: Option<SarSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<SpeechSummary>,
    #[serde(skip_serializing_if = "BandwidthSummary::is_empty")]
    pub bandwidth: BandwidthSummary,
    pub spectral_extent: SpectralExtent,
}

impl FileReport {
    pub fn new(file: impl Into<String>, sample_rate: u32, duration_secs: f64) -> Self {
        Self {
            file: file.into(),
            sample_rate,
            duration_secs,
            sar: None,
            speech: None,
            bandwidth: BandwidthSummary::default(),
            spectral_extent: SpectralExtent::default(),
        }
    }

    pub fn restored_file(&self) -> Option<&str> {
        self.sar.as_ref().and_then(|s| s.restored_file.as_deref())
    }

    /// Values for each CSV_HEADER column; analyses that did not run are blank
    pub fn csv_fields(&self) -> Vec<String> {
        let label = |m| self.bandwidth.get(m).map(|l| l.to_string()).unwrap_or_default();
        vec![
            self.file.clone(),
            self.sample_rate.to_string(),
            format!("{:.3}", self.duration_secs),
            self.sar.as_ref().map(|s| s.count.to_string()).unwrap_or_default(),
            self.restored_file().unwrap_or_default().to_string(),
            self.speech.map(|s| format!("{:.2}", s.asl_db)).unwrap_or_default(),
            self.speech
                .map(|s| format!("{:.4}", s.activity_factor))
                .unwrap_or_default(),
            self.speech.map(|s| format!("{:.2}", s.snr_db)).unwrap_or_default(),
            label(BandwidthMethod::Bandwise),
            label(BandwidthMethod::Const),
            label(BandwidthMethod::Relative),
        ]
    }
}
