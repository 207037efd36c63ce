// src/core/analyzer.rs
//
// Per-file orchestration with builder pattern. One analyzer owns one
// decoded waveform and runs the configured analyses over it.

use std::path::{Path, PathBuf};

use super::analysis::{
    analyze_spectral_extent, detect_sar, repair_sar, ActiveSpeechLevel, BandwidthMethod,
    BandwidthStrategy, Bandwise, ConstThreshold, P56Meter, RelativeThreshold, SnrEstimator,
};
use super::decoder::load_waveform;
use super::waveform::Waveform;
use super::writer::{restored_path, write_pcm24};
use crate::config::AnalysisConfig;
use crate::detection::{FileReport, SarSummary, SpeechSummary};
use crate::error::Result;

/// Builder for SpeechAnalyzer configuration
pub struct AnalyzerBuilder {
    config: AnalysisConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn count_sar(mut self, enabled: bool) -> Self {
        self.config.count_sar = enabled;
        self
    }

    pub fn repair_sar(mut self, enabled: bool) -> Self {
        self.config.repair_sar = enabled;
        self
    }

    pub fn estimate_snr(mut self, enabled: bool) -> Self {
        self.config.estimate_snr = enabled;
        self
    }

    pub fn bandwidth_methods(mut self, methods: &[BandwidthMethod]) -> Self {
        self.config.set_bandwidth_methods(methods);
        self
    }

    /// Decode `path` and build an analyzer for it
    pub fn build<P: AsRef<Path>>(self, path: P) -> Result<SpeechAnalyzer> {
        self.config.validate()?;
        let path = path.as_ref();
        let waveform = load_waveform(path)?;
        Ok(SpeechAnalyzer {
            path: path.to_path_buf(),
            waveform,
            config: self.config,
        })
    }

    /// Build an analyzer over an in-memory waveform; `path` names the
    /// source and anchors the restored copy
    pub fn build_from_waveform<P: AsRef<Path>>(
        self,
        path: P,
        waveform: Waveform,
    ) -> Result<SpeechAnalyzer> {
        self.config.validate()?;
        Ok(SpeechAnalyzer {
            path: path.as_ref().to_path_buf(),
            waveform,
            config: self.config,
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the configured speech analyses on one recording
pub struct SpeechAnalyzer {
    path: PathBuf,
    waveform: Waveform,
    config: AnalysisConfig,
}

impl SpeechAnalyzer {
    /// Create analyzer with default configuration
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        AnalyzerBuilder::new().build(path)
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every enabled analysis
    pub fn analyze(&self) -> Result<FileReport> {
        let mut report = FileReport::new(
            self.path.display().to_string(),
            self.waveform.sample_rate(),
            self.waveform.duration_secs(),
        );

        if self.config.repair_sar {
            report.sar = Some(self.repair()?);
        } else if self.config.count_sar {
            let detection = detect_sar(&self.waveform);
            report.sar = Some(SarSummary {
                count: detection.count,
                events: detection.events,
                restored_file: None,
            });
        }

        if self.config.estimate_snr {
            report.speech = Some(self.speech_summary());
        }

        for strategy in self.strategies() {
            let label = strategy.classify(&self.waveform)?;
            log::debug!("{}: bandwidth ({}) {}", self.path.display(), strategy.method().name(), label);
            report.bandwidth.set(strategy.method(), label);
        }

        report.spectral_extent = analyze_spectral_extent(&self.waveform);

        Ok(report)
    }

    /// Repair reversals; persist the restored copy only when something changed
    fn repair(&self) -> Result<SarSummary> {
        let repair = repair_sar(&self.waveform);
        let mut restored_file = None;

        if repair.repaired_any() {
            let out = restored_path(&self.path, &self.config.restored_suffix);
            write_pcm24(&out, &repair.waveform)?;
            log::info!(
                "{}: {} reversal(s) repaired, wrote {}",
                self.path.display(),
                repair.count,
                out.display()
            );
            restored_file = Some(out.display().to_string());
        }

        Ok(SarSummary {
            count: repair.count,
            events: repair.events,
            restored_file,
        })
    }

    fn speech_summary(&self) -> SpeechSummary {
        let stats = P56Meter::new(self.config.quantizer_bits).measure(&self.waveform);
        let snr_db = SnrEstimator::new().estimate(&self.waveform, &stats);
        SpeechSummary {
            asl_db: stats.level_db(),
            activity_factor: stats.activity_factor,
            snr_db,
        }
    }

    fn strategies(&self) -> Vec<Box<dyn BandwidthStrategy>> {
        self.config
            .bandwidth_methods
            .iter()
            .map(|method| -> Box<dyn BandwidthStrategy> {
                match method {
                    BandwidthMethod::Bandwise => Box::new(Bandwise::new(
                        self.config.bandwise_rate,
                        self.config.band_margin_db,
                    )),
                    BandwidthMethod::Const => {
                        Box::new(ConstThreshold::new(self.config.const_threshold))
                    }
                    BandwidthMethod::Relative => {
                        Box::new(RelativeThreshold::new(self.config.relative_factor))
                    }
                }
            })
            .collect()
    }
}
