//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::AnalysisConfig;
use crate::core::analysis::BandwidthMethod;

/// Bandwidth heuristic selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BandwidthChoice {
    /// Band powers against the 21 kHz+ band, at 48 kHz
    Bandwise,
    /// Highest bin above a fixed magnitude
    Const,
    /// Highest bin above a fraction of the strongest bin
    Relative,
    /// All three heuristics
    All,
}

impl BandwidthChoice {
    fn methods(self) -> Vec<BandwidthMethod> {
        match self {
            Self::Bandwise => vec![BandwidthMethod::Bandwise],
            Self::Const => vec![BandwidthMethod::Const],
            Self::Relative => vec![BandwidthMethod::Relative],
            Self::All => BandwidthMethod::all(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "speechcheckr")]
#[command(version)]
#[command(about = "Speech recording diagnostics: amplitude reversals, SNR and bandwidth")]
pub struct Args {
    /// Input files or directories (searched recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Bandwidth heuristic to run (repeatable)
    #[arg(short, long = "bandwidth", value_enum)]
    pub bandwidth: Vec<BandwidthChoice>,

    /// Repair amplitude reversals and write <name>_SARrestored.wav
    #[arg(short, long)]
    pub repair: bool,

    /// Skip amplitude reversal counting
    #[arg(long)]
    pub no_sar: bool,

    /// Skip active speech level and SNR estimation
    #[arg(long)]
    pub no_snr: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON file with analysis settings
    #[arg(short, long, env = "SPEECHCHECKR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Overlay command-line flags onto settings loaded from file or defaults
    pub fn apply_to(&self, config: &mut AnalysisConfig) {
        if !self.bandwidth.is_empty() {
            let methods: Vec<BandwidthMethod> =
                self.bandwidth.iter().flat_map(|c| c.methods()).collect();
            config.set_bandwidth_methods(&methods);
        }
        if self.repair {
            config.repair_sar = true;
        }
        if self.no_sar {
            config.count_sar = false;
            config.repair_sar = false;
        }
        if self.no_snr {
            config.estimate_snr = false;
        }
    }
}
