// src/core/analysis/bandwidth.rs
//
// Effective transmitted bandwidth classification.
//
// Three independent heuristics map a waveform's spectral energy
// distribution onto one label. They are alternatives, not stages: a caller
// may run any subset and compare them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::dsp::{resample, Spectrogram, Stft, FRAME_SIZE};
use crate::core::waveform::Waveform;
use crate::error::Result;

/// Upper frequency limits for the extent-based labels
const NB_LIMIT_HZ: f64 = 4000.0;
const WB_LIMIT_HZ: f64 = 8000.0;
const SWB_LIMIT_HZ: f64 = 16000.0;

/// Discrete bandwidth classification, ordered from none to widest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BandwidthLabel {
    /// Silent or unanalyzable recording
    Empty,
    /// Narrowband
    Nb,
    /// Wideband
    Wb,
    /// Super-wideband
    Swb,
    /// Fullband
    Fb,
}

impl BandwidthLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Nb => "NB",
            Self::Wb => "WB",
            Self::Swb => "SWB",
            Self::Fb => "FB",
        }
    }

    /// Label for a recording whose spectrum extends up to `hz`
    pub fn from_top_frequency(hz: f64) -> Self {
        if hz < NB_LIMIT_HZ {
            Self::Nb
        } else if hz < WB_LIMIT_HZ {
            Self::Wb
        } else if hz < SWB_LIMIT_HZ {
            Self::Swb
        } else {
            Self::Fb
        }
    }
}

impl fmt::Display for BandwidthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selectable classification heuristic
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BandwidthMethod {
    /// Average band power relative to the 21 kHz+ overflow band
    Bandwise,
    /// Highest bin above an absolute magnitude
    Const,
    /// Highest bin above a fraction of the strongest bin
    Relative,
}

impl BandwidthMethod {
    pub fn all() -> Vec<Self> {
        vec![Self::Bandwise, Self::Const, Self::Relative]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bandwise => "bandwise",
            Self::Const => "const",
            Self::Relative => "relative",
        }
    }
}

/// Common contract of the bandwidth heuristics
pub trait BandwidthStrategy: Send + Sync {
    fn method(&self) -> BandwidthMethod;
    fn classify(&self, waveform: &Waveform) -> Result<BandwidthLabel>;
}

/// Magnitude spectrogram at the waveform's native rate
fn native_spectrogram(waveform: &Waveform) -> Spectrogram {
    Stft::new(FRAME_SIZE).magnitude(waveform.samples(), waveform.sample_rate())
}

/// Index of the highest bin whose value strictly exceeds `threshold`
pub fn highest_bin_above(values: &[f64], threshold: f64) -> Option<usize> {
    values.iter().rposition(|&v| v > threshold)
}

fn label_from_extent(spec: &Spectrogram, sums: &[f64], threshold: f64) -> BandwidthLabel {
    match highest_bin_above(sums, threshold) {
        None => BandwidthLabel::Empty,
        Some(bin) => {
            let top_hz = spec.bin_frequencies()[bin];
            log::debug!("Spectral extent: bin {} ({:.0} Hz) > {:.3}", bin, top_hz, threshold);
            BandwidthLabel::from_top_frequency(top_hz)
        }
    }
}

// ---------------------------------------------------------------------------
// Bandwise
// ---------------------------------------------------------------------------

/// Half-open frequency range `[low_hz, high_hz)`
#[derive(Debug, Clone, Copy)]
struct BandRange {
    low_hz: f64,
    high_hz: f64,
}

impl BandRange {
    const fn new(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    fn contains(&self, hz: f64) -> bool {
        hz >= self.low_hz && hz < self.high_hz
    }
}

const BASE_BAND: BandRange = BandRange::new(800.0, 2500.0);
const WIDE_BAND: BandRange = BandRange::new(5000.0, 7000.0);
const SUPER_WIDE_BAND: BandRange = BandRange::new(9000.0, 13000.0);
const FULL_BAND: BandRange = BandRange::new(15000.0, 20000.0);
/// The overflow band runs from just above this frequency up to Nyquist
const OVERFLOW_FLOOR_HZ: f64 = 21000.0;

/// Mean dB power in each named band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLevels {
    pub base: f64,
    pub wide: f64,
    pub super_wide: f64,
    pub full: f64,
    pub overflow: f64,
}

fn mean_where(values: &[f64], freqs: &[f64], keep: impl Fn(f64) -> bool) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .zip(freqs)
        .filter(|&(_, &f)| keep(f))
        .fold((0.0, 0usize), |(s, c), (&v, _)| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

fn band_levels(db: &[f64], freqs: &[f64]) -> Option<BandLevels> {
    let band = |range: BandRange| mean_where(db, freqs, |f| range.contains(f));
    Some(BandLevels {
        base: band(BASE_BAND)?,
        wide: band(WIDE_BAND)?,
        super_wide: band(SUPER_WIDE_BAND)?,
        full: band(FULL_BAND)?,
        overflow: mean_where(db, freqs, |f| f > OVERFLOW_FLOOR_HZ)?,
    })
}

/// Compares the average power of increasingly wide bands against the
/// overflow band above 21 kHz, at a fixed analysis rate.
#[derive(Debug, Clone, Copy)]
pub struct Bandwise {
    analysis_rate: u32,
    margin_db: f64,
}

impl Default for Bandwise {
    fn default() -> Self {
        Self {
            analysis_rate: 48000,
            margin_db: 1.0,
        }
    }
}

impl Bandwise {
    pub fn new(analysis_rate: u32, margin_db: f64) -> Self {
        Self {
            analysis_rate,
            margin_db,
        }
    }

    /// Per-band mean dB power; `None` when a band holds no bins at the
    /// analysis rate
    pub fn levels(&self, waveform: &Waveform) -> Result<Option<BandLevels>> {
        let samples = resample(
            waveform.samples(),
            waveform.sample_rate(),
            self.analysis_rate,
        )?;
        let spec = Stft::new(FRAME_SIZE).magnitude(&samples, self.analysis_rate);
        let db = spec.mean_power_db();
        Ok(band_levels(&db, &spec.bin_frequencies()))
    }
}

impl BandwidthStrategy for Bandwise {
    fn method(&self) -> BandwidthMethod {
        BandwidthMethod::Bandwise
    }

    fn classify(&self, waveform: &Waveform) -> Result<BandwidthLabel> {
        let Some(levels) = self.levels(waveform)? else {
            log::debug!(
                "Bandwise: {} Hz analysis rate leaves a band without bins",
                self.analysis_rate
            );
            return Ok(BandwidthLabel::Empty);
        };

        log::debug!(
            "Bandwise over overflow: base {:.2}, wide {:.2}, super-wide {:.2}, full {:.2} dB",
            levels.base - levels.overflow,
            levels.wide - levels.overflow,
            levels.super_wide - levels.overflow,
            levels.full - levels.overflow
        );

        let clears = |level: f64| level - levels.overflow >= self.margin_db;

        let label = if !clears(levels.base) {
            BandwidthLabel::Empty
        } else if !clears(levels.wide) {
            BandwidthLabel::Nb
        } else if !clears(levels.super_wide) {
            BandwidthLabel::Wb
        } else if !clears(levels.full) {
            BandwidthLabel::Swb
        } else {
            BandwidthLabel::Fb
        };
        Ok(label)
    }
}

// ---------------------------------------------------------------------------
// Const / Relative
// ---------------------------------------------------------------------------

/// Highest bin whose time-summed magnitude exceeds a fixed constant
#[derive(Debug, Clone, Copy)]
pub struct ConstThreshold {
    threshold: f64,
}

impl Default for ConstThreshold {
    fn default() -> Self {
        Self { threshold: 10.0 }
    }
}

impl ConstThreshold {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl BandwidthStrategy for ConstThreshold {
    fn method(&self) -> BandwidthMethod {
        BandwidthMethod::Const
    }

    fn classify(&self, waveform: &Waveform) -> Result<BandwidthLabel> {
        let spec = native_spectrogram(waveform);
        let sums = spec.bin_sums();
        Ok(label_from_extent(&spec, &sums, self.threshold))
    }
}

/// Highest bin whose time-summed magnitude exceeds `1 / factor` of the
/// strongest bin
#[derive(Debug, Clone, Copy)]
pub struct RelativeThreshold {
    factor: f64,
}

impl Default for RelativeThreshold {
    fn default() -> Self {
        Self { factor: 1000.0 }
    }
}

impl RelativeThreshold {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl BandwidthStrategy for RelativeThreshold {
    fn method(&self) -> BandwidthMethod {
        BandwidthMethod::Relative
    }

    fn classify(&self, waveform: &Waveform) -> Result<BandwidthLabel> {
        let spec = native_spectrogram(waveform);
        let sums = spec.bin_sums();
        let peak = sums.iter().copied().fold(0.0f64, f64::max);
        Ok(label_from_extent(&spec, &sums, peak / self.factor))
    }
}
