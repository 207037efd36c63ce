// src/core/analysis/speech_level.rs
//
// Active speech level per ITU-T P.56 (method B).
//
// The SNR estimator only depends on the `ActiveSpeechLevel` contract;
// `P56Meter` is the implementation the analyzer uses by default.

use serde::{Deserialize, Serialize};

use crate::core::dsp::envelope;
use crate::core::waveform::Waveform;

/// Envelope smoothing time constant in seconds
const TIME_CONSTANT_S: f64 = 0.03;
/// Hangover time in seconds
const HANGOVER_S: f64 = 0.2;
/// Margin between active level and threshold, in dB
const MARGIN_DB: f64 = 15.9;
/// Bisection tolerance in dB
const INTERP_TOLERANCE_DB: f64 = 0.5;

/// Aggregate active-speech statistics of one waveform
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveSpeechStats {
    /// Mean-square level of the active speech portion (linear, >= 0)
    pub mean_square_level: f64,
    /// Fraction of the waveform judged active, in [0, 1]
    pub activity_factor: f64,
    /// Speech/noise envelope threshold (linear amplitude)
    pub threshold: f64,
}

impl ActiveSpeechStats {
    /// Stats of a waveform with no detectable speech
    pub fn silent() -> Self {
        Self::default()
    }

    /// Active speech level in dB (10 log10 of the mean-square level)
    pub fn level_db(&self) -> f64 {
        10.0 * (self.mean_square_level + f64::EPSILON).log10()
    }
}

/// Source of active-speech statistics
pub trait ActiveSpeechLevel {
    fn measure(&self, waveform: &Waveform) -> ActiveSpeechStats;
}

/// ITU-T P.56 method B active speech level meter
#[derive(Debug, Clone, Copy)]
pub struct P56Meter {
    /// Quantizer resolution; sets the number of envelope thresholds
    quantizer_bits: u32,
}

impl Default for P56Meter {
    fn default() -> Self {
        Self { quantizer_bits: 16 }
    }
}

impl P56Meter {
    pub fn new(quantizer_bits: u32) -> Self {
        Self { quantizer_bits }
    }

    /// Envelope thresholds from one quantizing step up to half of full scale
    fn thresholds(&self) -> Vec<f64> {
        let count = self.quantizer_bits.saturating_sub(1) as i32;
        (0..count).map(|j| 2f64.powi(j - 15)).collect()
    }
}

impl ActiveSpeechLevel for P56Meter {
    fn measure(&self, waveform: &Waveform) -> ActiveSpeechStats {
        let samples = waveform.samples();
        let fs = waveform.sample_rate() as f64;
        let thresholds = self.thresholds();
        if samples.is_empty() || thresholds.is_empty() || fs <= 0.0 {
            return ActiveSpeechStats::silent();
        }

        let hangover = (fs * HANGOVER_S).ceil() as usize;
        let g = (-1.0 / (fs * TIME_CONSTANT_S)).exp();
        let q = envelope(samples, g);

        let mut activity = vec![0usize; thresholds.len()];
        let mut hang = vec![hangover; thresholds.len()];
        for &level in &q {
            for (j, &c) in thresholds.iter().enumerate() {
                if level >= c {
                    activity[j] += 1;
                    hang[j] = 0;
                } else if hang[j] < hangover {
                    activity[j] += 1;
                    hang[j] += 1;
                } else {
                    break;
                }
            }
        }

        let energy = waveform.energy();
        let eps = f64::EPSILON;

        if activity[0] == 0 {
            return ActiveSpeechStats::silent();
        }
        let a0 = 10.0 * (energy / activity[0] as f64 + eps).log10();
        let c0 = 20.0 * (thresholds[0] + eps).log10();
        if a0 - c0 < MARGIN_DB {
            return ActiveSpeechStats::silent();
        }

        let level_db: Vec<f64> = activity
            .iter()
            .map(|&a| 10.0 * (energy / (a as f64 + eps) + eps).log10())
            .collect();
        let thresh_db: Vec<f64> = thresholds
            .iter()
            .map(|&c| 20.0 * (c + eps).log10())
            .collect();

        for j in 1..thresholds.len() {
            if activity[j] == 0 {
                continue;
            }
            if level_db[j] - thresh_db[j] <= MARGIN_DB {
                let (asl_db, thr_db) = bisect_margin(
                    (level_db[j], thresh_db[j]),
                    (level_db[j - 1], thresh_db[j - 1]),
                    MARGIN_DB,
                    INTERP_TOLERANCE_DB,
                );
                let mean_square_level = 10f64.powf(asl_db / 10.0);
                let activity_factor =
                    ((energy / samples.len() as f64) / mean_square_level).min(1.0);
                let stats = ActiveSpeechStats {
                    mean_square_level,
                    activity_factor,
                    threshold: 10f64.powf(thr_db / 20.0),
                };
                log::debug!(
                    "P.56: level {:.2} dB, activity {:.3}, threshold {:.2e}",
                    stats.level_db(),
                    stats.activity_factor,
                    stats.threshold
                );
                return stats;
            }
        }

        ActiveSpeechStats::silent()
    }
}

/// Locate the point between two (level, threshold) pairs where
/// `level - threshold` equals `margin`.
///
/// `upper` already satisfies `level - threshold <= margin`; `lower` does not.
fn bisect_margin(upper: (f64, f64), lower: (f64, f64), margin: f64, tolerance: f64) -> (f64, f64) {
    let mut tol = tolerance.abs();

    if (upper.0 - upper.1 - margin).abs() < tol {
        return upper;
    }
    if (lower.0 - lower.1 - margin).abs() < tol {
        return lower;
    }

    let (mut up, mut lw) = (upper, lower);
    let mut mid = ((up.0 + lw.0) / 2.0, (up.1 + lw.1) / 2.0);
    let mut iterations = 1;

    loop {
        let diff = mid.0 - mid.1 - margin;
        if diff.abs() <= tol {
            break;
        }
        iterations += 1;
        if iterations > 20 {
            tol *= 1.1;
        }
        if diff > tol {
            lw = mid;
            mid = ((up.0 + mid.0) / 2.0, (up.1 + mid.1) / 2.0);
        } else if diff < -tol {
            up = mid;
            mid = ((mid.0 + lw.0) / 2.0, (mid.1 + lw.1) / 2.0);
        }
    }

    mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone_with_silence(rate: u32, active_secs: f32, silent_secs: f32, amp: f32) -> Waveform {
        let active = (rate as f32 * active_secs) as usize;
        let silent = (rate as f32 * silent_secs) as usize;
        let mut samples: Vec<f32> = (0..active)
            .map(|i| amp * (2.0 * PI * 440.0 * i as f32 / rate as f32).sin())
            .collect();
        samples.extend(std::iter::repeat(0.0).take(silent));
        Waveform::new(samples, rate)
    }

    #[test]
    fn test_thresholds_for_16_bits() {
        let t = P56Meter::default().thresholds();
        assert_eq!(t.len(), 15);
        assert!((t[0] - 2f64.powi(-15)).abs() < 1e-18);
        assert!((t[14] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_silence_is_inactive() {
        let stats = P56Meter::default().measure(&Waveform::new(vec![0.0; 16000], 16000));
        assert_eq!(stats, ActiveSpeechStats::silent());
        let stats = P56Meter::default().measure(&Waveform::new(vec![], 16000));
        assert_eq!(stats.activity_factor, 0.0);
    }

    #[test]
    fn test_half_active_tone() {
        let wave = tone_with_silence(16000, 1.0, 1.0, 0.5);
        let stats = P56Meter::default().measure(&wave);

        // Active part plus hangover: a bit over half the file
        assert!(
            stats.activity_factor > 0.45 && stats.activity_factor < 0.8,
            "activity {}",
            stats.activity_factor
        );
        // Active level close to the tone's mean square (0.125 = -9 dB)
        assert!((stats.level_db() - -9.03).abs() < 2.0, "level {}", stats.level_db());
        assert!(stats.threshold > 0.0);
    }

    #[test]
    fn test_continuous_tone_is_fully_active() {
        let wave = tone_with_silence(16000, 2.0, 0.0, 0.3);
        let stats = P56Meter::default().measure(&wave);
        assert!(stats.activity_factor > 0.95);
    }

    #[test]
    fn test_bisect_returns_endpoint_within_tolerance() {
        let upper = (-20.0, -35.8);
        let lower = (-18.0, -41.8);
        assert_eq!(bisect_margin(upper, lower, 15.9, 0.5), upper);
    }

    #[test]
    fn test_bisect_converges() {
        let upper = (-20.0, -30.0); // delta 10
        let lower = (-10.0, -40.0); // delta 30
        let (a, c) = bisect_margin(upper, lower, 15.9, 0.5);
        assert!((a - c - 15.9).abs() <= 0.5);
        assert!(a < -10.0 && a > -20.0);
    }
}
