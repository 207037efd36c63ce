// src/core/analysis/snr.rs
//
// SNR estimation from aggregate active-speech statistics.
//
// No per-sample speech/noise labelling is available: the speech share of
// the total energy is inferred from the active level and activity factor,
// and whatever energy remains is attributed to noise.

use super::speech_level::ActiveSpeechStats;
use crate::core::waveform::Waveform;

/// Ceiling of the reported SNR in dB
pub const SNR_CEILING_DB: f64 = 99.0;

/// SNR reported when no speech level is available
pub const SNR_FLOOR_DB: f64 = 0.0;

/// Estimate the signal-to-noise ratio of `waveform` in dB.
///
/// Capped at 99 dB; noisy recordings may go negative.
pub fn estimate_snr(waveform: &Waveform, stats: &ActiveSpeechStats) -> f64 {
    let eps = f64::EPSILON;
    let activity = stats.activity_factor;

    if activity == 0.0 {
        return SNR_FLOOR_DB;
    }
    if activity >= 1.0 {
        return SNR_CEILING_DB;
    }
    if waveform.is_empty() || stats.mean_square_level <= 0.0 {
        return SNR_FLOOR_DB;
    }

    let rms_signal = stats.mean_square_level.sqrt();

    let n_total = waveform.len() as f64;
    let total_energy = waveform.energy();
    let speech_energy = stats.mean_square_level * n_total * activity;

    let mut noise_energy = total_energy - speech_energy;
    if noise_energy <= 0.0 {
        noise_energy = eps;
    }

    let n_noise = n_total * (1.0 - activity);
    let rms_noise = (noise_energy / n_noise).sqrt();

    let snr_db = 20.0 * (rms_signal / (rms_noise + eps)).log10();

    log::debug!(
        "SNR: rms_signal {:.3e}, rms_noise {:.3e}, {:.2} dB",
        rms_signal,
        rms_noise,
        snr_db
    );

    snr_db.min(SNR_CEILING_DB)
}

/// Stateless SNR estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct SnrEstimator;

impl SnrEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn estimate(&self, waveform: &Waveform, stats: &ActiveSpeechStats) -> f64 {
        estimate_snr(waveform, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(ms: f64, activity: f64) -> ActiveSpeechStats {
        ActiveSpeechStats {
            mean_square_level: ms,
            activity_factor: activity,
            threshold: 0.0,
        }
    }

    fn noisy_wave() -> Waveform {
        Waveform::new((0..1000).map(|i| if i % 2 == 0 { 0.1 } else { -0.1 }).collect(), 8000)
    }

    #[test]
    fn test_no_activity_is_zero() {
        for ms in [0.0, 0.01, 5.0] {
            assert_eq!(estimate_snr(&noisy_wave(), &stats(ms, 0.0)), 0.0);
        }
    }

    #[test]
    fn test_full_activity_is_ceiling() {
        for (ms, act) in [(0.0, 1.0), (0.3, 1.0), (0.3, 1.2)] {
            assert_eq!(estimate_snr(&noisy_wave(), &stats(ms, act)), 99.0);
        }
    }

    #[test]
    fn test_known_ratio() {
        // 1000 samples: 500 at 0.5 (speech), 500 at 0.05 (noise)
        let mut samples = vec![0.5f32; 500];
        samples.extend(vec![0.05f32; 500]);
        let wave = Waveform::new(samples, 8000);

        let snr = estimate_snr(&wave, &stats(0.25, 0.5));
        // 20 log10(0.5 / 0.05) = 20 dB
        assert!((snr - 20.0).abs() < 1e-3, "snr {}", snr);
    }

    #[test]
    fn test_negative_residual_hits_ceiling() {
        // Speech estimate exceeds total energy: noise floored at epsilon
        let wave = Waveform::new(vec![0.1; 100], 8000);
        assert_eq!(estimate_snr(&wave, &stats(1.0, 0.5)), 99.0);
    }

    #[test]
    fn test_monotonic_in_signal_level() {
        let wave = Waveform::new(vec![0.05; 1000], 8000);
        let mut last = f64::NEG_INFINITY;
        for ms in [0.001, 0.003, 0.005, 0.007, 0.008] {
            let snr = estimate_snr(&wave, &stats(ms, 0.3));
            assert!(snr >= last, "{} < {}", snr, last);
            last = snr;
        }
        assert!(last > 10.0);
    }

    #[test]
    fn test_monotonic_in_noise_level() {
        let mut last = f64::INFINITY;
        for noise in [0.01f32, 0.02, 0.05, 0.1] {
            let mut samples = vec![0.3f32; 500];
            samples.extend(vec![noise; 500]);
            let snr = estimate_snr(&Waveform::new(samples, 8000), &stats(0.09, 0.5));
            assert!(snr <= last);
            last = snr;
        }
    }

    #[test]
    fn test_empty_waveform_is_zero() {
        let wave = Waveform::new(vec![], 8000);
        assert_eq!(estimate_snr(&wave, &stats(0.1, 0.5)), 0.0);
    }

    #[test]
    fn test_zero_signal_level_is_zero() {
        assert_eq!(estimate_snr(&noisy_wave(), &stats(0.0, 0.5)), 0.0);
    }

    #[test]
    fn test_noise_louder_than_speech_goes_negative() {
        // 500 samples at 0.05 (speech), 500 at 0.5 (noise)
        let mut samples = vec![0.05f32; 500];
        samples.extend(vec![0.5f32; 500]);
        let wave = Waveform::new(samples, 8000);

        let snr = estimate_snr(&wave, &stats(0.0025, 0.5));
        // 20 log10(0.05 / 0.5) = -20 dB
        assert!((snr - -20.0).abs() < 1e-3, "snr {}", snr);
    }
}
