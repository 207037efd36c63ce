//! Short-time Fourier transform with centred frames

use rustfft::FftPlanner;
use num_complex::Complex;

use super::windows::hann_periodic;

/// Analysis frame length shared by every bandwidth strategy
pub const FRAME_SIZE: usize = 1024;

/// Floor applied before taking logarithms of power values
const AMIN: f64 = 1e-10;

/// Dynamic range kept below the loudest cell of a dB spectrogram
const TOP_DB: f64 = 80.0;

/// Magnitude spectrogram, one row per frame, `frame_size / 2 + 1` bins per row
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub frames: Vec<Vec<f32>>,
    pub frame_size: usize,
    pub sample_rate: u32,
}

impl Spectrogram {
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Centre frequency of each bin in Hz
    pub fn bin_frequencies(&self) -> Vec<f64> {
        let resolution = self.sample_rate as f64 / self.frame_size as f64;
        (0..self.num_bins()).map(|k| k as f64 * resolution).collect()
    }

    /// Magnitude summed across time, per bin
    pub fn bin_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0f64; self.num_bins()];
        for frame in &self.frames {
            for (acc, &m) in sums.iter_mut().zip(frame.iter()) {
                *acc += m as f64;
            }
        }
        sums
    }

    /// Power in dB averaged across time, per bin
    ///
    /// Power is `magnitude^2`, floored at 1e-10 before the logarithm, and
    /// every cell is clipped to at most 80 dB below the loudest cell of the
    /// whole spectrogram.
    pub fn mean_power_db(&self) -> Vec<f64> {
        let num_bins = self.num_bins();
        if self.frames.is_empty() {
            return vec![10.0 * AMIN.log10(); num_bins];
        }

        let to_db = |m: f32| 10.0 * ((m as f64) * (m as f64)).max(AMIN).log10();
        let peak_db = self
            .frames
            .iter()
            .flat_map(|f| f.iter())
            .map(|&m| to_db(m))
            .fold(f64::NEG_INFINITY, f64::max);
        let floor_db = peak_db - TOP_DB;

        let mut avg = vec![0.0f64; num_bins];
        for frame in &self.frames {
            for (acc, &m) in avg.iter_mut().zip(frame.iter()) {
                *acc += to_db(m).max(floor_db);
            }
        }
        let n = self.frames.len() as f64;
        avg.iter_mut().for_each(|v| *v /= n);
        avg
    }
}

/// STFT processor: periodic Hann window, hop of a quarter frame, and
/// half a frame of zero padding on each side so frame `t` is centred on
/// sample `t * hop`.
pub struct Stft {
    planner: FftPlanner<f32>,
    window: Vec<f32>,
    frame_size: usize,
    hop_size: usize,
}

impl Stft {
    pub fn new(frame_size: usize) -> Self {
        Self {
            planner: FftPlanner::new(),
            window: hann_periodic(frame_size),
            frame_size,
            hop_size: frame_size / 4,
        }
    }

    /// Compute the magnitude spectrogram of `samples`
    pub fn magnitude(&mut self, samples: &[f32], sample_rate: u32) -> Spectrogram {
        let pad = self.frame_size / 2;
        let mut padded = vec![0.0f32; samples.len() + 2 * pad];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let num_frames = 1 + (padded.len() - self.frame_size) / self.hop_size;
        let num_bins = self.frame_size / 2 + 1;
        let fft = self.planner.plan_fft_forward(self.frame_size);

        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.frame_size];
        let mut frames = Vec::with_capacity(num_frames);

        for t in 0..num_frames {
            let start = t * self.hop_size;
            let frame = &padded[start..start + self.frame_size];
            for ((slot, &s), &w) in buffer.iter_mut().zip(frame).zip(&self.window) {
                *slot = Complex::new(s * w, 0.0);
            }

            fft.process(&mut buffer);

            frames.push(buffer[..num_bins].iter().map(|c| c.norm()).collect());
        }

        Spectrogram {
            frames,
            frame_size: self.frame_size,
            sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_frame_count_and_bins() {
        let mut stft = Stft::new(FRAME_SIZE);
        let spec = stft.magnitude(&vec![0.0; 16000], 16000);
        assert_eq!(spec.num_frames(), 1 + 16000 / 256);
        assert_eq!(spec.num_bins(), 513);
        assert!((spec.bin_frequencies()[512] - 8000.0).abs() < 1e-9);
    }

    #[test]
    fn test_sine_peaks_at_expected_bin() {
        // 1000 Hz at 16 kHz lands exactly on bin 64
        let samples: Vec<f32> = (0..16000)
            .map(|i| 0.5 * (2.0 * PI * 1000.0 * i as f32 / 16000.0).sin())
            .collect();
        let mut stft = Stft::new(FRAME_SIZE);
        let spec = stft.magnitude(&samples, 16000);

        let sums = spec.bin_sums();
        let peak = sums
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 64);

        // Steady-state frame: amplitude * window_sum / 2
        let mid = &spec.frames[spec.num_frames() / 2];
        assert!((mid[64] - 128.0).abs() < 1.0, "got {}", mid[64]);
    }

    #[test]
    fn test_silence_power_db_is_floor() {
        let mut stft = Stft::new(FRAME_SIZE);
        let spec = stft.magnitude(&vec![0.0; 4096], 48000);
        let db = spec.mean_power_db();
        assert!(db.iter().all(|&v| (v + 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_empty_input_yields_one_frame() {
        let mut stft = Stft::new(FRAME_SIZE);
        let spec = stft.magnitude(&[], 8000);
        assert_eq!(spec.num_frames(), 1);
        assert!(spec.bin_sums().iter().all(|&v| v == 0.0));
    }
}
