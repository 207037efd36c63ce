// src/core/waveform.rs
//
// Mono sample sequence plus its sample rate. Every analysis consumes this.

/// A mono waveform with samples nominally in [-1.0, 1.0]
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Sum of squared samples, accumulated in f64
    pub fn energy(&self) -> f64 {
        self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum()
    }

    /// Largest sample value (signed, not absolute); 0.0 when empty
    pub fn max_value(&self) -> f32 {
        self.samples
            .iter()
            .copied()
            .reduce(f32::max)
            .unwrap_or(0.0)
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
