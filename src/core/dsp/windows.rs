//! Window function implementations

use std::f32::consts::PI;

/// Periodic Hann window (the DFT-even variant used for STFT analysis)
pub fn hann_periodic(size: usize) -> Vec<f32> {
    let n = size as f32;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / n).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let window = hann_periodic(4);
        assert!((window[0]).abs() < 0.01); // ~0 at the leading edge
        assert!((window[2] - 1.0).abs() < 0.01); // ~1 at center
        assert!((window[1] - window[3]).abs() < 1e-6);
    }

    #[test]
    fn test_hann_sum() {
        let window = hann_periodic(1024);
        let sum: f32 = window.iter().sum();
        assert!((sum - 512.0).abs() < 1e-2);
    }
}
