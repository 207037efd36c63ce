//! Recursive smoothing filters

/// One-pole lowpass `y[n] = (1 - g) * x[n] + g * y[n - 1]`, zero initial state
pub fn one_pole_lowpass(samples: &[f64], g: f64) -> Vec<f64> {
    let mut state = 0.0;
    samples
        .iter()
        .map(|&x| {
            state = (1.0 - g) * x + g * state;
            state
        })
        .collect()
}

/// Envelope of a signal: rectified, then smoothed by two cascaded one-pole stages
pub fn envelope(samples: &[f32], g: f64) -> Vec<f64> {
    let rectified: Vec<f64> = samples.iter().map(|&s| (s as f64).abs()).collect();
    let first = one_pole_lowpass(&rectified, g);
    one_pole_lowpass(&first, g)
}
