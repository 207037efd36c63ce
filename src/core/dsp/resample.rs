//! Offline whole-buffer resampling

use rubato::{FftFixedIn, Resampler};

use crate::error::Result;

/// Input chunk size fed to the FFT resampler
const CHUNK_FRAMES: usize = 1024;

/// Resample a mono buffer from `from_rate` to `to_rate`
///
/// The resampler's group delay is trimmed so output sample `i` lines up
/// with input time `i / to_rate`, and the output length is
/// `ceil(len * to_rate / from_rate)`.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_FRAMES, 2, 1)?;

    let delay = resampler.output_delay();
    let expected =
        (samples.len() as f64 * to_rate as f64 / from_rate as f64).ceil() as usize;

    log::debug!(
        "Resampling {} samples: {} Hz -> {} Hz (delay {} frames)",
        samples.len(),
        from_rate,
        to_rate,
        delay
    );

    let mut output = Vec::with_capacity(expected + delay + CHUNK_FRAMES);
    let mut pos = 0;

    while samples.len() - pos >= resampler.input_frames_next() {
        let n = resampler.input_frames_next();
        let input: [&[f32]; 1] = [&samples[pos..pos + n]];
        let chunk = resampler.process(&input[..], None)?;
        output.extend_from_slice(&chunk[0]);
        pos += n;
    }

    if pos < samples.len() {
        let tail: [&[f32]; 1] = [&samples[pos..]];
        let chunk = resampler.process_partial(Some(&tail[..]), None)?;
        output.extend_from_slice(&chunk[0]);
    }

    // Flush the filter tail until the delayed signal is fully out
    while output.len() < expected + delay {
        let chunk = resampler.process_partial(None::<&[&[f32]]>, None)?;
        if chunk[0].is_empty() {
            break;
        }
        output.extend_from_slice(&chunk[0]);
    }

    output.drain(..delay.min(output.len()));
    output.resize(expected, 0.0);
    Ok(output)
}
