// tests/test_utils/mod.rs
//
// Shared helpers for the integration tests: synthetic signals, WAV
// fixtures and a runner for the speechcheckr binary.

#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use hound::{SampleFormat, WavSpec, WavWriter};

pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_speechcheckr"))
}

pub fn run_speechcheckr<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(get_binary_path())
        .args(args)
        .env_remove("SPEECHCHECKR_CONFIG")
        .output()
        .expect("Failed to execute speechcheckr")
}

pub fn sine(freq: f32, amplitude: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * secs) as usize;
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Sample-wise sum of equally long signals
pub fn mix(signals: &[Vec<f32>]) -> Vec<f32> {
    let len = signals.iter().map(|s| s.len()).min().unwrap_or(0);
    (0..len).map(|i| signals.iter().map(|s| s[i]).sum()).collect()
}

/// Deterministic uniform noise in [-amplitude, amplitude]
pub fn noise(len: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            amplitude * (2.0 * unit - 1.0)
        })
        .collect()
}

/// Positive, slowly varying carrier with the given samples sign-flipped
pub fn with_reversals(len: usize, indices: &[usize]) -> Vec<f32> {
    let mut samples: Vec<f32> = (0..len)
        .map(|i| 0.4 + 0.1 * (i as f32 * 0.003).sin())
        .collect();
    for &i in indices {
        samples[i] = -samples[i];
    }
    samples
}

/// Write interleaved float samples as 16-bit PCM
pub fn write_wav16(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create wav");
    for &s in samples {
        let v = (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(v).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

pub fn read_wav_spec(path: &Path) -> WavSpec {
    hound::WavReader::open(path).expect("open wav").spec()
}
