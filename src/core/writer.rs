// src/core/writer.rs
//
// 24-bit PCM WAV persistence for repaired waveforms. Output goes to a
// sibling temporary file first and is renamed into place, so the original
// recording is never opened for writing.

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

use super::waveform::Waveform;
use crate::error::{Result, SpeechCheckError};

/// 2^23, the same full scale decoders divide by
const PCM24_SCALE: f32 = 8_388_608.0;
const PCM24_MAX: f32 = 8_388_607.0;
const PCM24_MIN: f32 = -8_388_608.0;

/// Path of the restored copy: `<dir>/<stem><suffix>.wav`
pub fn restored_path(original: &Path, suffix: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    original.with_file_name(format!("{}{}.wav", stem, suffix))
}

/// Convert a float sample to a signed 24-bit integer
pub fn to_pcm24(sample: f32) -> i32 {
    (sample * PCM24_SCALE).round().clamp(PCM24_MIN, PCM24_MAX) as i32
}

/// Write `waveform` as mono 24-bit PCM, replacing `path` atomically
pub fn write_pcm24(path: &Path, waveform: &Waveform) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 24,
        sample_format: SampleFormat::Int,
    };

    let tmp_path = path.with_extension("wav.part");
    let written = write_samples(&tmp_path, spec, waveform.samples());
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SpeechCheckError::io(path, e)
    })
}

fn write_samples(path: &Path, spec: WavSpec, samples: &[f32]) -> Result<()> {
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(to_pcm24(sample))?;
    }
    writer.finalize()?;
    Ok(())
}
