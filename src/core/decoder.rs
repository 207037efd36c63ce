// src/core/decoder.rs
//
// Audio decoding via Symphonia. Produces interleaved samples and a
// mono down-mix for the speech analyses.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::waveform::Waveform;
use crate::error::{Result, SpeechCheckError};

/// Container for decoded audio data and metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: usize,
}

impl AudioData {
    /// Down-mix to a mono waveform
    pub fn to_waveform(&self) -> Waveform {
        Waveform::new(extract_mono(self), self.sample_rate)
    }
}

/// Decode audio file to floating-point samples
///
/// A file that decodes to zero samples is returned as-is; empty audio is a
/// valid (degenerate) input for every analysis.
pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = File::open(path).map_err(|e| SpeechCheckError::io(path, e))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| SpeechCheckError::decode(path, format!("unsupported format: {}", e)))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SpeechCheckError::decode(path, "no supported audio track"))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| SpeechCheckError::decode(path, "sample rate not specified"))?;

    let declared_channels = track.codec_params.channels.map(|c| c.count());
    let mut decoded_channels = None;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| SpeechCheckError::decode(path, e))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(SpeechCheckError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("{}: skipping corrupt packet ({})", path.display(), msg);
                continue;
            }
            Err(e) => return Err(SpeechCheckError::decode(path, e)),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            decoded_channels = Some(spec.channels.count());
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    let channels = resolve_channels(declared_channels, decoded_channels)
        .ok_or_else(|| SpeechCheckError::decode(path, "file reports 0 audio channels"))?;

    log::debug!(
        "Decoded {}: {} samples, {} Hz, {} channel(s)",
        path.display(),
        samples.len(),
        sample_rate,
        channels
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
    })
}

/// Channel count of the decoded stream. The first decoded buffer is
/// authoritative; container metadata is used only when nothing decoded.
fn resolve_channels(declared: Option<usize>, decoded: Option<usize>) -> Option<usize> {
    decoded.or(declared).or(Some(1)).filter(|&c| c > 0)
}

/// Decode a file straight to a mono waveform
pub fn load_waveform(path: &Path) -> Result<Waveform> {
    Ok(decode_audio(path)?.to_waveform())
}

/// Extract mono samples from potentially multi-channel audio
pub fn extract_mono(audio: &AudioData) -> Vec<f32> {
    if audio.channels == 1 {
        return audio.samples.clone();
    }

    audio
        .samples
        .chunks_exact(audio.channels)
        .map(|frame| frame.iter().sum::<f32>() / audio.channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(samples: Vec<f32>, channels: usize) -> AudioData {
        AudioData {
            samples,
            sample_rate: 16000,
            channels,
        }
    }

    #[test]
    fn test_extract_mono() {
        let mono = extract_mono(&audio(vec![0.5, -0.5, 0.3, -0.1], 2));
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.0).abs() < 0.001);
        assert!((mono[1] - 0.1).abs() < 0.001);
    }

    #[test]
    fn test_mono_passthrough() {
        let data = audio(vec![0.1, 0.2, 0.3], 1);
        let wave = data.to_waveform();
        assert_eq!(wave.samples(), &[0.1, 0.2, 0.3]);
        assert_eq!(wave.sample_rate(), 16000);
    }

    #[test]
    fn test_decoded_channel_count_wins() {
        // Stream without channel metadata that decodes as stereo
        assert_eq!(resolve_channels(None, Some(2)), Some(2));
        assert_eq!(resolve_channels(Some(1), Some(2)), Some(2));
        assert_eq!(resolve_channels(Some(2), None), Some(2));
        assert_eq!(resolve_channels(None, None), Some(1));
        assert_eq!(resolve_channels(Some(2), Some(0)), None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = decode_audio(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, SpeechCheckError::Io { .. }));
    }
}
