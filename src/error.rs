//! Error types for speechcheckr
//!
//! Only failures the analyses cannot recover from locally live here:
//! unreadable input, unwritable output, and resampler setup failures.
//! Degenerate audio (empty, silent) never produces an error.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the library
#[derive(Debug, Error)]
pub enum SpeechCheckError {
    /// Filesystem failure on a specific path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could be opened but not decoded into samples
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// WAV encoding failure while persisting a repaired waveform
    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),

    /// Resampler construction or processing failure
    #[error("resampling failed: {0}")]
    Resample(String),

    /// Invalid analysis configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SpeechCheckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<rubato::ResamplerConstructionError> for SpeechCheckError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        Self::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for SpeechCheckError {
    fn from(e: rubato::ResampleError) -> Self {
        Self::Resample(e.to_string())
    }
}

/// Library result alias
pub type Result<T> = std::result::Result<T, SpeechCheckError>;
