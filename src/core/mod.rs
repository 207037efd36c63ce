//! Core analysis modules

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod dsp;
pub mod waveform;
pub mod writer;

pub use analyzer::{AnalyzerBuilder, SpeechAnalyzer};
pub use decoder::{decode_audio, load_waveform, AudioData};
pub use waveform::Waveform;
pub use writer::{restored_path, write_pcm24};
