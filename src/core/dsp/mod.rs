//! Digital signal processing utilities

pub mod filters;
pub mod resample;
pub mod stft;
pub mod windows;

pub use filters::{envelope, one_pole_lowpass};
pub use resample::resample;
pub use stft::{Spectrogram, Stft, FRAME_SIZE};
pub use windows::hann_periodic;
