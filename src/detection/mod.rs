//! Report types for speechcheckr

mod result;

pub use result::{BandwidthSummary, FileReport, SarSummary, SpeechSummary, CSV_HEADER};
