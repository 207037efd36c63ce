//! Configuration module for speechcheckr

mod settings;

pub use settings::AnalysisConfig;
