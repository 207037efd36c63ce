// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{Args, BandwidthChoice, OutputFormat};
pub use output::{csv_header, format_csv_row, format_json, format_summary, format_text};
