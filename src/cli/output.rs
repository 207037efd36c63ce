//! Output formatting for CLI results

use colorful::Colorful;

use crate::core::analysis::BandwidthLabel;
use crate::detection::{FileReport, CSV_HEADER};

/// Format one report for terminal output
pub fn format_text(report: &FileReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", report.file.as_str().cyan().bold()));
    output.push_str(&format!(
        "  Sample Rate: {} Hz | Duration: {:.2}s\n",
        report.sample_rate, report.duration_secs
    ));

    if let Some(sar) = &report.sar {
        let count = if sar.count == 0 {
            "0".green().to_string()
        } else {
            sar.count.to_string().as_str().red().to_string()
        };
        output.push_str(&format!("  Amplitude reversals: {}\n", count));
        if let Some(restored) = &sar.restored_file {
            output.push_str(&format!("    Restored copy: {}\n", restored));
        }
        if verbose && !sar.events.is_empty() {
            let shown: Vec<String> = sar.events.iter().take(20).map(|e| e.to_string()).collect();
            let more = sar.events.len().saturating_sub(shown.len());
            output.push_str(&format!(
                "    At samples: {}{}\n",
                shown.join(", "),
                if more > 0 { format!(" (+{} more)", more) } else { String::new() }
            ));
        }
    }

    if let Some(speech) = &report.speech {
        output.push_str(&format!(
            "  Active speech level: {:.2} dB | Activity: {:.1}% | SNR: {:.1} dB\n",
            speech.asl_db,
            speech.activity_factor * 100.0,
            speech.snr_db
        ));
    }

    if !report.bandwidth.is_empty() {
        let labels: Vec<String> = report
            .bandwidth
            .entries()
            .map(|(method, label)| format!("{} {}", method.name(), paint_label(label)))
            .collect();
        output.push_str(&format!("  Bandwidth: {}\n", labels.join(" | ")));
    }

    if verbose {
        let extent = &report.spectral_extent;
        output.push_str(&format!(
            "  Spectral extent: {:.0} Hz (bin energy max {:.2}, min {:.2})\n",
            extent.top_frequency_hz, extent.max_bin_energy, extent.min_bin_energy
        ));
    }

    output
}

fn paint_label(label: BandwidthLabel) -> String {
    match label {
        BandwidthLabel::Empty => label.as_str().dim().to_string(),
        BandwidthLabel::Nb => label.as_str().yellow().to_string(),
        _ => label.as_str().green().to_string(),
    }
}

/// Format all reports as a JSON array
pub fn format_json(reports: &[FileReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

pub fn csv_header() -> String {
    CSV_HEADER.join(",")
}

pub fn format_csv_row(report: &FileReport) -> String {
    report
        .csv_fields()
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format a summary for multiple files
pub fn format_summary(reports: &[FileReport], failed: usize) -> String {
    let mut output = String::new();

    let with_sar = reports
        .iter()
        .filter(|r| r.sar.as_ref().is_some_and(|s| s.count > 0))
        .count();
    let restored = reports.iter().filter(|r| r.restored_file().is_some()).count();

    output.push_str(&format!("\n{}\n", "Summary:".bold()));
    output.push_str(&format!("  {} files analyzed\n", reports.len()));
    if with_sar > 0 {
        output.push_str(&format!(
            "  {}\n",
            format!("{} with amplitude reversals", with_sar).as_str().yellow()
        ));
    }
    if restored > 0 {
        output.push_str(&format!("  {} restored copies written\n", restored));
    }
    if failed > 0 {
        output.push_str(&format!(
            "  {}\n",
            format!("{} failed", failed).as_str().red()
        ));
    }

    output
}
