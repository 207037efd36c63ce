// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use speechcheckr::cli::{self, Args, OutputFormat};
use speechcheckr::config::AnalysisConfig;
use speechcheckr::core::AnalyzerBuilder;
use speechcheckr::detection::FileReport;

const AUDIO_EXTENSIONS: [&str; 7] = ["wav", "flac", "mp3", "ogg", "m4a", "aac", "aiff"];

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate().context("invalid settings")?;

    if !config.has_work() {
        eprintln!("{}", "Nothing to analyze: every analysis is disabled".yellow());
        return Ok(());
    }

    let audio_files = collect_audio_files(&args.inputs, &config.restored_suffix);

    if audio_files.is_empty() {
        eprintln!("{}", "No audio files found!".red());
        return Ok(());
    }

    log::info!("Found {} audio file(s)", audio_files.len());

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool.build().context("building worker pool")?;

    let progress = progress_bar(audio_files.len() as u64, args.format);

    let outcomes: Vec<Result<FileReport>> = pool.install(|| {
        audio_files
            .par_iter()
            .progress_with(progress.clone())
            .map(|path| process_file(path, &config))
            .collect()
    });
    progress.finish_and_clear();

    let mut reports = Vec::with_capacity(outcomes.len());
    let mut failed = 0;
    for (path, outcome) in audio_files.iter().zip(outcomes) {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                failed += 1;
                log::warn!("skipping {}: {:#}", path.display(), e);
                eprintln!("{} {}: {:#}", "✗".red(), path.display(), e);
            }
        }
    }

    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", cli::format_text(report, args.verbose));
            }
            if audio_files.len() > 1 {
                print!("{}", cli::format_summary(&reports, failed));
            }
        }
        OutputFormat::Json => println!("{}", cli::format_json(&reports)?),
        OutputFormat::Csv => {
            println!("{}", cli::csv_header());
            for report in &reports {
                println!("{}", cli::format_csv_row(report));
            }
        }
    }

    Ok(())
}

fn process_file(path: &Path, config: &AnalysisConfig) -> Result<FileReport> {
    let analyzer = AnalyzerBuilder::new()
        .config(config.clone())
        .build(path)
        .with_context(|| format!("decoding {}", path.display()))?;
    let report = analyzer
        .analyze()
        .with_context(|| format!("analyzing {}", path.display()))?;
    Ok(report)
}

fn progress_bar(len: u64, format: OutputFormat) -> ProgressBar {
    if format != OutputFormat::Text || len < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {elapsed}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Restored copies from an earlier `--repair` run are not re-analyzed
fn is_restored_copy(path: &Path, suffix: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(suffix))
        .unwrap_or(false)
}

fn collect_audio_files(inputs: &[PathBuf], restored_suffix: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if entry.file_type().is_file()
                    && is_audio_file(path)
                    && !is_restored_copy(path, restored_suffix)
                {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            eprintln!("{} {}: no such file or directory", "✗".red(), input.display());
        }
    }

    files
}
