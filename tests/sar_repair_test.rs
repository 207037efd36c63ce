// tests/sar_repair_test.rs
//
// Amplitude reversal counting and repair through decoded files.

mod test_utils;

use speechcheckr::core::{load_waveform, AnalyzerBuilder};
use speechcheckr::detect_sar;
use test_utils::*;

const RATE: u32 = 16000;

#[test]
fn test_counting_does_not_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("damaged.wav");
    write_wav16(&path, &with_reversals(16000, &[3000, 9000]), RATE, 1);

    let report = AnalyzerBuilder::new().build(&path).unwrap().analyze().unwrap();

    let sar = report.sar.expect("sar summary");
    assert_eq!(sar.count, 2);
    assert_eq!(sar.events, vec![3000, 9000]);
    assert!(sar.restored_file.is_none());
    assert!(!dir.path().join("damaged_SARrestored.wav").exists());
}

#[test]
fn test_repair_writes_restored_copy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("damaged.wav");
    let reversed = [3000, 9000, 11000];
    write_wav16(&path, &with_reversals(16000, &reversed), RATE, 1);

    let report = AnalyzerBuilder::new()
        .repair_sar(true)
        .build(&path)
        .unwrap()
        .analyze()
        .unwrap();

    let restored = dir.path().join("damaged_SARrestored.wav");
    assert_eq!(report.sar.as_ref().map(|s| s.count), Some(3));
    assert_eq!(report.restored_file(), Some(restored.display().to_string().as_str()));

    let spec = read_wav_spec(&restored);
    assert_eq!(spec.bits_per_sample, 24);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, RATE);

    // The restored copy is clean and matches the undamaged carrier
    let repaired = load_waveform(&restored).unwrap();
    assert_eq!(detect_sar(&repaired).count, 0);
    let carrier = with_reversals(16000, &[]);
    assert_eq!(repaired.len(), carrier.len());
    for (i, (&a, &b)) in repaired.samples().iter().zip(&carrier).enumerate() {
        assert!((a - b).abs() < 1e-3, "sample {}: {} vs {}", i, a, b);
    }

    // The original file is left as it was
    let original = load_waveform(&path).unwrap();
    assert_eq!(detect_sar(&original).count, 3);

    // 16-bit source samples survive the 24-bit rewrite bit for bit
    for (i, (&r, &o)) in repaired.samples().iter().zip(original.samples()).enumerate() {
        let expected = if reversed.contains(&i) { -o } else { o };
        assert_eq!(r, expected, "sample {}", i);
    }
}

#[test]
fn test_repair_of_clean_file_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clean.wav");
    write_wav16(&path, &with_reversals(8000, &[]), RATE, 1);

    let report = AnalyzerBuilder::new()
        .repair_sar(true)
        .build(&path)
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(report.sar.as_ref().map(|s| s.count), Some(0));
    assert!(report.restored_file().is_none());
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_custom_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.wav");
    write_wav16(&path, &with_reversals(4000, &[1000]), RATE, 1);

    let mut config = speechcheckr::AnalysisConfig::default();
    config.repair_sar = true;
    config.restored_suffix = "_fixed".to_string();
    AnalyzerBuilder::new()
        .config(config)
        .build(&path)
        .unwrap()
        .analyze()
        .unwrap();

    assert!(dir.path().join("take_fixed.wav").exists());
}
