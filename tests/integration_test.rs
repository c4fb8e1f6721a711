//! Integration tests for speccube
//!
//! These tests verify the full pipeline from a bundle on disk to decoded
//! spectra and validation reports.

use speccube::cube::{locate_companion, CubeReader};
use speccube::header::{AcquisitionMetadata, Endianness, Interleave};
use speccube::library::LibrarySpectrum;
use speccube::spectrum::{SentinelFilter, USGS_NO_DATA};
use speccube::validator::validate_acquisition;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLES: usize = 8;
const LINES: usize = 4;
const BANDS: usize = 5;

fn test_metadata() -> AcquisitionMetadata {
    let mut camera_info = HashMap::new();
    camera_info.insert("ID".to_string(), "Baldur".to_string());
    camera_info.insert("Serialnumber".to_string(), "SN12013".to_string());

    AcquisitionMetadata {
        samples: SAMPLES,
        lines: LINES,
        bands: BANDS,
        data_type: 12,
        interleave: Interleave::Bil,
        byte_order: Endianness::Little,
        acquisition_date: Some("2025-03-24".to_string()),
        acquisition_start_time: Some("02:40:57".to_string()),
        wavelength_unit: Some("Nanometers".to_string()),
        wavelengths: Some((0..BANDS).map(|i| 400.0 + 10.0 * i as f64).collect()),
        camera_info,
    }
}

fn dn(line: usize, band: usize, sample: usize) -> u16 {
    (1000 + line * 100 + band * 10 + sample) as u16
}

/// Write a BIL little-endian bundle into `dir` and return the header path.
fn write_bundle(dir: &Path) -> std::path::PathBuf {
    let metadata = test_metadata();

    let header_path = dir.join("scan.hdr");
    fs::write(&header_path, metadata.to_header_text()).unwrap();

    let mut bytes = Vec::new();
    for line in 0..LINES {
        for band in 0..BANDS {
            for sample in 0..SAMPLES {
                bytes.extend_from_slice(&dn(line, band, sample).to_le_bytes());
            }
        }
    }
    fs::write(dir.join("scan.img"), bytes).unwrap();

    header_path
}

#[test]
fn test_write_then_read_bundle() {
    let dir = tempdir().unwrap();
    let header_path = write_bundle(dir.path());

    // The header round-trips through its own serialization
    let metadata = AcquisitionMetadata::from_file(&header_path).unwrap();
    assert_eq!(metadata, test_metadata());

    // The companion file is found by the header-stem search
    let data_path = locate_companion(&header_path).unwrap();
    assert_eq!(data_path, dir.path().join("scan.img"));

    // Every decoded value matches what was written
    let mut reader = CubeReader::open(&header_path).unwrap();
    assert_eq!(reader.frame_count(), LINES);
    for line in 0..LINES {
        let frame = reader.read_frame(line).unwrap();
        for band in 0..BANDS {
            for sample in 0..SAMPLES {
                assert_eq!(
                    frame.value(band, sample),
                    Some(dn(line, band, sample) as f64)
                );
            }
        }
    }
}

#[test]
fn test_spectrum_extraction_end_to_end() {
    let dir = tempdir().unwrap();
    let header_path = write_bundle(dir.path());

    let mut reader = CubeReader::open(&header_path).unwrap();
    let curve = reader.spectrum_at(2, 3).unwrap();

    let expected: Vec<f64> = (0..BANDS).map(|b| dn(2, b, 3) as f64).collect();
    assert_eq!(curve.values, expected);
    assert_eq!(
        curve.wavelengths,
        Some(vec![400.0, 410.0, 420.0, 430.0, 440.0])
    );

    // Normalization maps the monotone spectrum onto [0, 1]
    let normalized = curve.normalized();
    let stats = normalized.stats().unwrap();
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 1.0);

    // CSV export carries the wavelength axis
    let mut out = Vec::new();
    normalized.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("wavelength,value\n400,0\n"));
}

#[test]
fn test_band_statistics_end_to_end() {
    let dir = tempdir().unwrap();
    let header_path = write_bundle(dir.path());

    let mut reader = CubeReader::open(&header_path).unwrap();
    let stats = reader.band_stats().unwrap();
    assert_eq!(stats.len(), BANDS);

    // Band b holds 1000 + line*100 + b*10 + sample over all lines/samples
    for (band, s) in stats.iter().enumerate() {
        assert_eq!(s.min, (1000 + band * 10) as f64);
        assert_eq!(
            s.max,
            (1000 + (LINES - 1) * 100 + band * 10 + SAMPLES - 1) as f64
        );
        let expected_mean = 1000.0
            + (LINES - 1) as f64 * 100.0 / 2.0
            + (band * 10) as f64
            + (SAMPLES - 1) as f64 / 2.0;
        assert!((s.mean - expected_mean).abs() < 1e-9);
    }
}

#[test]
fn test_validation_end_to_end() {
    let dir = tempdir().unwrap();
    let header_path = write_bundle(dir.path());

    let report = validate_acquisition(&header_path, None).unwrap();
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
}

#[test]
fn test_validation_catches_truncation() {
    let dir = tempdir().unwrap();
    let header_path = write_bundle(dir.path());

    // Chop the tail off the cube, as an interrupted transfer would
    let data_path = dir.path().join("scan.img");
    let bytes = fs::read(&data_path).unwrap();
    fs::write(&data_path, &bytes[..bytes.len() - 10]).unwrap();

    let report = validate_acquisition(&header_path, None).unwrap();
    assert!(report.has_failures(), "{}", report);
}

#[test]
fn test_library_spectrum_against_cube() {
    let dir = tempdir().unwrap();

    let library_path = dir.path().join("reference.txt");
    let mut content = String::from("splib07a Actinolite HS22.1B ASDFRb AREF\n");
    for i in 0..BANDS {
        content.push_str(&format!("{}\n", 0.1 * i as f64));
    }
    content.push_str(&format!("{}\n", USGS_NO_DATA));
    fs::write(&library_path, content).unwrap();

    let reference =
        LibrarySpectrum::from_file(&library_path, &SentinelFilter::usgs()).unwrap();
    assert_eq!(reference.values.len(), BANDS);

    // Comparable band count against the cube's spectra
    let header_path = write_bundle(dir.path());
    let mut reader = CubeReader::open(&header_path).unwrap();
    let curve = reader.spectrum_at(0, 0).unwrap();
    assert_eq!(curve.len(), reference.curve().len());
}
