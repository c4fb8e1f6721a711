//! # speccube CLI
//!
//! A command-line tool for inspecting hyperspectral acquisition bundles:
//! a raw binary cube plus its sidecar text header.
//!
//! ## Usage
//!
//! ```bash
//! # Show parsed header metadata
//! speccube info scan.hdr
//!
//! # Validate a bundle
//! speccube validate scan.hdr
//!
//! # Extract the spectrum of one pixel as CSV
//! speccube spectrum scan.hdr --frame 512 --sample 192 -o pixel.csv
//!
//! # Per-band statistics over the whole cube
//! speccube stats scan.hdr
//!
//! # Write a small synthetic bundle for testing
//! speccube demo /tmp/demo
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use speccube::cube::{locate_companion, CubeReader};
use speccube::datatype::DataType;
use speccube::header::{AcquisitionMetadata, Endianness, Interleave};
use speccube::spectrum::SentinelFilter;
use speccube::validator::validate_acquisition;

mod config;
use config::Config;

/// speccube - Hyperspectral Acquisition Inspector
#[derive(Parser)]
#[command(name = "speccube")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Optional TOML config file with command defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display parsed header metadata
    Info {
        /// Sidecar header file path
        #[arg(value_name = "HEADER")]
        header: PathBuf,

        /// Emit the record as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate bundle integrity (header plus companion data file)
    Validate {
        /// Sidecar header file path
        #[arg(value_name = "HEADER")]
        header: PathBuf,

        /// Companion data file (located next to the header by default)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },

    /// Extract the spectral curve of one pixel
    Spectrum {
        /// Sidecar header file path
        #[arg(value_name = "HEADER")]
        header: PathBuf,

        /// Frame (line) index
        #[arg(short, long)]
        frame: usize,

        /// Spatial position within the frame
        #[arg(short, long)]
        sample: usize,

        /// Companion data file (located next to the header by default)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Min-max normalize the curve
        #[arg(long)]
        normalize: bool,

        /// Drop samples equal to this no-data marker
        #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
        drop_sentinel: Option<f64>,

        /// Output CSV path (stdout when omitted)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Per-band statistics over the whole cube
    Stats {
        /// Sidecar header file path
        #[arg(value_name = "HEADER")]
        header: PathBuf,

        /// Companion data file (located next to the header by default)
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Restrict to a single band
        #[arg(short, long)]
        band: Option<usize>,
    },

    /// Write a small synthetic bundle for testing the toolchain
    Demo {
        /// Output directory
        #[arg(value_name = "DIR", default_value = "speccube-demo")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Info { header, json } => run_info(header, json),
        Commands::Validate { header, data } => run_validate(header, data),
        Commands::Spectrum {
            header,
            frame,
            sample,
            data,
            normalize,
            drop_sentinel,
            output,
        } => run_spectrum(
            header,
            frame,
            sample,
            data,
            normalize || config.spectrum.normalize.unwrap_or(false),
            drop_sentinel.or(config.spectrum.drop_sentinel),
            output,
        ),
        Commands::Stats { header, data, band } => run_stats(header, data, band),
        Commands::Demo { dir } => run_demo(dir),
    }
}

/// Display parsed header metadata
fn run_info(header: PathBuf, json: bool) -> Result<()> {
    let metadata = AcquisitionMetadata::from_file(&header)
        .with_context(|| format!("Failed to parse header {}", header.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("Acquisition Header Information");
    println!("==============================");
    println!("File: {}", header.display());
    println!();

    println!("Shape:");
    println!("  Samples: {}", metadata.samples);
    println!("  Lines:   {}", metadata.lines);
    println!("  Bands:   {}", metadata.bands);
    println!();

    println!("Encoding:");
    match DataType::from_tag(metadata.data_type) {
        Some(data_type) => println!("  Data type:  {}", data_type),
        None => println!("  Data type:  unsupported tag {}", metadata.data_type),
    }
    println!("  Interleave: {}", metadata.interleave);
    let byte_order = match metadata.byte_order {
        Endianness::Little => "little-endian (0)",
        Endianness::Big => "big-endian (1)",
    };
    println!("  Byte order: {}", byte_order);
    println!();

    if metadata.acquisition_date.is_some() || metadata.acquisition_start_time.is_some() {
        println!("Acquisition:");
        if let Some(ref date) = metadata.acquisition_date {
            println!("  Date:       {}", date);
        }
        if let Some(ref time) = metadata.acquisition_start_time {
            println!("  Start time: {}", time);
        }
        if let Some(dt) = metadata.acquisition_datetime() {
            println!("  Timestamp:  {}", dt);
        }
        println!();
    }

    match metadata.wavelengths {
        Some(ref wavelengths) => {
            let unit = metadata.wavelength_unit.as_deref().unwrap_or("(no unit)");
            // Parse guarantees a non-empty table when present.
            let first = wavelengths.first().copied().unwrap_or(f64::NAN);
            let last = wavelengths.last().copied().unwrap_or(f64::NAN);
            println!(
                "Wavelengths: {} entries, {} to {} {}",
                wavelengths.len(),
                first,
                last,
                unit
            );
        }
        None => println!("Wavelengths: absent"),
    }
    println!();

    if metadata.camera_info.is_empty() {
        println!("Camera info: absent");
    } else {
        println!("Camera info:");
        let mut keys: Vec<&String> = metadata.camera_info.keys().collect();
        keys.sort();
        for key in keys {
            println!("  {}: {}", key, metadata.camera_info[key]);
        }
    }

    Ok(())
}

/// Validate bundle integrity
fn run_validate(header: PathBuf, data: Option<PathBuf>) -> Result<()> {
    info!("speccube Validator");
    info!("==================");
    info!("Header: {}", header.display());

    match validate_acquisition(&header, data.as_deref()) {
        Ok(report) => {
            #[cfg(feature = "colorized_output")]
            {
                println!("{}", report.format_colored());
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                println!("{}", report);
            }

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Extract and export one pixel's spectral curve
fn run_spectrum(
    header: PathBuf,
    frame: usize,
    sample: usize,
    data: Option<PathBuf>,
    normalize: bool,
    drop_sentinel: Option<f64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut reader = open_reader(&header, data)?;

    let mut curve = reader
        .spectrum_at(frame, sample)
        .with_context(|| format!("Failed to read frame {} sample {}", frame, sample))?;

    if let Some(sentinel) = drop_sentinel {
        let filter = SentinelFilter::new(sentinel);
        let before = curve.len();
        curve = curve.retained(&filter);
        info!("Sentinel filter dropped {} of {} samples", before - curve.len(), before);
    }

    if normalize {
        curve = curve.normalized();
    }

    if let Some(stats) = curve.stats() {
        info!(
            "Curve: {} bands, range [{:.4}, {:.4}], mean {:.4}",
            stats.count, stats.min, stats.max, stats.mean
        );
    }

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            curve.write_csv(file)?;
            info!("Wrote {}", path.display());
        }
        None => {
            curve.write_csv(std::io::stdout().lock())?;
        }
    }

    Ok(())
}

/// Per-band statistics over the whole cube
fn run_stats(header: PathBuf, data: Option<PathBuf>, band: Option<usize>) -> Result<()> {
    let mut reader = open_reader(&header, data)?;

    if let Some(band) = band {
        let slice = reader
            .read_band_slice(band)
            .with_context(|| format!("Failed to read band {}", band))?;
        println!("Band {} Statistics", band);
        println!("==================");
        println!("Lines:   {}", slice.lines());
        println!("Samples: {}", slice.samples());
        if let Some(stats) = slice.stats() {
            println!("Min:     {:.4}", stats.min);
            println!("Max:     {:.4}", stats.max);
            println!("Mean:    {:.4}", stats.mean);
            println!("Std dev: {:.4}", stats.std_dev);
        }
        return Ok(());
    }

    let wavelengths = reader.metadata().wavelengths.clone();
    let stats = reader.band_stats().context("Failed to compute band statistics")?;

    println!("Per-Band Statistics");
    println!("===================");
    match wavelengths {
        Some(ref wavelengths) => {
            println!(
                "{:>5} {:>12} {:>12} {:>12} {:>12} {:>12}",
                "band", "wavelength", "min", "max", "mean", "std"
            );
            for s in &stats {
                println!(
                    "{:>5} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
                    s.band, wavelengths[s.band], s.min, s.max, s.mean, s.std_dev
                );
            }
        }
        None => {
            println!(
                "{:>5} {:>12} {:>12} {:>12} {:>12}",
                "band", "min", "max", "mean", "std"
            );
            for s in &stats {
                println!(
                    "{:>5} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
                    s.band, s.min, s.max, s.mean, s.std_dev
                );
            }
        }
    }

    Ok(())
}

/// Write a small synthetic bundle for testing
fn run_demo(dir: PathBuf) -> Result<()> {
    const SAMPLES: usize = 64;
    const LINES: usize = 32;
    const BANDS: usize = 16;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let metadata = build_demo_metadata(SAMPLES, LINES, BANDS);

    let header_path = dir.join("demo.hdr");
    std::fs::write(&header_path, metadata.to_header_text())
        .with_context(|| format!("Failed to write {}", header_path.display()))?;

    let data_path = dir.join("demo.img");
    let mut file = File::create(&data_path)
        .with_context(|| format!("Failed to create {}", data_path.display()))?;
    for line in 0..LINES {
        for band in 0..BANDS {
            for sample in 0..SAMPLES {
                let dn = demo_dn(line, band, sample, BANDS);
                file.write_all(&dn.to_le_bytes())?;
            }
        }
    }

    info!("Demo bundle written");
    info!("  Header: {}", header_path.display());
    info!("  Data:   {}", data_path.display());

    println!("Wrote demo bundle to {}", dir.display());
    println!("Try:");
    println!("  speccube info {}", header_path.display());
    println!("  speccube validate {}", header_path.display());
    println!(
        "  speccube spectrum {} --frame {} --sample {}",
        header_path.display(),
        LINES / 2,
        SAMPLES / 2
    );

    Ok(())
}

/// Metadata for the synthetic demo bundle
fn build_demo_metadata(samples: usize, lines: usize, bands: usize) -> AcquisitionMetadata {
    let mut camera_info = std::collections::HashMap::new();
    camera_info.insert("ID".to_string(), "Baldur".to_string());
    camera_info.insert("Serialnumber".to_string(), "SN12013".to_string());
    camera_info.insert("Integration time".to_string(), "254".to_string());
    camera_info.insert("Lens".to_string(), "30cm".to_string());

    AcquisitionMetadata {
        samples,
        lines,
        bands,
        data_type: 12,
        interleave: Interleave::Bil,
        byte_order: Endianness::Little,
        acquisition_date: Some("2025-03-24".to_string()),
        acquisition_start_time: Some("02:40:57".to_string()),
        wavelength_unit: Some("Nanometers".to_string()),
        wavelengths: Some((0..bands).map(|i| 400.0 + 20.0 * i as f64).collect()),
        camera_info,
    }
}

/// Synthetic digital number with a broad spectral peak plus mild spatial
/// and temporal texture
fn demo_dn(line: usize, band: usize, sample: usize, bands: usize) -> u16 {
    let spectral = (std::f64::consts::PI * band as f64 / bands as f64).sin();
    let spatial = (sample as f64 * 0.37).sin();
    let temporal = (line as f64 * 0.11).cos();
    let dn = 512.0 + 400.0 * spectral + 50.0 * spatial + 20.0 * temporal;
    dn as u16
}

/// Open a cube reader from a header path and optional explicit data file
fn open_reader(header: &Path, data: Option<PathBuf>) -> Result<CubeReader> {
    let reader = match data {
        Some(data) => CubeReader::open_with_data(header, &data)
            .with_context(|| format!("Failed to open cube {}", data.display()))?,
        None => {
            if let Some(found) = locate_companion(header) {
                info!("Using companion data file {}", found.display());
            }
            CubeReader::open(header)
                .with_context(|| format!("Failed to open bundle for {}", header.display()))?
        }
    };
    Ok(reader)
}
