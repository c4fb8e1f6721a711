//! # Acquisition Bundle Validation
//!
//! Deep integrity validation for an acquisition bundle: the sidecar
//! header plus its companion raw cube. Catches the classic field
//! failures (truncated transfers, edited headers that no longer match
//! the data, calibration tables of the wrong length) before a cube
//! enters a processing pipeline.
//!
//! ## Validation Checklist
//!
//! 1. **Structure**: header file exists, companion data file located
//! 2. **Header integrity**: header parses, core shape fields sane
//! 3. **Wavelength calibration**: table length, monotonicity, unit
//! 4. **Data contract**: element encoding known, file size matches the
//!    declared shape
//! 5. **Data sanity**: the first frame decodes and is not uniform
//!
//! ## Usage
//!
//! ```rust,no_run
//! use speccube::validator::validate_acquisition;
//! use std::path::Path;
//!
//! let report = validate_acquisition(Path::new("scan.hdr"), None)?;
//! println!("{}", report);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fmt;
use std::path::Path;

use anyhow::Result;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::cube::{locate_companion, CubeError, CubeReader, CubeReaderConfig};
use crate::datatype::DataType;
use crate::header::AcquisitionMetadata;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The bundle structure is broken badly enough that no further
    /// checks can run
    #[error("structure error: {0}")]
    StructureError(String),
}

/// Validation check result
#[derive(Debug, Clone)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed with a caveat
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }
}

/// Individual validation check
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// Name of the validation check
    pub name: String,
    /// Result status of the check
    pub status: CheckStatus,
}

impl ValidationCheck {
    fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Complete validation report for an acquisition bundle
#[derive(Debug)]
pub struct ValidationReport {
    /// Individual validation check results
    pub checks: Vec<ValidationCheck>,
    /// Path of the header that was validated
    pub header_path: String,
}

impl ValidationReport {
    /// Create an empty report for the given header path
    pub fn new(header_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            header_path: header_path.into(),
        }
    }

    /// Append a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Whether any check produced a warning
    pub fn has_warnings(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(c.status, CheckStatus::Warning(_)))
    }

    /// Number of successful checks
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c.status, CheckStatus::Warning(_)))
            .count()
    }

    /// Number of failures
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Format the report with colors (requires the `colorized_output`
    /// feature; falls back to the plain rendering without it)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!(
                "{}\n",
                style("Acquisition Validation Report").bold().cyan()
            ));
            output.push_str(&format!(
                "{}\n",
                style("=============================").cyan()
            ));
            output.push_str(&format!("Header: {}\n\n", self.header_path));

            for check in &self.checks {
                match &check.status {
                    CheckStatus::Ok => {
                        output.push_str(&format!("[{}] {}\n", style(OK).green(), check.name));
                    }
                    CheckStatus::Warning(msg) => {
                        output.push_str(&format!(
                            "[{}] {} - {}\n",
                            style(WARN).yellow(),
                            check.name,
                            style(msg).yellow()
                        ));
                    }
                    CheckStatus::Failed(msg) => {
                        output.push_str(&format!(
                            "[{}] {} - {}\n",
                            style(FAIL).red(),
                            check.name,
                            style(msg).red()
                        ));
                    }
                }
            }

            output.push_str(&format!(
                "\nSummary: {} passed, {} warnings, {} failed\n",
                self.success_count(),
                self.warning_count(),
                self.failure_count()
            ));

            if self.has_failures() {
                output.push_str(&format!("\n{}\n", style("Validation FAILED").bold().red()));
            } else if self.has_warnings() {
                output.push_str(&format!(
                    "\n{}\n",
                    style("Validation PASSED with warnings").bold().yellow()
                ));
            } else {
                output.push_str(&format!(
                    "\n{}\n",
                    style("Validation PASSED").bold().green()
                ));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Acquisition Validation Report")?;
        writeln!(f, "=============================")?;
        writeln!(f, "Header: {}", self.header_path)?;
        writeln!(f)?;

        for check in &self.checks {
            let symbol = match &check.status {
                CheckStatus::Ok => "✓",
                CheckStatus::Warning(_) => "⚠",
                CheckStatus::Failed(_) => "✗",
            };

            write!(f, "[{}] {}", symbol, check.name)?;

            match &check.status {
                CheckStatus::Ok => writeln!(f)?,
                CheckStatus::Warning(msg) => writeln!(f, " - WARNING: {}", msg)?,
                CheckStatus::Failed(msg) => writeln!(f, " - FAILED: {}", msg)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;

        if self.has_failures() {
            writeln!(f)?;
            writeln!(f, "Validation FAILED")?;
        } else if self.has_warnings() {
            writeln!(f)?;
            writeln!(f, "Validation PASSED with warnings")?;
        } else {
            writeln!(f)?;
            writeln!(f, "Validation PASSED")?;
        }

        Ok(())
    }
}

/// Main validation entry point. `data_path` overrides the companion file
/// search; without it the data file is located next to the header.
pub fn validate_acquisition(
    header_path: &Path,
    data_path: Option<&Path>,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(header_path.display().to_string());

    // 1. Structure: header file
    if !header_path.is_file() {
        report.add_check(ValidationCheck::failed(
            "Header file exists",
            format!("no such file: {}", header_path.display()),
        ));
        anyhow::bail!(ValidationError::StructureError(format!(
            "header file does not exist: {}",
            header_path.display()
        )));
    }
    report.add_check(ValidationCheck::ok("Header file exists"));

    // 2. Header integrity
    let metadata = match AcquisitionMetadata::from_file(header_path) {
        Ok(metadata) => {
            report.add_check(ValidationCheck::ok("Header parses"));
            metadata
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed("Header parses", e.to_string()));
            return Ok(report);
        }
    };

    report.add_check(ValidationCheck::ok(format!(
        "Cube shape: {} samples x {} lines x {} bands ({})",
        metadata.samples, metadata.lines, metadata.bands, metadata.interleave
    )));

    check_wavelengths(&metadata, &mut report);

    // 3. Data type tag
    let data_type_known = match DataType::from_tag(metadata.data_type) {
        Some(data_type) => {
            report.add_check(ValidationCheck::ok(format!(
                "Data type known: {}",
                data_type
            )));
            true
        }
        None => {
            report.add_check(ValidationCheck::failed(
                "Data type known",
                format!("unsupported tag {}", metadata.data_type),
            ));
            false
        }
    };

    // 4. Companion data file
    let located = match data_path {
        Some(path) => Some(path.to_path_buf()),
        None => locate_companion(header_path),
    };
    let data_file = match located {
        Some(path) if path.is_file() => {
            report.add_check(ValidationCheck::ok(format!(
                "Data file located: {}",
                path.display()
            )));
            path
        }
        Some(path) => {
            report.add_check(ValidationCheck::failed(
                "Data file located",
                format!("no such file: {}", path.display()),
            ));
            return Ok(report);
        }
        None => {
            report.add_check(ValidationCheck::warning(
                "Data file located",
                "no companion data file found; skipping data checks",
            ));
            return Ok(report);
        }
    };

    if !data_type_known {
        // Cannot decode anything without a known element encoding.
        return Ok(report);
    }

    // 5. Size contract and first-frame sanity
    check_data(&metadata, &data_file, &mut report);

    Ok(report)
}

fn check_wavelengths(metadata: &AcquisitionMetadata, report: &mut ValidationReport) {
    let Some(ref wavelengths) = metadata.wavelengths else {
        report.add_check(ValidationCheck::ok(
            "Wavelength calibration absent (optional)",
        ));
        return;
    };

    // Count equality is enforced at parse time; re-assert for the report.
    if wavelengths.len() == metadata.bands {
        report.add_check(ValidationCheck::ok(format!(
            "Wavelength table matches {} bands",
            metadata.bands
        )));
    } else {
        report.add_check(ValidationCheck::failed(
            "Wavelength table matches bands",
            format!("{} entries for {} bands", wavelengths.len(), metadata.bands),
        ));
    }

    let monotonic = wavelengths.windows(2).all(|pair| pair[0] < pair[1]);
    if monotonic {
        report.add_check(ValidationCheck::ok("Wavelengths strictly increasing"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Wavelengths strictly increasing",
            "table is not strictly increasing; band-to-wavelength mapping is suspect",
        ));
    }

    if metadata.wavelength_unit.is_some() {
        report.add_check(ValidationCheck::ok("Wavelength unit present"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Wavelength unit present",
            "calibration table has no unit declaration",
        ));
    }
}

fn check_data(metadata: &AcquisitionMetadata, data_file: &Path, report: &mut ValidationReport) {
    let mut reader = match CubeReader::from_metadata_with_config(
        metadata.clone(),
        data_file,
        CubeReaderConfig::default(),
    ) {
        Ok(reader) => {
            report.add_check(ValidationCheck::ok("Data size matches declared shape"));
            reader
        }
        Err(e @ CubeError::SizeMismatch { .. }) => {
            report.add_check(ValidationCheck::failed(
                "Data size matches declared shape",
                e.to_string(),
            ));
            return;
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed("Data file opens", e.to_string()));
            return;
        }
    };

    match reader.read_frame(0) {
        Ok(frame) => {
            report.add_check(ValidationCheck::ok("First frame decodes"));
            match frame.stats() {
                Some(stats) if stats.min == stats.max => {
                    report.add_check(ValidationCheck::warning(
                        "First frame has dynamic range",
                        format!("all {} elements equal {}", stats.count, stats.min),
                    ));
                }
                _ => {
                    report.add_check(ValidationCheck::ok("First frame has dynamic range"));
                }
            }
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed(
                "First frame decodes",
                e.to_string(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const GOOD_HEADER: &str = "samples = 4\nlines = 2\nbands = 3\ndata type = 12\n\
                               interleave = bil\nbyte order = 0\n\
                               wavelength units = Nanometers\n\
                               wavelength = { 400.0, 410.0, 420.0 }\n";

    fn write_bundle(dir: &Path, header: &str, data_len: usize) -> std::path::PathBuf {
        let header_path = dir.join("scan.hdr");
        fs::write(&header_path, header).unwrap();
        let data: Vec<u8> = (0..data_len).map(|i| (i % 251) as u8).collect();
        fs::write(dir.join("scan.img"), data).unwrap();
        header_path
    }

    #[test]
    fn test_valid_bundle_passes() {
        let dir = tempdir().unwrap();
        // 4 samples * 2 lines * 3 bands * 2 bytes
        let header_path = write_bundle(dir.path(), GOOD_HEADER, 48);

        let report = validate_acquisition(&header_path, None).unwrap();
        assert!(!report.has_failures(), "{}", report);
        assert!(!report.has_warnings(), "{}", report);
    }

    #[test]
    fn test_truncated_data_fails() {
        let dir = tempdir().unwrap();
        let header_path = write_bundle(dir.path(), GOOD_HEADER, 40);

        let report = validate_acquisition(&header_path, None).unwrap();
        assert!(report.has_failures());
        assert!(report
            .checks
            .iter()
            .any(|c| c.name.contains("Data size") && c.status.is_failed()));
    }

    #[test]
    fn test_missing_data_file_warns() {
        let dir = tempdir().unwrap();
        let header_path = dir.path().join("scan.hdr");
        fs::write(&header_path, GOOD_HEADER).unwrap();

        let report = validate_acquisition(&header_path, None).unwrap();
        assert!(!report.has_failures());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_unparsable_header_fails() {
        let dir = tempdir().unwrap();
        let header_path = dir.path().join("scan.hdr");
        fs::write(&header_path, "samples = 4\nlines = 2\n").unwrap();

        let report = validate_acquisition(&header_path, None).unwrap();
        assert!(report.has_failures());
    }

    #[test]
    fn test_missing_header_is_hard_error() {
        let dir = tempdir().unwrap();
        let header_path = dir.path().join("nope.hdr");
        assert!(validate_acquisition(&header_path, None).is_err());
    }

    #[test]
    fn test_uniform_frame_warns() {
        let dir = tempdir().unwrap();
        let header_path = dir.path().join("scan.hdr");
        fs::write(&header_path, GOOD_HEADER).unwrap();
        fs::write(dir.path().join("scan.img"), vec![7u8; 48]).unwrap();

        let report = validate_acquisition(&header_path, None).unwrap();
        assert!(!report.has_failures(), "{}", report);
        assert!(report
            .checks
            .iter()
            .any(|c| c.name.contains("dynamic range")
                && matches!(c.status, CheckStatus::Warning(_))));
    }
}
