//! ASCII spectral-library reader.
//!
//! Reference spectra (USGS splib style) ship as plain text: the first
//! line is a free-text description of the material and measurement, every
//! following line holds one float, and missing measurements carry a
//! documented no-data marker. This module reads those files into a
//! [`LibrarySpectrum`] suitable for comparison against cube spectra.
//!
//! The same strict/lenient split as the sidecar header parser applies:
//! a line that is present but not a float is fatal, while an empty data
//! section just yields an empty spectrum.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::spectrum::{SentinelFilter, SpectralCurve};

/// Errors reading an ASCII spectral library file
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// I/O error reading the file
    #[error("failed to read spectral library file: {0}")]
    Io(#[from] std::io::Error),

    /// A data line failed float parsing
    #[error("malformed spectral value `{token}` on line {line}")]
    MalformedValue {
        /// The raw line content that failed to parse
        token: String,
        /// 1-based line number in the file
        line: usize,
    },
}

/// One reference spectrum from an ASCII library file.
#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySpectrum {
    /// Free-text description from the first line
    pub description: String,
    /// Spectral values with no-data samples already removed
    pub values: Vec<f64>,
}

impl LibrarySpectrum {
    /// Read a library file, dropping values matched by `filter`.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        filter: &SentinelFilter,
    ) -> Result<Self, LibraryError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), filter)
    }

    /// Read a library document from any buffered reader.
    pub fn from_reader<R: BufRead>(
        reader: R,
        filter: &SentinelFilter,
    ) -> Result<Self, LibraryError> {
        let mut description = String::new();
        let mut values = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if index == 0 {
                description = line.trim().to_string();
                continue;
            }

            let token = line.trim();
            if token.is_empty() {
                continue;
            }

            let value: f64 = token.parse().map_err(|_| LibraryError::MalformedValue {
                token: token.to_string(),
                line: index + 1,
            })?;

            if !filter.matches(value) {
                values.push(value);
            }
        }

        Ok(Self {
            description,
            values,
        })
    }

    /// The spectrum as a curve (no wavelength axis; library files carry
    /// band-indexed values only).
    pub fn curve(&self) -> SpectralCurve {
        SpectralCurve::new(self.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE_LIBRARY: &str = "splib07a Actinolite HS22.1B ASDFRb AREF\n\
                                  0.31\n\
                                  -1.23e34\n\
                                  0.35\n\
                                  \n\
                                  0.40\n";

    #[test]
    fn test_read_library_file() {
        let spectrum =
            LibrarySpectrum::from_reader(Cursor::new(SAMPLE_LIBRARY), &SentinelFilter::usgs())
                .unwrap();

        assert_eq!(spectrum.description, "splib07a Actinolite HS22.1B ASDFRb AREF");
        assert_eq!(spectrum.values, vec![0.31, 0.35, 0.40]);
    }

    #[test]
    fn test_malformed_value_is_fatal() {
        let text = "desc\n0.31\nnot-a-number\n";
        let err = LibrarySpectrum::from_reader(Cursor::new(text), &SentinelFilter::usgs())
            .unwrap_err();
        match err {
            LibraryError::MalformedValue { token, line } => {
                assert_eq!(token, "not-a-number");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_document() {
        let spectrum =
            LibrarySpectrum::from_reader(Cursor::new(""), &SentinelFilter::usgs()).unwrap();
        assert_eq!(spectrum.description, "");
        assert!(spectrum.values.is_empty());
    }

    #[test]
    fn test_explicit_sentinel() {
        let text = "desc\n1.0\n-9999\n2.0\n";
        let spectrum =
            LibrarySpectrum::from_reader(Cursor::new(text), &SentinelFilter::new(-9999.0))
                .unwrap();
        assert_eq!(spectrum.values, vec![1.0, 2.0]);
    }
}
