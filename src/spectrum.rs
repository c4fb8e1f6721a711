//! Spectral curve utilities: statistics, min-max normalization, no-data
//! sentinel filtering, and CSV export.
//!
//! These are the numeric preparation steps shared by every consumer of a
//! per-pixel spectrum, whether it came out of a raw cube or an ASCII
//! spectral library. Rendering is left to external tools; this module
//! only produces the numbers and the CSV they plot from.

use serde::{Deserialize, Serialize};
use std::io;

/// No-data marker used by USGS spectral library ASCII files.
///
/// Filtering never hardcodes this: construct a [`SentinelFilter`] with
/// whatever marker the data source documents.
pub const USGS_NO_DATA: f64 = -1.23e34;

/// Errors from spectral curve handling
#[derive(Debug, thiserror::Error)]
pub enum SpectrumError {
    /// Wavelength axis and value vector lengths differ
    #[error("curve has {values} values but {wavelengths} wavelengths")]
    LengthMismatch {
        /// Number of values
        values: usize,
        /// Number of wavelength entries
        wavelengths: usize,
    },

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Summary statistics of a value sequence, computed in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralStats {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Number of values
    pub count: usize,
}

impl SpectralStats {
    /// Compute statistics over `values`; `None` when empty.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let mean = sum / values.len() as f64;

        let variance = values
            .iter()
            .map(|&v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / values.len() as f64;

        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            count: values.len(),
        })
    }
}

/// Drops samples that match a documented no-data marker.
///
/// Matching is tolerance-based rather than bitwise equality, since the
/// marker usually survives at least one decimal round-trip before it
/// reaches us.
#[derive(Debug, Clone, Copy)]
pub struct SentinelFilter {
    sentinel: f64,
    tolerance: f64,
}

impl SentinelFilter {
    /// Filter for an explicit sentinel value, with a relative tolerance
    /// of 1e-9.
    pub fn new(sentinel: f64) -> Self {
        Self {
            sentinel,
            tolerance: sentinel.abs() * 1e-9,
        }
    }

    /// Filter with an explicit absolute tolerance.
    pub fn with_tolerance(sentinel: f64, tolerance: f64) -> Self {
        Self { sentinel, tolerance }
    }

    /// Filter for the USGS spectral library no-data marker.
    pub fn usgs() -> Self {
        Self::new(USGS_NO_DATA)
    }

    /// Whether `value` is the no-data marker.
    pub fn matches(&self, value: f64) -> bool {
        (value - self.sentinel).abs() <= self.tolerance
    }

    /// Copy of `values` with no-data samples removed.
    pub fn retain(&self, values: &[f64]) -> Vec<f64> {
        values.iter().copied().filter(|&v| !self.matches(v)).collect()
    }
}

/// Min-max normalization into `[0, 1]`.
///
/// A constant input has no dynamic range and maps to all zeros rather
/// than dividing by zero.
pub fn normalize_min_max(values: &[f64]) -> Vec<f64> {
    let Some(stats) = SpectralStats::compute(values) else {
        return Vec::new();
    };
    let range = stats.max - stats.min;
    if range == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| (v - stats.min) / range).collect()
}

/// A per-pixel spectral curve, optionally carrying its wavelength axis.
///
/// When the wavelength axis is present it has the same length as the
/// value vector, so it can serve directly as the x-axis of a spectral
/// response plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralCurve {
    /// Wavelength of each value, when calibration is available
    pub wavelengths: Option<Vec<f64>>,
    /// Response values, one per band
    pub values: Vec<f64>,
}

impl SpectralCurve {
    /// Curve without a wavelength axis; consumers fall back to band
    /// indices.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            wavelengths: None,
            values,
        }
    }

    /// Curve with a wavelength axis of matching length.
    pub fn with_wavelengths(values: Vec<f64>, wavelengths: Vec<f64>) -> Result<Self, SpectrumError> {
        if values.len() != wavelengths.len() {
            return Err(SpectrumError::LengthMismatch {
                values: values.len(),
                wavelengths: wavelengths.len(),
            });
        }
        Ok(Self {
            wavelengths: Some(wavelengths),
            values,
        })
    }

    /// Number of bands in the curve.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the curve has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Summary statistics of the values; `None` when empty.
    pub fn stats(&self) -> Option<SpectralStats> {
        SpectralStats::compute(&self.values)
    }

    /// Min-max normalized copy. The wavelength axis is carried over
    /// unchanged.
    pub fn normalized(&self) -> Self {
        Self {
            wavelengths: self.wavelengths.clone(),
            values: normalize_min_max(&self.values),
        }
    }

    /// Copy with no-data samples removed. Wavelength entries are dropped
    /// in lockstep so the axis stays aligned with the surviving values.
    pub fn retained(&self, filter: &SentinelFilter) -> Self {
        match &self.wavelengths {
            Some(wavelengths) => {
                let (w, v): (Vec<f64>, Vec<f64>) = wavelengths
                    .iter()
                    .zip(&self.values)
                    .filter(|(_, &v)| !filter.matches(v))
                    .map(|(&w, &v)| (w, v))
                    .unzip();
                Self {
                    wavelengths: Some(w),
                    values: v,
                }
            }
            None => Self {
                wavelengths: None,
                values: filter.retain(&self.values),
            },
        }
    }

    /// Write the curve as CSV. The first column is `wavelength` when the
    /// axis is present, `band` (the 0-based index) otherwise.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), SpectrumError> {
        let mut wtr = csv::Writer::from_writer(writer);
        match &self.wavelengths {
            Some(wavelengths) => {
                wtr.write_record(["wavelength", "value"])?;
                for (w, v) in wavelengths.iter().zip(&self.values) {
                    wtr.write_record([w.to_string(), v.to_string()])?;
                }
            }
            None => {
                wtr.write_record(["band", "value"])?;
                for (band, v) in self.values.iter().enumerate() {
                    wtr.write_record([band.to_string(), v.to_string()])?;
                }
            }
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let stats = SpectralStats::compute(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.count, 4);
        assert!((stats.std_dev - 1.118033988749895).abs() < 1e-12);
    }

    #[test]
    fn test_stats_empty() {
        assert!(SpectralStats::compute(&[]).is_none());
    }

    #[test]
    fn test_normalize() {
        let normalized = normalize_min_max(&[10.0, 15.0, 20.0]);
        assert_eq!(normalized, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_constant_input() {
        let normalized = normalize_min_max(&[7.0, 7.0, 7.0]);
        assert_eq!(normalized, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sentinel_filter() {
        let filter = SentinelFilter::usgs();
        let values = [0.31, USGS_NO_DATA, 0.35, -1.2300000001e34];
        let kept = filter.retain(&values);
        assert_eq!(kept, vec![0.31, 0.35]);
    }

    #[test]
    fn test_sentinel_filter_explicit_marker() {
        let filter = SentinelFilter::new(-9999.0);
        assert!(filter.matches(-9999.0));
        assert!(!filter.matches(USGS_NO_DATA));
    }

    #[test]
    fn test_curve_length_mismatch() {
        let err = SpectralCurve::with_wavelengths(vec![1.0, 2.0], vec![400.0]).unwrap_err();
        assert!(matches!(
            err,
            SpectrumError::LengthMismatch { values: 2, wavelengths: 1 }
        ));
    }

    #[test]
    fn test_retained_keeps_axis_aligned() {
        let curve = SpectralCurve::with_wavelengths(
            vec![0.1, USGS_NO_DATA, 0.3],
            vec![400.0, 401.0, 402.0],
        )
        .unwrap();
        let kept = curve.retained(&SentinelFilter::usgs());
        assert_eq!(kept.values, vec![0.1, 0.3]);
        assert_eq!(kept.wavelengths, Some(vec![400.0, 402.0]));
    }

    #[test]
    fn test_csv_with_wavelengths() {
        let curve =
            SpectralCurve::with_wavelengths(vec![0.5, 0.7], vec![400.0, 401.0]).unwrap();
        let mut out = Vec::new();
        curve.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "wavelength,value\n400,0.5\n401,0.7\n");
    }

    #[test]
    fn test_csv_without_wavelengths() {
        let curve = SpectralCurve::new(vec![1.5]);
        let mut out = Vec::new();
        curve.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "band,value\n0,1.5\n");
    }
}
