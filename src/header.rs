//! # Sidecar Header Parser
//!
//! Hyperspectral acquisitions are stored as a raw binary cube next to a
//! human-readable sidecar text file describing the cube's shape, element
//! encoding, wavelength calibration, and free-form camera configuration.
//! This module parses that text into an [`AcquisitionMetadata`] record and
//! serializes records back into the same grammar.
//!
//! ## Grammar
//!
//! The sidecar format is a loose collection of `label = value` assignments
//! and two brace-delimited blocks, in any order:
//!
//! ```text
//! description = {
//! ID = Baldur
//! Serialnumber = SN12013
//! }
//! samples = 384
//! lines = 1000
//! bands = 288
//! data type = 12
//! interleave = bil
//! byte order = 0
//! acquisition date = 2025-03-24
//! acquisition start time = 02:40:57
//! wavelength units = Nanometers
//! wavelength = { 400.0, 403.1, 406.2 }
//! ```
//!
//! ## Parsing policy
//!
//! Extraction is an order-independent scan: a field may appear anywhere in
//! the document, and the first occurrence wins. The six core fields
//! (`samples`, `lines`, `bands`, `data type`, `interleave`, `byte order`)
//! are required and must parse; everything else is best-effort and simply
//! left unset when absent. Downstream consumers rely on the shape fields
//! always being present and valid, while camera and acquisition
//! descriptions are informational.
//!
//! Parsing is pure and atomic: on any error nothing is returned, and no
//! partially filled record is ever observable.
//!
//! ## Example
//!
//! ```rust
//! use speccube::header::AcquisitionMetadata;
//!
//! let text = "samples = 2\nlines = 4\nbands = 3\ndata type = 12\n\
//!             interleave = bil\nbyte order = 0\n";
//! let meta = AcquisitionMetadata::parse(text)?;
//! assert_eq!(meta.samples, 2);
//! assert_eq!(meta.bands, 3);
//! # Ok::<(), speccube::header::HeaderError>(())
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

/// Errors that can occur while parsing a sidecar header
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// I/O error reading the header file
    #[error("failed to read header: {0}")]
    Io(#[from] std::io::Error),

    /// One of the six required scalar fields is absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required field's value token is not a valid integer
    #[error("malformed value for field `{field}`: `{token}`")]
    MalformedField {
        /// Label of the offending field
        field: &'static str,
        /// The raw value token that failed to parse
        token: String,
    },

    /// A shape field parsed but is not a positive count
    #[error("field `{field}` must be a positive count, got {value}")]
    InvalidDimension {
        /// Label of the offending field
        field: &'static str,
        /// The parsed, non-positive value
        value: i64,
    },

    /// The interleave token is not one of the known layouts
    #[error("unrecognized interleave layout: `{0}`")]
    UnknownInterleave(String),

    /// The byte order tag is neither 0 (little) nor 1 (big)
    #[error("unrecognized byte order tag: `{0}`")]
    UnknownByteOrder(String),

    /// A wavelength block entry failed float parsing
    #[error("malformed wavelength token `{token}` at position {position}")]
    MalformedWavelength {
        /// The raw token that failed to parse
        token: String,
        /// 1-based ordinal of the token within the block
        position: usize,
    },

    /// The wavelength table length does not match the band count
    #[error("wavelength table has {wavelengths} entries but header declares {bands} bands")]
    DimensionMismatch {
        /// Band count declared by the header
        bands: usize,
        /// Number of entries in the wavelength block
        wavelengths: usize,
    },

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk ordering of samples, bands, and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interleave {
    /// Band-interleaved-by-line: each line stores all samples of band 0,
    /// then band 1, and so on. The native layout of line-scan cameras.
    Bil,
    /// Band-interleaved-by-pixel: each sample stores its full spectrum.
    Bip,
    /// Band-sequential: each band stores the full spatial image.
    Bsq,
}

impl FromStr for Interleave {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bil" => Ok(Interleave::Bil),
            "bip" => Ok(Interleave::Bip),
            "bsq" => Ok(Interleave::Bsq),
            _ => Err(HeaderError::UnknownInterleave(s.to_string())),
        }
    }
}

impl fmt::Display for Interleave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interleave::Bil => "bil",
            Interleave::Bip => "bip",
            Interleave::Bsq => "bsq",
        };
        f.write_str(s)
    }
}

/// Byte order of multi-byte cube elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Tag 0: least significant byte first
    Little,
    /// Tag 1: most significant byte first
    Big,
}

impl Endianness {
    /// Resolve a header `byte order` tag.
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(Endianness::Little),
            1 => Some(Endianness::Big),
            _ => None,
        }
    }

    /// The integer tag written into headers for this byte order.
    pub fn tag(&self) -> i64 {
        match self {
            Endianness::Little => 0,
            Endianness::Big => 1,
        }
    }
}

/// Parsed acquisition metadata from a sidecar header.
///
/// Immutable once produced; every `parse` call yields an independent
/// record, so read-only sharing across threads is safe by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionMetadata {
    /// Spatial pixel count per line
    pub samples: usize,

    /// Number of acquired frames/lines
    pub lines: usize,

    /// Spectral channel count
    pub bands: usize,

    /// Element encoding tag of the companion cube (ENVI convention).
    /// Preserved as the raw integer; unknown tags are rejected only by
    /// consumers that actually need to decode elements.
    pub data_type: i32,

    /// On-disk data layout
    pub interleave: Interleave,

    /// Byte order of multi-byte elements
    pub byte_order: Endianness,

    /// Acquisition date, raw text (e.g. `2025-03-24`)
    pub acquisition_date: Option<String>,

    /// Acquisition start time, raw text (e.g. `02:40:57`)
    pub acquisition_start_time: Option<String>,

    /// Unit of the wavelength table (e.g. `Nanometers`)
    pub wavelength_unit: Option<String>,

    /// Per-band wavelength calibration; when present its length equals
    /// `bands`
    pub wavelengths: Option<Vec<f64>>,

    /// Free-form camera configuration from the `description` block.
    /// The key set is vendor-defined and open-ended, so no schema is
    /// enforced beyond flat string values.
    pub camera_info: HashMap<String, String>,
}

impl AcquisitionMetadata {
    /// Parse the full text of a sidecar header.
    ///
    /// Works on a local value and publishes it atomically: on error no
    /// partial record escapes.
    pub fn parse(text: &str) -> Result<Self, HeaderError> {
        let samples = required_count(text, "samples")?;
        let lines = required_count(text, "lines")?;
        let bands = required_count(text, "bands")?;

        let data_type = required_int(text, "data type")? as i32;

        let interleave_token =
            find_scalar(text, "interleave").ok_or(HeaderError::MissingField("interleave"))?;
        let interleave = interleave_token.parse::<Interleave>()?;

        let byte_order_token =
            find_scalar(text, "byte order").ok_or(HeaderError::MissingField("byte order"))?;
        let byte_order_tag: i64 = byte_order_token.parse().map_err(|_| {
            HeaderError::MalformedField {
                field: "byte order",
                token: byte_order_token.to_string(),
            }
        })?;
        let byte_order = Endianness::from_tag(byte_order_tag)
            .ok_or_else(|| HeaderError::UnknownByteOrder(byte_order_token.to_string()))?;

        let acquisition_date = find_scalar(text, "acquisition date").map(str::to_string);
        let acquisition_start_time =
            find_scalar(text, "acquisition start time").map(str::to_string);

        // The wavelength table and its unit travel together: without the
        // block, a stray units line is meaningless and stays unset.
        let (wavelengths, wavelength_unit) = match find_block(text, "wavelength") {
            Some(body) => {
                let table = parse_wavelength_block(body)?;
                if table.len() != bands {
                    return Err(HeaderError::DimensionMismatch {
                        bands,
                        wavelengths: table.len(),
                    });
                }
                let unit = find_scalar(text, "wavelength units").map(str::to_string);
                (Some(table), unit)
            }
            None => (None, None),
        };

        let camera_info = match find_block(text, "description") {
            Some(body) => parse_description_block(body),
            None => HashMap::new(),
        };

        Ok(Self {
            samples,
            lines,
            bands,
            data_type,
            interleave,
            byte_order,
            acquisition_date,
            acquisition_start_time,
            wavelength_unit,
            wavelengths,
            camera_info,
        })
    }

    /// Read and parse a sidecar header file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HeaderError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serialize the record back into the sidecar grammar.
    ///
    /// Re-parsing the produced text yields an equal record. Scalars are
    /// emitted ahead of the description block so that free-form camera
    /// keys cannot shadow the required labels under first-match-wins
    /// extraction; camera info keys are sorted for deterministic output.
    pub fn to_header_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "samples = {}", self.samples);
        let _ = writeln!(out, "lines = {}", self.lines);
        let _ = writeln!(out, "bands = {}", self.bands);
        let _ = writeln!(out, "data type = {}", self.data_type);
        let _ = writeln!(out, "interleave = {}", self.interleave);
        let _ = writeln!(out, "byte order = {}", self.byte_order.tag());

        if let Some(ref date) = self.acquisition_date {
            let _ = writeln!(out, "acquisition date = {}", date);
        }
        if let Some(ref time) = self.acquisition_start_time {
            let _ = writeln!(out, "acquisition start time = {}", time);
        }

        if let Some(ref unit) = self.wavelength_unit {
            let _ = writeln!(out, "wavelength units = {}", unit);
        }
        if let Some(ref wavelengths) = self.wavelengths {
            let joined = wavelengths
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "wavelength = {{ {} }}", joined);
        }

        if !self.camera_info.is_empty() {
            out.push_str("description = {\n");
            let mut keys: Vec<&String> = self.camera_info.keys().collect();
            keys.sort();
            for key in keys {
                let _ = writeln!(out, "{} = {}", key, self.camera_info[key]);
            }
            out.push_str("}\n");
        }

        out
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, HeaderError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, HeaderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Best-effort combination of the raw date and start-time fields into
    /// a timestamp. Descriptive fields stay best-effort: unparsable or
    /// absent text yields `None`, never an error.
    pub fn acquisition_datetime(&self) -> Option<NaiveDateTime> {
        let date_text = self.acquisition_date.as_deref()?.trim();
        let time_text = self.acquisition_start_time.as_deref()?.trim();

        let date = ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_text, fmt).ok())?;
        let time = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(time_text, fmt).ok())?;

        Some(date.and_time(time))
    }

    /// Number of elements in one frame (`bands * samples`), the 2-D shape
    /// used to reinterpret a flat per-line buffer.
    pub fn frame_elements(&self) -> usize {
        self.bands * self.samples
    }

    /// Total number of elements in the cube.
    pub fn cube_elements(&self) -> usize {
        self.bands * self.samples * self.lines
    }
}

/// If `line` starts with `label` (ASCII case-insensitive) followed by an
/// `=`, return the text after the `=`.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    if line.len() < label.len() || !line.is_char_boundary(label.len()) {
        return None;
    }
    let (head, tail) = line.split_at(label.len());
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    tail.trim_start().strip_prefix('=')
}

/// Locate a scalar `label = value` assignment anywhere in the document.
/// First match in document order wins. Lines where the label is followed
/// by more words (e.g. `wavelength units` when scanning for `wavelength`)
/// do not match, because the `=` is not the next token.
fn find_scalar<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    for line in text.lines() {
        if let Some(rest) = strip_label(line.trim_start(), label) {
            return Some(rest.trim());
        }
    }
    None
}

/// Locate a `label = { ... }` block and return its body, which may span
/// multiple lines. Delimited by the first closing brace; a block with no
/// closing brace is treated as absent.
fn find_block<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let trimmed = &line[indent..];
        if let Some(rest) = strip_label(trimmed, label) {
            let after_eq = rest.trim_start();
            if after_eq.starts_with('{') {
                let rest_offset = offset + indent + (trimmed.len() - rest.len());
                let brace_offset = rest_offset + (rest.len() - after_eq.len()) + 1;
                let body = &text[brace_offset..];
                if let Some(end) = body.find('}') {
                    return Some(&body[..end]);
                }
            }
        }
        offset += line.len();
    }
    None
}

fn required_int(text: &str, label: &'static str) -> Result<i64, HeaderError> {
    let token = find_scalar(text, label).ok_or(HeaderError::MissingField(label))?;
    token.parse::<i64>().map_err(|_| HeaderError::MalformedField {
        field: label,
        token: token.to_string(),
    })
}

fn required_count(text: &str, label: &'static str) -> Result<usize, HeaderError> {
    let value = required_int(text, label)?;
    if value <= 0 {
        return Err(HeaderError::InvalidDimension {
            field: label,
            value,
        });
    }
    Ok(value as usize)
}

/// Parse the body of a `wavelength = { ... }` block: comma-separated
/// floats, tolerant of embedded whitespace and newlines. Empty tokens
/// (e.g. a trailing comma) are skipped; anything else that fails float
/// parsing is fatal.
fn parse_wavelength_block(body: &str) -> Result<Vec<f64>, HeaderError> {
    let mut values = Vec::new();
    let mut position = 0;
    for raw in body.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        position += 1;
        let value: f64 = token.parse().map_err(|_| HeaderError::MalformedWavelength {
            token: token.to_string(),
            position,
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Split the body of a `description` block into key/value pairs. Each
/// line containing an `=` contributes one entry, split on the first `=`
/// with both sides trimmed; other lines are ignored.
fn parse_description_block(body: &str) -> HashMap<String, String> {
    let mut info = HashMap::new();
    for line in body.lines() {
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            info.entry(key.to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }
    info
}
