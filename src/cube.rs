//! # Raw Cube Accessor
//!
//! Reads the binary data cube that accompanies a sidecar header. The
//! header supplies the 2-D shape (`bands x samples`) used to reinterpret
//! each flat per-line buffer, the element encoding, the byte order, and
//! the on-disk interleave.
//!
//! ## Features
//!
//! - **Frame access**: decode any acquired line/frame as a
//!   `bands x samples` matrix
//! - **Band slices**: one spectral band across every frame
//! - **Per-pixel spectra**: a spectral curve for one spatial position,
//!   carrying the wavelength axis when the header has calibration
//! - **Sources**: an on-disk file or an in-memory [`Bytes`] buffer
//!
//! ## Example
//!
//! ```rust,no_run
//! use speccube::cube::CubeReader;
//!
//! let mut reader = CubeReader::open("scan.hdr")?;
//! let frame = reader.read_frame(0)?;
//! println!("frame 0 mean DN: {:?}", frame.stats().map(|s| s.mean));
//!
//! let curve = reader.spectrum_at(0, 192)?;
//! println!("{} bands at spatial position 192", curve.len());
//! # Ok::<(), speccube::cube::CubeError>(())
//! ```

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use bytes::Bytes;
use log::debug;

use crate::datatype::DataType;
use crate::header::{AcquisitionMetadata, Endianness, HeaderError, Interleave};
use crate::spectrum::{SpectralCurve, SpectralStats};

/// File extensions tried when locating the data file next to a header.
const DATA_EXTENSIONS: &[&str] = &["img", "raw", "bil", "bip", "bsq", "dat", "hyspex"];

/// Errors that can occur while reading a raw cube
#[derive(Debug, thiserror::Error)]
pub enum CubeError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar header error
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// The header's data type tag names no supported element encoding
    #[error("unsupported data type tag: {0}")]
    UnknownDataType(i32),

    /// No companion data file was found next to the header
    #[error("no companion data file found for header {0}")]
    DataNotFound(PathBuf),

    /// Source length does not match the shape declared by the header
    #[error("data size mismatch: header implies {expected} bytes, source has {actual}")]
    SizeMismatch {
        /// Byte count implied by the header shape
        expected: u64,
        /// Actual source length
        actual: u64,
    },

    /// Frame index beyond the acquired line count
    #[error("frame {index} out of range: cube has {lines} lines")]
    FrameOutOfRange {
        /// Requested frame index
        index: usize,
        /// Number of lines in the cube
        lines: usize,
    },

    /// Band index beyond the spectral channel count
    #[error("band {band} out of range: cube has {bands} bands")]
    BandOutOfRange {
        /// Requested band index
        band: usize,
        /// Number of bands in the cube
        bands: usize,
    },

    /// Spatial position beyond the per-line sample count
    #[error("sample {sample} out of range: cube has {samples} samples per line")]
    SampleOutOfRange {
        /// Requested spatial position
        sample: usize,
        /// Number of samples per line
        samples: usize,
    },
}

/// Configuration for cube readers
#[derive(Debug, Clone, Default)]
pub struct CubeReaderConfig {
    /// Bytes to skip before pixel data. Non-zero for container files that
    /// embed a binary header ahead of the cube.
    pub header_offset_bytes: u64,
}

/// Source the cube bytes come from (file path or in-memory buffer)
#[derive(Debug)]
enum CubeSource {
    /// Open file handle, read with seek
    File(File),
    /// In-memory buffer
    Memory(Bytes),
}

impl CubeSource {
    fn len(&self) -> Result<u64, CubeError> {
        match self {
            CubeSource::File(file) => Ok(file.metadata()?.len()),
            CubeSource::Memory(bytes) => Ok(bytes.len() as u64),
        }
    }

    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, CubeError> {
        match self {
            CubeSource::File(file) => {
                file.seek(SeekFrom::Start(offset))?;
                let mut buf = vec![0u8; len];
                file.read_exact(&mut buf)?;
                Ok(buf)
            }
            CubeSource::Memory(bytes) => {
                let start = offset as usize;
                let end = start
                    .checked_add(len)
                    .filter(|&end| end <= bytes.len())
                    .ok_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "read past end of in-memory cube",
                        )
                    })?;
                Ok(bytes[start..end].to_vec())
            }
        }
    }
}

/// One decoded line/frame: all bands for all spatial samples at one point
/// in time, in band-major layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    bands: usize,
    samples: usize,
    data: Vec<f64>,
}

impl Frame {
    /// Spectral channel count.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Spatial pixel count.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Flat band-major element view.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Value at one band and spatial position.
    pub fn value(&self, band: usize, sample: usize) -> Option<f64> {
        if band >= self.bands || sample >= self.samples {
            return None;
        }
        Some(self.data[band * self.samples + sample])
    }

    /// All samples of one band.
    pub fn band(&self, band: usize) -> Option<&[f64]> {
        if band >= self.bands {
            return None;
        }
        let start = band * self.samples;
        Some(&self.data[start..start + self.samples])
    }

    /// The spectrum of one spatial position, one value per band.
    pub fn spectrum_at(&self, sample: usize) -> Option<Vec<f64>> {
        if sample >= self.samples {
            return None;
        }
        Some(
            (0..self.bands)
                .map(|band| self.data[band * self.samples + sample])
                .collect(),
        )
    }

    /// Summary statistics over every element in the frame.
    pub fn stats(&self) -> Option<SpectralStats> {
        SpectralStats::compute(&self.data)
    }
}

/// One spectral band across every acquired frame, line-major.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSlice {
    lines: usize,
    samples: usize,
    data: Vec<f64>,
}

impl BandSlice {
    /// Number of lines (rows) in the slice.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Spatial pixel count (columns).
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Flat line-major element view.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// All samples of one line.
    pub fn row(&self, line: usize) -> Option<&[f64]> {
        if line >= self.lines {
            return None;
        }
        let start = line * self.samples;
        Some(&self.data[start..start + self.samples])
    }

    /// Summary statistics over the whole slice.
    pub fn stats(&self) -> Option<SpectralStats> {
        SpectralStats::compute(&self.data)
    }
}

/// Aggregate response of one band over the whole cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStats {
    /// Band index
    pub band: usize,
    /// Smallest value in the band
    pub min: f64,
    /// Largest value in the band
    pub max: f64,
    /// Mean over all lines and samples
    pub mean: f64,
    /// Population standard deviation over all lines and samples
    pub std_dev: f64,
}

/// Reader for raw acquisition cubes.
///
/// Decodes elements to `f64` regardless of the stored encoding, which
/// loses nothing for the 8/16/32-bit integer and float encodings
/// acquisition hardware produces.
#[derive(Debug)]
pub struct CubeReader {
    metadata: AcquisitionMetadata,
    data_type: DataType,
    source: CubeSource,
    config: CubeReaderConfig,
}

impl CubeReader {
    /// Open the cube described by a sidecar header, locating the data
    /// file next to it (same stem, known data extensions).
    pub fn open<P: AsRef<Path>>(header_path: P) -> Result<Self, CubeError> {
        let header_path = header_path.as_ref();
        let metadata = AcquisitionMetadata::from_file(header_path)?;
        let data_path = locate_companion(header_path)
            .ok_or_else(|| CubeError::DataNotFound(header_path.to_path_buf()))?;
        debug!("located companion data file: {}", data_path.display());
        Self::from_metadata(metadata, data_path)
    }

    /// Open the cube described by a header with an explicit data file.
    pub fn open_with_data<P: AsRef<Path>, Q: AsRef<Path>>(
        header_path: P,
        data_path: Q,
    ) -> Result<Self, CubeError> {
        let metadata = AcquisitionMetadata::from_file(header_path)?;
        Self::from_metadata(metadata, data_path)
    }

    /// Open a data file with already-parsed metadata.
    pub fn from_metadata<P: AsRef<Path>>(
        metadata: AcquisitionMetadata,
        data_path: P,
    ) -> Result<Self, CubeError> {
        Self::from_metadata_with_config(metadata, data_path, CubeReaderConfig::default())
    }

    /// Open a data file with custom configuration.
    pub fn from_metadata_with_config<P: AsRef<Path>>(
        metadata: AcquisitionMetadata,
        data_path: P,
        config: CubeReaderConfig,
    ) -> Result<Self, CubeError> {
        let file = File::open(data_path)?;
        Self::new(metadata, CubeSource::File(file), config)
    }

    /// Read a cube from an in-memory buffer.
    pub fn from_bytes(metadata: AcquisitionMetadata, bytes: Bytes) -> Result<Self, CubeError> {
        Self::from_bytes_with_config(metadata, bytes, CubeReaderConfig::default())
    }

    /// Read an in-memory cube with custom configuration.
    pub fn from_bytes_with_config(
        metadata: AcquisitionMetadata,
        bytes: Bytes,
        config: CubeReaderConfig,
    ) -> Result<Self, CubeError> {
        Self::new(metadata, CubeSource::Memory(bytes), config)
    }

    fn new(
        metadata: AcquisitionMetadata,
        source: CubeSource,
        config: CubeReaderConfig,
    ) -> Result<Self, CubeError> {
        let data_type = DataType::from_tag(metadata.data_type)
            .ok_or(CubeError::UnknownDataType(metadata.data_type))?;

        let expected = config.header_offset_bytes
            + metadata.cube_elements() as u64 * data_type.size_bytes() as u64;
        let actual = source.len()?;
        if expected != actual {
            return Err(CubeError::SizeMismatch { expected, actual });
        }

        Ok(Self {
            metadata,
            data_type,
            source,
            config,
        })
    }

    /// The header metadata this reader was built from.
    pub fn metadata(&self) -> &AcquisitionMetadata {
        &self.metadata
    }

    /// Element encoding of the cube.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Number of acquired frames.
    pub fn frame_count(&self) -> usize {
        self.metadata.lines
    }

    /// Decode one frame as a `bands x samples` matrix.
    pub fn read_frame(&mut self, index: usize) -> Result<Frame, CubeError> {
        let (bands, samples, lines) =
            (self.metadata.bands, self.metadata.samples, self.metadata.lines);
        if index >= lines {
            return Err(CubeError::FrameOutOfRange { index, lines });
        }

        let elem = self.data_type.size_bytes();
        let frame_elements = self.metadata.frame_elements();
        let base = self.config.header_offset_bytes;

        let data = match self.metadata.interleave {
            Interleave::Bil => {
                // Line-major, band-major within the line: already our layout.
                let offset = base + (index * frame_elements * elem) as u64;
                let bytes = self.source.read_at(offset, frame_elements * elem)?;
                self.decode(&bytes)
            }
            Interleave::Bip => {
                // Line-major, sample-major within the line: transpose.
                let offset = base + (index * frame_elements * elem) as u64;
                let bytes = self.source.read_at(offset, frame_elements * elem)?;
                let raw = self.decode(&bytes);
                let mut data = vec![0.0; frame_elements];
                for sample in 0..samples {
                    for band in 0..bands {
                        data[band * samples + sample] = raw[sample * bands + band];
                    }
                }
                data
            }
            Interleave::Bsq => {
                // Band-major over the whole cube: one read per band.
                let mut data = Vec::with_capacity(frame_elements);
                for band in 0..bands {
                    let offset = base + ((band * lines + index) * samples * elem) as u64;
                    let bytes = self.source.read_at(offset, samples * elem)?;
                    data.extend(self.decode(&bytes));
                }
                data
            }
        };

        Ok(Frame {
            bands,
            samples,
            data,
        })
    }

    /// The spectral curve of one spatial position in one frame, carrying
    /// the header's wavelength axis when calibration is present.
    pub fn spectrum_at(&mut self, frame: usize, sample: usize) -> Result<SpectralCurve, CubeError> {
        let samples = self.metadata.samples;
        if sample >= samples {
            return Err(CubeError::SampleOutOfRange { sample, samples });
        }

        let frame = self.read_frame(frame)?;
        let values = frame
            .spectrum_at(sample)
            .unwrap_or_default();

        Ok(SpectralCurve {
            wavelengths: self.metadata.wavelengths.clone(),
            values,
        })
    }

    /// Extract one band across every frame.
    pub fn read_band_slice(&mut self, band: usize) -> Result<BandSlice, CubeError> {
        let (bands, samples, lines) =
            (self.metadata.bands, self.metadata.samples, self.metadata.lines);
        if band >= bands {
            return Err(CubeError::BandOutOfRange { band, bands });
        }

        let elem = self.data_type.size_bytes();
        let base = self.config.header_offset_bytes;

        let data = match self.metadata.interleave {
            Interleave::Bil => {
                let mut data = Vec::with_capacity(lines * samples);
                for line in 0..lines {
                    let offset = base + ((line * bands + band) * samples * elem) as u64;
                    let bytes = self.source.read_at(offset, samples * elem)?;
                    data.extend(self.decode(&bytes));
                }
                data
            }
            Interleave::Bip => {
                // Band values are strided within each line; decode the
                // line and pick the stride out.
                let frame_elements = bands * samples;
                let mut data = Vec::with_capacity(lines * samples);
                for line in 0..lines {
                    let offset = base + (line * frame_elements * elem) as u64;
                    let bytes = self.source.read_at(offset, frame_elements * elem)?;
                    let raw = self.decode(&bytes);
                    data.extend((0..samples).map(|s| raw[s * bands + band]));
                }
                data
            }
            Interleave::Bsq => {
                // The whole band is contiguous.
                let offset = base + (band * lines * samples * elem) as u64;
                let bytes = self.source.read_at(offset, lines * samples * elem)?;
                self.decode(&bytes)
            }
        };

        Ok(BandSlice {
            lines,
            samples,
            data,
        })
    }

    /// Aggregate per-band statistics over the whole cube, streamed one
    /// frame at a time.
    pub fn band_stats(&mut self) -> Result<Vec<BandStats>, CubeError> {
        let (bands, samples, lines) =
            (self.metadata.bands, self.metadata.samples, self.metadata.lines);

        let mut mins = vec![f64::INFINITY; bands];
        let mut maxs = vec![f64::NEG_INFINITY; bands];
        let mut sums = vec![0.0f64; bands];
        let mut sq_sums = vec![0.0f64; bands];

        for line in 0..lines {
            let frame = self.read_frame(line)?;
            for band in 0..bands {
                // band() is in range by construction
                let Some(values) = frame.band(band) else { continue };
                for &v in values {
                    mins[band] = mins[band].min(v);
                    maxs[band] = maxs[band].max(v);
                    sums[band] += v;
                    sq_sums[band] += v * v;
                }
            }
        }

        let n = (lines * samples) as f64;
        Ok((0..bands)
            .map(|band| {
                let mean = sums[band] / n;
                let variance = (sq_sums[band] / n - mean * mean).max(0.0);
                BandStats {
                    band,
                    min: mins[band],
                    max: maxs[band],
                    mean,
                    std_dev: variance.sqrt(),
                }
            })
            .collect())
    }

    fn decode(&self, bytes: &[u8]) -> Vec<f64> {
        match self.metadata.byte_order {
            Endianness::Little => decode_elements::<LittleEndian>(bytes, self.data_type),
            Endianness::Big => decode_elements::<BigEndian>(bytes, self.data_type),
        }
    }
}

/// Look for the data file belonging to `header_path`: the same name with
/// the `.hdr` suffix dropped, then the same stem with each known data
/// extension.
pub fn locate_companion(header_path: &Path) -> Option<PathBuf> {
    if header_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("hdr"))
    {
        let bare = header_path.with_extension("");
        if bare.is_file() {
            return Some(bare);
        }
    }
    for ext in DATA_EXTENSIONS {
        let candidate = header_path.with_extension(ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn decode_elements<E: ByteOrder>(bytes: &[u8], data_type: DataType) -> Vec<f64> {
    let elem = data_type.size_bytes();
    let chunks = bytes.chunks_exact(elem);
    match data_type {
        DataType::U8 => bytes.iter().map(|&b| b as f64).collect(),
        DataType::I16 => chunks.map(|c| E::read_i16(c) as f64).collect(),
        DataType::I32 => chunks.map(|c| E::read_i32(c) as f64).collect(),
        DataType::F32 => chunks.map(|c| E::read_f32(c) as f64).collect(),
        DataType::F64 => chunks.map(E::read_f64).collect(),
        DataType::U16 => chunks.map(|c| E::read_u16(c) as f64).collect(),
        DataType::U32 => chunks.map(|c| E::read_u32(c) as f64).collect(),
        DataType::I64 => chunks.map(|c| E::read_i64(c) as f64).collect(),
        DataType::U64 => chunks.map(|c| E::read_u64(c) as f64).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{Endianness, Interleave};
    use std::collections::HashMap;

    /// 2 lines x 3 bands x 4 samples; element value encodes its
    /// coordinates as line*100 + band*10 + sample.
    fn test_metadata(interleave: Interleave, data_type: i32, byte_order: Endianness) -> AcquisitionMetadata {
        AcquisitionMetadata {
            samples: 4,
            lines: 2,
            bands: 3,
            data_type,
            interleave,
            byte_order,
            acquisition_date: None,
            acquisition_start_time: None,
            wavelength_unit: Some("Nanometers".to_string()),
            wavelengths: Some(vec![400.0, 410.0, 420.0]),
            camera_info: HashMap::new(),
        }
    }

    fn element(line: usize, band: usize, sample: usize) -> u16 {
        (line * 100 + band * 10 + sample) as u16
    }

    fn build_cube(interleave: Interleave, big_endian: bool) -> Bytes {
        let (lines, bands, samples) = (2, 3, 4);
        let mut values = Vec::new();
        match interleave {
            Interleave::Bil => {
                for l in 0..lines {
                    for b in 0..bands {
                        for s in 0..samples {
                            values.push(element(l, b, s));
                        }
                    }
                }
            }
            Interleave::Bip => {
                for l in 0..lines {
                    for s in 0..samples {
                        for b in 0..bands {
                            values.push(element(l, b, s));
                        }
                    }
                }
            }
            Interleave::Bsq => {
                for b in 0..bands {
                    for l in 0..lines {
                        for s in 0..samples {
                            values.push(element(l, b, s));
                        }
                    }
                }
            }
        }
        let bytes: Vec<u8> = values
            .iter()
            .flat_map(|&v| {
                if big_endian {
                    v.to_be_bytes()
                } else {
                    v.to_le_bytes()
                }
            })
            .collect();
        Bytes::from(bytes)
    }

    fn assert_frame_values(reader: &mut CubeReader) {
        for line in 0..2 {
            let frame = reader.read_frame(line).unwrap();
            for band in 0..3 {
                for sample in 0..4 {
                    assert_eq!(
                        frame.value(band, sample),
                        Some(element(line, band, sample) as f64),
                        "line {} band {} sample {}",
                        line,
                        band,
                        sample
                    );
                }
            }
        }
    }

    #[test]
    fn test_read_frame_bil() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Little);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bil, false)).unwrap();
        assert_frame_values(&mut reader);
    }

    #[test]
    fn test_read_frame_bip() {
        let meta = test_metadata(Interleave::Bip, 12, Endianness::Little);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bip, false)).unwrap();
        assert_frame_values(&mut reader);
    }

    #[test]
    fn test_read_frame_bsq() {
        let meta = test_metadata(Interleave::Bsq, 12, Endianness::Little);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bsq, false)).unwrap();
        assert_frame_values(&mut reader);
    }

    #[test]
    fn test_big_endian_cube() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Big);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bil, true)).unwrap();
        assert_frame_values(&mut reader);
    }

    #[test]
    fn test_f32_cube() {
        let meta = test_metadata(Interleave::Bil, 4, Endianness::Little);
        let mut values = Vec::new();
        for l in 0..2 {
            for b in 0..3 {
                for s in 0..4 {
                    values.push(element(l, b, s) as f32);
                }
            }
        }
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut reader = CubeReader::from_bytes(meta, Bytes::from(bytes)).unwrap();
        assert_frame_values(&mut reader);
    }

    #[test]
    fn test_size_mismatch() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Little);
        let mut bytes = build_cube(Interleave::Bil, false).to_vec();
        bytes.pop();
        let err = CubeReader::from_bytes(meta, Bytes::from(bytes)).unwrap_err();
        assert!(matches!(
            err,
            CubeError::SizeMismatch { expected: 48, actual: 47 }
        ));
    }

    #[test]
    fn test_header_offset() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Little);
        let mut bytes = vec![0xAB; 16];
        bytes.extend_from_slice(&build_cube(Interleave::Bil, false));
        let config = CubeReaderConfig {
            header_offset_bytes: 16,
        };
        let mut reader =
            CubeReader::from_bytes_with_config(meta, Bytes::from(bytes), config).unwrap();
        assert_frame_values(&mut reader);
    }

    #[test]
    fn test_unknown_data_type() {
        let meta = test_metadata(Interleave::Bil, 6, Endianness::Little);
        let err = CubeReader::from_bytes(meta, build_cube(Interleave::Bil, false)).unwrap_err();
        assert!(matches!(err, CubeError::UnknownDataType(6)));
    }

    #[test]
    fn test_frame_out_of_range() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Little);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bil, false)).unwrap();
        let err = reader.read_frame(2).unwrap_err();
        assert!(matches!(err, CubeError::FrameOutOfRange { index: 2, lines: 2 }));
    }

    #[test]
    fn test_spectrum_at_carries_wavelengths() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Little);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bil, false)).unwrap();
        let curve = reader.spectrum_at(1, 2).unwrap();
        assert_eq!(curve.values, vec![102.0, 112.0, 122.0]);
        assert_eq!(curve.wavelengths, Some(vec![400.0, 410.0, 420.0]));
    }

    #[test]
    fn test_spectrum_sample_out_of_range() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Little);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bil, false)).unwrap();
        let err = reader.spectrum_at(0, 4).unwrap_err();
        assert!(matches!(
            err,
            CubeError::SampleOutOfRange { sample: 4, samples: 4 }
        ));
    }

    #[test]
    fn test_band_slice_matches_frames() {
        for interleave in [Interleave::Bil, Interleave::Bip, Interleave::Bsq] {
            let meta = test_metadata(interleave, 12, Endianness::Little);
            let mut reader =
                CubeReader::from_bytes(meta, build_cube(interleave, false)).unwrap();
            let slice = reader.read_band_slice(1).unwrap();
            assert_eq!(slice.lines(), 2);
            for line in 0..2 {
                let row = slice.row(line).unwrap();
                for sample in 0..4 {
                    assert_eq!(row[sample], element(line, 1, sample) as f64);
                }
            }
        }
    }

    #[test]
    fn test_band_stats() {
        let meta = test_metadata(Interleave::Bil, 12, Endianness::Little);
        let mut reader = CubeReader::from_bytes(meta, build_cube(Interleave::Bil, false)).unwrap();
        let stats = reader.band_stats().unwrap();
        assert_eq!(stats.len(), 3);

        // band 1 holds {10..13, 110..113}
        assert_eq!(stats[1].band, 1);
        assert_eq!(stats[1].min, 10.0);
        assert_eq!(stats[1].max, 113.0);
        assert!((stats[1].mean - 61.5).abs() < 1e-12);
    }
}
