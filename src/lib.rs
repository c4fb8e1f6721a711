//! # speccube - Hyperspectral Acquisition Toolkit
//!
//! `speccube` reads hyperspectral acquisitions stored as a raw binary
//! cube plus a human-readable sidecar header, the layout produced by
//! line-scan hyperspectral cameras and understood by every ENVI-style
//! toolchain.
//!
//! ## Key Features
//!
//! - **Sidecar header parsing**: lenient, order-independent extraction of
//!   acquisition shape, element encoding, wavelength calibration, and
//!   free-form camera configuration, with strict validation of the core
//!   shape fields.
//! - **Raw cube access**: decode any frame as a `bands x samples`
//!   matrix, slice one band across all frames, or pull the spectral
//!   curve of a single spatial position, for all interleaves (`bil`,
//!   `bip`, `bsq`), element encodings, and byte orders.
//! - **Spectral utilities**: one-pass statistics, min-max normalization,
//!   explicit no-data sentinel filtering, CSV export.
//! - **ASCII spectral libraries**: read USGS splib-style reference
//!   spectra for comparison against cube pixels.
//! - **Bundle validation**: structural and data-contract checks with a
//!   human-readable report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use speccube::cube::CubeReader;
//! use speccube::header::AcquisitionMetadata;
//!
//! // Parse a sidecar header on its own...
//! let meta = AcquisitionMetadata::from_file("scan.hdr")?;
//! println!("{} bands, {} lines", meta.bands, meta.lines);
//!
//! // ...or open the whole bundle and read pixels.
//! let mut reader = CubeReader::open("scan.hdr")?;
//! let curve = reader.spectrum_at(0, 192)?;
//! curve.normalized().write_csv(std::io::stdout())?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`header`]: sidecar header parsing and serialization
//! - [`datatype`]: element encoding tags of the raw cube
//! - [`cube`]: frame, band, and spectrum access into the binary cube
//! - [`spectrum`]: curve statistics, normalization, filtering, CSV
//! - [`library`]: ASCII spectral-library reader
//! - [`validator`]: acquisition bundle integrity checks

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod cube;
pub mod datatype;
pub mod header;
pub mod library;
pub mod spectrum;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::cube::{
        BandSlice, BandStats, CubeError, CubeReader, CubeReaderConfig, Frame,
    };
    pub use crate::datatype::DataType;
    pub use crate::header::{
        AcquisitionMetadata, Endianness, HeaderError, Interleave,
    };
    pub use crate::library::{LibraryError, LibrarySpectrum};
    pub use crate::spectrum::{
        normalize_min_max, SentinelFilter, SpectralCurve, SpectralStats, SpectrumError,
        USGS_NO_DATA,
    };
    pub use crate::validator::{validate_acquisition, ValidationReport};
}
