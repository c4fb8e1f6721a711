//! Numeric encoding tags for raw cube elements.
//!
//! Sidecar headers carry a `data type` integer that names the on-disk
//! element encoding of the companion binary cube. The tag values follow the
//! ENVI convention, which every hyperspectral toolchain understands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element encoding of a raw data cube.
///
/// Complex encodings (tags 6 and 9) are not representable; acquisition
/// cubes are real-valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Unsigned 8-bit integer (tag 1)
    U8,
    /// Signed 16-bit integer (tag 2)
    I16,
    /// Signed 32-bit integer (tag 3)
    I32,
    /// 32-bit IEEE float (tag 4)
    F32,
    /// 64-bit IEEE float (tag 5)
    F64,
    /// Unsigned 16-bit integer (tag 12)
    U16,
    /// Unsigned 32-bit integer (tag 13)
    U32,
    /// Signed 64-bit integer (tag 14)
    I64,
    /// Unsigned 64-bit integer (tag 15)
    U64,
}

impl DataType {
    /// Resolve a header `data type` tag, if it names a supported encoding.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            1 => Some(DataType::U8),
            2 => Some(DataType::I16),
            3 => Some(DataType::I32),
            4 => Some(DataType::F32),
            5 => Some(DataType::F64),
            12 => Some(DataType::U16),
            13 => Some(DataType::U32),
            14 => Some(DataType::I64),
            15 => Some(DataType::U64),
            _ => None,
        }
    }

    /// The integer tag written into headers for this encoding.
    pub fn tag(&self) -> i32 {
        match self {
            DataType::U8 => 1,
            DataType::I16 => 2,
            DataType::I32 => 3,
            DataType::F32 => 4,
            DataType::F64 => 5,
            DataType::U16 => 12,
            DataType::U32 => 13,
            DataType::I64 => 14,
            DataType::U64 => 15,
        }
    }

    /// Size in bytes of one stored element.
    pub fn size_bytes(&self) -> usize {
        match self {
            DataType::U8 => 1,
            DataType::I16 | DataType::U16 => 2,
            DataType::I32 | DataType::U32 | DataType::F32 => 4,
            DataType::F64 | DataType::I64 | DataType::U64 => 8,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::U8 => "u8",
            DataType::I16 => "i16",
            DataType::I32 => "i32",
            DataType::F32 => "f32",
            DataType::F64 => "f64",
            DataType::U16 => "u16",
            DataType::U32 => "u32",
            DataType::I64 => "i64",
            DataType::U64 => "u64",
        };
        write!(f, "{} (tag {})", name, self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for tag in [1, 2, 3, 4, 5, 12, 13, 14, 15] {
            let dt = DataType::from_tag(tag).unwrap();
            assert_eq!(dt.tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(DataType::from_tag(0), None);
        assert_eq!(DataType::from_tag(6), None); // complex
        assert_eq!(DataType::from_tag(9), None); // double complex
        assert_eq!(DataType::from_tag(99), None);
    }

    #[test]
    fn test_element_sizes() {
        assert_eq!(DataType::U8.size_bytes(), 1);
        assert_eq!(DataType::U16.size_bytes(), 2);
        assert_eq!(DataType::F32.size_bytes(), 4);
        assert_eq!(DataType::F64.size_bytes(), 8);
    }
}
