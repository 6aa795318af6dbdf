//! Format detection
//!
//! Classifies an expanded buffer from its magic number and version field.
//! Detection is a single pure decision over the first header bytes; it never
//! looks at the data region. Locating the data region is the job of the
//! layout resolver.

use super::header::read_u32_le;
use super::layout_constants::{
    HEADER_MIN_LEN, MAGIC_COMPACT, MAGIC_OFFSET, MAGIC_STANDARD, VERSION_FIELD_OFFSET,
    VERSION_FULL, VERSION_SPARSE,
};
use crate::types::{DecoderError, Result, Variant};

/// Outcome of header classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub variant: Variant,
    pub magic: u32,
    pub version_field: u32,
}

/// Classify a buffer by its header
///
/// # Errors
/// * `MalformedHeader` - fewer than 32 bytes
/// * `UnknownFormat` - unrecognised magic
/// * `UnsupportedSparse` - standard magic with the sparse version field
pub fn classify(data: &[u8]) -> Result<Classification> {
    if data.len() < HEADER_MIN_LEN {
        return Err(DecoderError::MalformedHeader {
            len: data.len(),
            required: HEADER_MIN_LEN,
        });
    }

    let magic = read_u32_le(data, MAGIC_OFFSET);
    let version_field = read_u32_le(data, VERSION_FIELD_OFFSET);

    let variant = match (magic, version_field) {
        (MAGIC_COMPACT, _) => Variant::Compact,
        (MAGIC_STANDARD, VERSION_FULL) => Variant::Full,
        (MAGIC_STANDARD, VERSION_SPARSE) => {
            return Err(DecoderError::UnsupportedSparse { version_field });
        }
        (MAGIC_STANDARD, _) => Variant::Heuristic,
        _ => return Err(DecoderError::UnknownFormat { magic }),
    };

    log::debug!(
        "Classified log: magic 0x{:08X}, version field {} -> {}",
        magic,
        version_field,
        variant
    );

    Ok(Classification {
        variant,
        magic,
        version_field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(magic: u32, version_field: u32) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_MIN_LEN];
        data[0..4].copy_from_slice(&magic.to_le_bytes());
        data[8..12].copy_from_slice(&version_field.to_le_bytes());
        data
    }

    #[test]
    fn test_compact_ignores_version_field() {
        for version in [0, 2, 3, 6] {
            let class = classify(&header(MAGIC_COMPACT, version)).unwrap();
            assert_eq!(class.variant, Variant::Compact);
            assert_eq!(class.version_field, version);
        }
    }

    #[test]
    fn test_full_layout() {
        let class = classify(&header(MAGIC_STANDARD, 6)).unwrap();
        assert_eq!(class.variant, Variant::Full);
        assert_eq!(class.magic, MAGIC_STANDARD);
    }

    #[test]
    fn test_sparse_is_fatal() {
        assert!(matches!(
            classify(&header(MAGIC_STANDARD, 5)),
            Err(DecoderError::UnsupportedSparse { version_field: 5 })
        ));
    }

    #[test]
    fn test_other_versions_fall_back_to_heuristic() {
        for version in [0, 4, 7, u32::MAX] {
            let class = classify(&header(MAGIC_STANDARD, version)).unwrap();
            assert_eq!(class.variant, Variant::Heuristic);
        }
    }

    #[test]
    fn test_unknown_magic() {
        assert!(matches!(
            classify(&header(0x4C4F_4721, 6)),
            Err(DecoderError::UnknownFormat { magic: 0x4C4F_4721 })
        ));
    }

    #[test]
    fn test_short_buffer() {
        let data = header(MAGIC_STANDARD, 6);
        assert!(matches!(
            classify(&data[..31]),
            Err(DecoderError::MalformedHeader { len: 31, required: 32 })
        ));
        assert!(matches!(
            classify(&[]),
            Err(DecoderError::MalformedHeader { len: 0, .. })
        ));
    }
}
