//! Fixed header fields
//!
//! Bounds-checked little-endian reads shared by the detector, the layout
//! resolver and the table decoder, plus a diagnostic dump of the leading
//! header words.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use std::fmt;

use super::layout_constants::HEADER_MIN_LEN;
use crate::types::{DecoderError, Result};

/// Read a u32 at `offset`. Caller guarantees `offset + 4 <= data.len()`.
pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    LittleEndian::read_u32(&data[offset..offset + 4])
}

/// Read an f32 at `offset`, or `None` if the 4 bytes are not all in the buffer
pub(crate) fn read_f32_le(data: &[u8], offset: usize) -> Option<f32> {
    let end = offset.checked_add(4)?;
    data.get(offset..end).map(LittleEndian::read_f32)
}

/// One 4-byte header word
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeaderField {
    pub offset: usize,
    pub raw: u32,
}

impl HeaderField {
    pub fn as_u32(&self) -> u32 {
        self.raw
    }

    pub fn as_i32(&self) -> i32 {
        self.raw as i32
    }

    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.raw)
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.raw.to_le_bytes();
        write!(
            f,
            "offset {:3}: {:02x} {:02x} {:02x} {:02x} | uint {:12} int {:12} float {:14.4}",
            self.offset,
            bytes[0],
            bytes[1],
            bytes[2],
            bytes[3],
            self.as_u32(),
            self.as_i32(),
            self.as_f32()
        )
    }
}

/// The eight leading header words, for diagnostics
///
/// Only the magic (offset 0) and the version field (offset 8) drive
/// classification; the rest are shown so unknown logs can be compared by eye.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderFields {
    fields: Vec<HeaderField>,
}

impl HeaderFields {
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_MIN_LEN {
            return Err(DecoderError::MalformedHeader {
                len: data.len(),
                required: HEADER_MIN_LEN,
            });
        }

        let fields = (0..HEADER_MIN_LEN)
            .step_by(4)
            .map(|offset| HeaderField {
                offset,
                raw: read_u32_le(data, offset),
            })
            .collect();

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[HeaderField] {
        &self.fields
    }

    /// Field at a byte offset, if it is one of the leading words
    pub fn at(&self, offset: usize) -> Option<&HeaderField> {
        self.fields.iter().find(|f| f.offset == offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_helpers() {
        let mut data = 0x0085_F41Fu32.to_le_bytes().to_vec();
        data.extend_from_slice(&2500.0f32.to_le_bytes());

        assert_eq!(read_u32_le(&data, 0), 0x0085_F41F);
        assert_eq!(read_f32_le(&data, 4), Some(2500.0));
        assert_eq!(read_f32_le(&data, 5), None);
        assert_eq!(read_f32_le(&data, usize::MAX - 1), None);
    }

    #[test]
    fn test_header_fields() {
        let mut data = vec![0u8; 40];
        data[8..12].copy_from_slice(&6u32.to_le_bytes());
        data[12..16].copy_from_slice(&1.5f32.to_le_bytes());
        data[16..20].copy_from_slice(&(-3i32).to_le_bytes());

        let header = HeaderFields::read(&data).unwrap();
        assert_eq!(header.fields().len(), 8);
        assert_eq!(header.at(8).unwrap().as_u32(), 6);
        assert_eq!(header.at(12).unwrap().as_f32(), 1.5);
        assert_eq!(header.at(16).unwrap().as_i32(), -3);
        assert!(header.at(32).is_none());

        let line = header.at(8).unwrap().to_string();
        assert!(line.contains("06 00 00 00"));
    }

    #[test]
    fn test_header_fields_short_buffer() {
        assert!(matches!(
            HeaderFields::read(&[0u8; 31]),
            Err(DecoderError::MalformedHeader { len: 31, .. })
        ));
    }
}
