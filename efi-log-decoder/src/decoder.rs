//! Main decoder API
//!
//! This module provides the primary interface for the decoder library:
//! buffer-level entry points (`decompress`, `identify`, `decode`) and
//! [`LogFile`], which reads a file from disk and runs the whole pipeline.

use crate::config::{ContainerKind, DecoderConfig};
use crate::formats::{detect, layout};
use crate::signals::ChannelMap;
use crate::table_decoder::TableDecoder;
use crate::types::{DecodedTable, FormatDescriptor, Result};
use std::path::{Path, PathBuf};

pub use crate::dlz::decompress;

/// Classify an expanded buffer and resolve its row layout
///
/// Deterministic: the same bytes always produce the same descriptor.
///
/// # Errors
/// `MalformedHeader`, `UnknownFormat` and `UnsupportedSparse` from detection;
/// `InconsistentLength` and `LayoutNotFound` from layout resolution.
///
/// # Example
/// ```no_run
/// use efi_log_decoder::identify;
///
/// let data = std::fs::read("run.dl").unwrap();
/// let descriptor = identify(&data).unwrap();
/// println!("{} rows", descriptor.row_count());
/// ```
pub fn identify(data: &[u8]) -> Result<FormatDescriptor> {
    let class = detect::classify(data)?;
    layout::resolve(data, &class)
}

/// Decode the samples of an expanded buffer into a table
///
/// `descriptor` must come from [`identify`] on the same buffer (or a longer
/// buffer with the same prefix); cells beyond the end of `data` come back as
/// missing. `names` only renames columns.
pub fn decode(
    data: &[u8],
    descriptor: &FormatDescriptor,
    names: Option<&ChannelMap>,
) -> DecodedTable {
    TableDecoder::decode(data, descriptor, names)
}

/// A log loaded into memory, expanded and identified
///
/// The file is read once in [`LogFile::open`]; decoding works on the in-memory
/// buffer.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: Option<PathBuf>,
    container: ContainerKind,
    data: Vec<u8>,
    descriptor: FormatDescriptor,
    config: DecoderConfig,
}

impl LogFile {
    /// Read, expand (if compressed) and identify a log file
    ///
    /// # Example
    /// ```no_run
    /// use efi_log_decoder::{DecoderConfig, LogFile};
    /// use std::path::Path;
    ///
    /// let log = LogFile::open(Path::new("run.dlz"), &DecoderConfig::new()).unwrap();
    /// let table = log.decode(None);
    /// println!("{} x {}", table.row_count(), table.channel_count());
    /// ```
    pub fn open(path: &Path, config: &DecoderConfig) -> Result<Self> {
        log::info!("Opening log file: {:?}", path);

        let bytes = std::fs::read(path)?;
        let container = config.container.for_path(path);

        let mut log_file = Self::from_bytes(bytes, container, config)?;
        log_file.path = Some(path.to_path_buf());

        log::info!("Identified {:?}: {}", path, log_file.descriptor);
        Ok(log_file)
    }

    /// Expand (if compressed) and identify an in-memory log
    ///
    /// `ContainerKind::Auto` has no extension to go on here and is treated as
    /// expanded.
    pub fn from_bytes(bytes: Vec<u8>, container: ContainerKind, config: &DecoderConfig) -> Result<Self> {
        let (container, data) = match container {
            ContainerKind::Compressed => (ContainerKind::Compressed, decompress(&bytes)),
            ContainerKind::Expanded | ContainerKind::Auto => (ContainerKind::Expanded, bytes),
        };

        let descriptor = identify(&data)?;

        Ok(Self {
            path: None,
            container,
            data,
            descriptor,
            config: config.clone(),
        })
    }

    /// Decode the table, applying the configured row/channel caps
    pub fn decode(&self, names: Option<&ChannelMap>) -> DecodedTable {
        TableDecoder::decode_with_limits(&self.data, &self.descriptor, names, self.config.limits())
    }

    /// Path the log was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Resolved layout
    pub fn descriptor(&self) -> &FormatDescriptor {
        &self.descriptor
    }

    /// Expanded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Container form the file was read as (never `Auto`)
    pub fn container(&self) -> ContainerKind {
        self.container
    }

    pub fn was_compressed(&self) -> bool {
        self.container == ContainerKind::Compressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlz::byte_swap;
    use crate::formats::layout_constants::{FULL_DATA_START, MAGIC_STANDARD};
    use crate::types::{DecoderError, Variant};

    /// Full-layout log with `rows` rows; every channel slot holds its row index
    fn full_log(rows: usize) -> Vec<u8> {
        let mut data = vec![0u8; FULL_DATA_START + rows * 4120];
        data[0..4].copy_from_slice(&MAGIC_STANDARD.to_le_bytes());
        data[8..12].copy_from_slice(&6u32.to_le_bytes());
        for row in 0..rows {
            let base = FULL_DATA_START + row * 4120;
            for channel in 0..515 {
                let at = base + channel * 8;
                data[at..at + 4].copy_from_slice(&(row as f32).to_le_bytes());
            }
        }
        data
    }

    /// Compress without runs: escape every 0xFF, then apply the swaps
    fn compress_literal(expanded: &[u8]) -> Vec<u8> {
        let swapped = byte_swap(expanded);
        let mut encoded = Vec::new();
        for &b in &swapped {
            if b == 0xFF {
                encoded.extend_from_slice(&[0xFF, 0x00, 0x00]);
            } else {
                encoded.push(b);
            }
        }
        byte_swap(&encoded)
    }

    #[test]
    fn test_identify_is_deterministic() {
        let data = full_log(2);
        assert_eq!(identify(&data).unwrap(), identify(&data).unwrap());
    }

    #[test]
    fn test_identify_short_buffer() {
        assert!(matches!(
            identify(&[0u8; 8]),
            Err(DecoderError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_log_file_open_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.dl");
        std::fs::write(&path, full_log(3)).unwrap();

        let log = LogFile::open(&path, &DecoderConfig::new()).unwrap();
        assert!(!log.was_compressed());
        assert_eq!(log.path(), Some(path.as_path()));
        assert_eq!(log.descriptor().variant(), Variant::Full);

        let table = log.decode(None);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get(2, 100), Some(2.0));
    }

    #[test]
    fn test_log_file_open_compressed() {
        let expanded = full_log(2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.dlz");
        std::fs::write(&path, compress_literal(&expanded)).unwrap();

        let log = LogFile::open(&path, &DecoderConfig::new()).unwrap();
        assert!(log.was_compressed());
        assert_eq!(log.data(), expanded.as_slice());
        assert_eq!(log.descriptor().row_count(), 2);
    }

    #[test]
    fn test_log_file_applies_limits() {
        let config = DecoderConfig::new().with_max_rows(1).with_channel_limit(4);
        let log = LogFile::from_bytes(full_log(3), ContainerKind::Expanded, &config).unwrap();

        let table = log.decode(None);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.channel_count(), 4);
    }

    #[test]
    fn test_log_file_missing() {
        let result = LogFile::open(Path::new("nonexistent.dl"), &DecoderConfig::new());
        assert!(matches!(result, Err(DecoderError::IoError(_))));
    }
}
