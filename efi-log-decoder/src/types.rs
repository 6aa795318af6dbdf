//! Core types for the EFI datalog decoder library
//!
//! This module defines the values the decoder produces: the format descriptor
//! returned by detection, the decoded sample table, and the error taxonomy.
//! Every type here is a plain value; nothing is shared or mutated after it is
//! handed back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors that can occur during decoding
///
/// All variants except `IoError` are deterministic functions of the input bytes,
/// so retrying the same buffer never helps.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Malformed header: buffer is {len} bytes, at least {required} required")]
    MalformedHeader { len: usize, required: usize },

    #[error("Unknown log format: magic 0x{magic:08X}")]
    UnknownFormat { magic: u32 },

    #[error(
        "Sparse log layout (version field {version_field}) cannot be decoded directly. \
         Open the file in the vendor EFI software first; it converts the log to the \
         full layout, which can then be decoded."
    )]
    UnsupportedSparse { version_field: u32 },

    #[error(
        "Inconsistent length: {len} bytes do not fit data start {data_start} with stride {stride} \
         (remainder {remainder}, tolerance {tolerance})"
    )]
    InconsistentLength {
        data_start: usize,
        stride: usize,
        len: usize,
        remainder: usize,
        tolerance: usize,
    },

    #[error(
        "No plausible data region for {variant} layout in offsets {window_start}..{window_end} \
         (best score {best_score}, minimum {min_score})"
    )]
    LayoutNotFound {
        variant: Variant,
        window_start: usize,
        window_end: usize,
        best_score: u32,
        min_score: u32,
    },

    #[error("Invalid channel map: {0}")]
    InvalidOverlay(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Classified on-disk layout of an expanded log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Legacy/compact layout: 516 floats per row, contiguous channels
    Compact,
    /// Standard "full" layout: 1030 floats per row, interleaved, fixed data start
    Full,
    /// Standard magic with an unrecognised version field; data start found by search
    Heuristic,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Compact => write!(f, "Compact"),
            Variant::Full => write!(f, "Full"),
            Variant::Heuristic => write!(f, "Heuristic"),
        }
    }
}

/// Complete description of where and how samples are stored in a buffer
///
/// Produced once by [`crate::identify`] and never modified afterwards.
/// Invariants: `bytes_per_row == floats_per_row * 4` and
/// `data_start + row_count * bytes_per_row <= buffer_len + bytes_per_row`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    pub(crate) variant: Variant,
    pub(crate) magic: u32,
    pub(crate) version_field: u32,
    pub(crate) floats_per_row: usize,
    pub(crate) bytes_per_row: usize,
    pub(crate) data_start: usize,
    pub(crate) row_count: usize,
    pub(crate) interleaved: bool,
    pub(crate) trailing_bytes: usize,
}

impl FormatDescriptor {
    /// Layout variant tag
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Magic number read at offset 0
    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Raw version-indicator field read at offset 8
    pub fn version_field(&self) -> u32 {
        self.version_field
    }

    /// Number of 4-byte float slots in one row
    pub fn floats_per_row(&self) -> usize {
        self.floats_per_row
    }

    /// Row stride in bytes
    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Byte offset of row 0
    pub fn data_start(&self) -> usize {
        self.data_start
    }

    /// Number of complete rows in the data region
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// True if channel values occupy every second float slot
    pub fn interleaved(&self) -> bool {
        self.interleaved
    }

    /// Bytes after the last complete row (an incomplete trailing row)
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    /// Default number of channel columns for this layout
    pub fn default_channel_count(&self) -> usize {
        if self.interleaved {
            crate::formats::layout_constants::MAX_INTERLEAVED_CHANNELS
        } else {
            self.floats_per_row
        }
    }

    /// Byte offset of a cell, without any bounds check against the buffer
    pub fn cell_offset(&self, row: usize, channel: usize) -> usize {
        let slot = if self.interleaved { channel * 2 } else { channel };
        self.data_start + row * self.bytes_per_row + slot * 4
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (magic 0x{:08X}, version field {}): {} rows x {} floats, data start {}{}",
            self.variant,
            self.magic,
            self.version_field,
            self.row_count,
            self.floats_per_row,
            self.data_start,
            if self.interleaved { ", interleaved" } else { "" }
        )
    }
}

/// Rectangular table of decoded samples
///
/// Cells are stored row-major. `None` marks a cell whose bytes lie past the end
/// of the buffer (an incomplete trailing row), which is expected on disk and
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedTable {
    columns: Vec<String>,
    row_count: usize,
    cells: Vec<Option<f32>>,
}

impl DecodedTable {
    pub(crate) fn new(columns: Vec<String>, row_count: usize, cells: Vec<Option<f32>>) -> Self {
        debug_assert_eq!(cells.len(), columns.len() * row_count);
        Self {
            columns,
            row_count,
            cells,
        }
    }

    /// Number of rows (timesteps)
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of channel columns
    pub fn channel_count(&self) -> usize {
        self.columns.len()
    }

    /// Column identifiers, in slot order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of the column with the given identifier
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A single cell; `None` if missing or out of range
    pub fn get(&self, row: usize, channel: usize) -> Option<f32> {
        if row >= self.row_count || channel >= self.columns.len() {
            return None;
        }
        self.cells[row * self.columns.len() + channel]
    }

    /// All cells of one row, or `None` if the row does not exist
    pub fn row(&self, row: usize) -> Option<&[Option<f32>]> {
        if row >= self.row_count {
            return None;
        }
        let width = self.columns.len();
        Some(&self.cells[row * width..(row + 1) * width])
    }

    /// Iterate over rows
    ///
    /// Always yields `row_count` rows; a table with no columns yields empty
    /// slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<f32>]> {
        let width = self.columns.len();
        (0..self.row_count).map(move |r| &self.cells[r * width..(r + 1) * width])
    }

    /// Iterate over one column's cells
    pub fn column(&self, channel: usize) -> impl Iterator<Item = Option<f32>> + '_ {
        let width = self.columns.len();
        let rows = if channel < width { self.row_count } else { 0 };
        (0..rows).map(move |r| self.cells[r * width + channel])
    }

    /// Iterate over a column looked up by identifier
    pub fn column_by_name(&self, name: &str) -> Option<impl Iterator<Item = Option<f32>> + '_> {
        self.column_index(name).map(|idx| self.column(idx))
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [String] {
        &mut self.columns
    }
}

/// Positional identifier for a channel slot (`Param_007`)
pub fn positional_name(slot: usize) -> String {
    format!("Param_{:03}", slot)
}
