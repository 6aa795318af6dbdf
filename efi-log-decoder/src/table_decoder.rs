//! Table Decoding Engine
//!
//! Walks the data region described by a [`FormatDescriptor`] and materialises
//! one row per timestep and one column per channel slot. Values are the raw
//! little-endian floats; no scaling, rounding or clamping is applied.

use crate::formats::header::read_f32_le;
use crate::signals::ChannelMap;
use crate::types::{positional_name, DecodedTable, FormatDescriptor};

/// Limits applied while decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableLimits {
    /// Cap on the number of channel columns (never raises the layout default)
    pub channel_limit: Option<usize>,
    /// Cap on the number of rows
    pub max_rows: Option<usize>,
}

/// Table decoder - extracts channel samples from an expanded buffer
pub struct TableDecoder;

impl TableDecoder {
    /// Decode every row and the default channel set of a layout
    ///
    /// # Arguments
    /// * `data` - Expanded buffer the descriptor was resolved from
    /// * `descriptor` - Layout returned by [`crate::identify`]
    /// * `names` - Optional overlay naming channel slots
    pub fn decode(
        data: &[u8],
        descriptor: &FormatDescriptor,
        names: Option<&ChannelMap>,
    ) -> DecodedTable {
        Self::decode_with_limits(data, descriptor, names, TableLimits::default())
    }

    /// Decode with row and channel caps
    pub fn decode_with_limits(
        data: &[u8],
        descriptor: &FormatDescriptor,
        names: Option<&ChannelMap>,
        limits: TableLimits,
    ) -> DecodedTable {
        let default_channels = descriptor.default_channel_count();
        let channel_count = limits
            .channel_limit
            .map_or(default_channels, |limit| limit.min(default_channels));
        let row_count = limits
            .max_rows
            .map_or(descriptor.row_count(), |limit| limit.min(descriptor.row_count()));

        let mut cells = Vec::with_capacity(row_count * channel_count);
        for row in 0..row_count {
            for channel in 0..channel_count {
                // Cells past the end of the buffer are missing, not errors
                cells.push(read_f32_le(data, descriptor.cell_offset(row, channel)));
            }
        }

        let columns = (0..channel_count).map(positional_name).collect();
        let mut table = DecodedTable::new(columns, row_count, cells);

        let missing = table.missing_count();
        if missing > 0 {
            log::debug!("{} cells past the end of the buffer recorded as missing", missing);
        }

        if let Some(names) = names {
            names.apply(&mut table);
        }

        table
    }
}
