//! Lightweight inspection of a DLZ container without expanding it

use crate::formats::header::read_u32_le;
use crate::formats::layout_constants::{HEADER_MIN_LEN, MAGIC_COMPACT, MAGIC_STANDARD};
use crate::types::{DecoderError, Result};
use serde::Serialize;

use super::rle::RLE_MARKER;

/// Embedded text (the tune name) is searched for in this byte range
const TEXT_SEARCH_START: usize = 32;
const TEXT_SEARCH_END: usize = 200;
const TEXT_MIN_LEN: usize = 4;

/// Summary of a compressed container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    /// Container size in bytes
    pub size: usize,
    /// Magic number (shared with the expanded form)
    pub magic: u32,
    /// Number of run markers, a rough indicator of compression ratio
    pub marker_count: usize,
    /// First printable ASCII run in the early payload, usually the tune name
    pub embedded_text: Option<String>,
}

/// Check the container header and gather summary information
pub fn inspect_container(data: &[u8]) -> Result<ContainerSummary> {
    if data.len() < HEADER_MIN_LEN {
        return Err(DecoderError::MalformedHeader {
            len: data.len(),
            required: HEADER_MIN_LEN,
        });
    }

    let magic = read_u32_le(data, 0);
    if magic != MAGIC_COMPACT && magic != MAGIC_STANDARD {
        return Err(DecoderError::UnknownFormat { magic });
    }

    let marker_count = data.iter().filter(|&&b| b == RLE_MARKER).count();

    Ok(ContainerSummary {
        size: data.len(),
        magic,
        marker_count,
        embedded_text: find_embedded_text(data),
    })
}

fn is_printable(b: u8) -> bool {
    (32..127).contains(&b)
}

fn find_embedded_text(data: &[u8]) -> Option<String> {
    let search_end = TEXT_SEARCH_END.min(data.len().saturating_sub(TEXT_MIN_LEN));

    (TEXT_SEARCH_START..search_end)
        .find(|&start| data[start..start + TEXT_MIN_LEN].iter().all(|&b| is_printable(b)))
        .map(|start| {
            let end = data[start..]
                .iter()
                .position(|&b| !is_printable(b))
                .map_or(data.len(), |len| start + len);
            String::from_utf8_lossy(&data[start..end]).into_owned()
        })
}
