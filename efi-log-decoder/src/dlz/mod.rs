//! DLZ compressed container support
//!
//! A DLZ file is a DL file that was byte-swapped per 4-byte group, run-length
//! encoded, and byte-swapped again. The run-length scheme operates on the
//! big-endian view of each word while the file is stored little-endian, so
//! expansion must run swap → RLE decode → swap in exactly that order. Any other
//! order produces a buffer of the right shape with every float corrupted.

mod byteswap;
mod inspect;
mod rle;

pub use byteswap::byte_swap;
pub use inspect::{inspect_container, ContainerSummary};
pub use rle::{rle_decode, RLE_MARKER};

/// Expand a DLZ container into the DL byte layout
///
/// Total over all inputs, including empty ones.
pub fn decompress(compressed: &[u8]) -> Vec<u8> {
    let swapped = byte_swap(compressed);
    let expanded = rle_decode(&swapped);
    let output = byte_swap(&expanded);

    log::debug!(
        "Decompressed {} bytes to {} bytes",
        compressed.len(),
        output.len()
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compressed form of GOLDEN_EXPANDED: a zero run, a 0x41 run, three
    // literals and an escaped 0xFF, with a trailing partial swap group.
    const GOLDEN_COMPRESSED: [u8; 16] = [
        0x1F, 0xF4, 0x85, 0x00, 0xFF, 0x00, 0x08, 0xFF, 0x80, 0x3F, 0x41, 0x04, 0x00, 0x00,
        0xFF, 0x00,
    ];

    const GOLDEN_EXPANDED: [u8; 20] = [
        0x1F, 0xF4, 0x85, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x41, 0x41,
        0x41, 0x41, 0xFF, 0x00, 0x80, 0x3F,
    ];

    #[test]
    fn test_decompress_golden_fixture() {
        assert_eq!(decompress(&GOLDEN_COMPRESSED), GOLDEN_EXPANDED.to_vec());
    }

    #[test]
    fn test_decompress_empty() {
        assert!(decompress(&[]).is_empty());
    }

    #[test]
    fn test_decompress_without_markers_is_identity() {
        let data: Vec<u8> = (0u8..64).collect();
        assert_eq!(decompress(&data), data);
    }

    #[test]
    fn test_stage_order_matters() {
        // Decoding without the surrounding swaps reads the run markers from the
        // wrong byte positions.
        let unswapped = byte_swap(&rle_decode(&GOLDEN_COMPRESSED));
        assert_ne!(unswapped, GOLDEN_EXPANDED.to_vec());
    }
}
