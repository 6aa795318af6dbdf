//! Run-length decoder for the DLZ payload
//!
//! The payload is a byte stream where `0xFF` introduces a three-byte group
//! `0xFF COUNT VALUE`:
//! - `COUNT > 0` expands to `VALUE` repeated `COUNT` times
//! - `COUNT == 0` is the escape for a literal `0xFF` (`VALUE` is filler)
//!
//! Any other byte is a literal. A marker with fewer than two bytes after it is
//! emitted as a literal and ends the stream.

/// Run marker byte
pub const RLE_MARKER: u8 = 0xFF;

/// Decode a run-length encoded byte stream
pub fn rle_decode(data: &[u8]) -> Vec<u8> {
    // Runs only ever expand the stream
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        i += 1;

        if byte != RLE_MARKER {
            out.push(byte);
            continue;
        }

        if i + 1 >= data.len() {
            // Truncated group at end of input
            out.push(byte);
            break;
        }

        let count = data[i] as usize;
        let value = data[i + 1];
        i += 2;

        if count == 0 {
            out.push(RLE_MARKER);
        } else {
            out.resize(out.len() + count, value);
        }
    }

    out
}
