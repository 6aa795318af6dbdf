//! 4-byte group reversal
//!
//! `[A, B, C, D] -> [D, C, B, A]` for every complete group; a trailing group of
//! fewer than 4 bytes is copied unchanged. Applying the transform twice yields
//! the original input.

/// Reverse every complete 4-byte group of `data`
pub fn byte_swap(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut groups = data.chunks_exact(4);

    for group in &mut groups {
        out.extend(group.iter().rev());
    }
    out.extend_from_slice(groups.remainder());

    out
}
