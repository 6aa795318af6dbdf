//! Row layout resolution
//!
//! Turns a header classification into a complete [`FormatDescriptor`]: where
//! row 0 starts, the row stride, how many complete rows follow, and whether
//! channels are interleaved with filler slots.
//!
//! ## Layouts
//! - **Compact**: fixed stride, data start found by scanning a low-offset window
//!   in steps of 100 bytes. The first candidate whose length fits the stride and
//!   whose sentinel value is plausible wins.
//! - **Full**: fixed stride and data start; the length must fit the stride.
//! - **Heuristic**: fixed stride, data start found by scoring every 4-byte
//!   aligned candidate in a bounded window by how sensor-like its values look.
//!   Candidates whose first row fails the throttle check or does not look like
//!   sensor data are skipped. The highest score wins, ties go to the lowest
//!   offset.
//!
//! All search windows are constants, so resolution time is bounded regardless
//! of the buffer size.

use super::detect::Classification;
use super::header::read_f32_le;
use super::layout_constants::*;
use crate::types::{DecoderError, FormatDescriptor, Result, Variant};

/// Resolve the row layout for a classified buffer
pub fn resolve(data: &[u8], class: &Classification) -> Result<FormatDescriptor> {
    let descriptor = match class.variant {
        Variant::Compact => resolve_compact(data, class)?,
        Variant::Full => resolve_full(data, class)?,
        Variant::Heuristic => resolve_heuristic(data, class)?,
    };

    if descriptor.trailing_bytes > 0 {
        log::warn!(
            "Log has an incomplete trailing row ({} bytes after row {})",
            descriptor.trailing_bytes,
            descriptor.row_count
        );
    }

    log::debug!("Resolved layout: {}", descriptor);
    Ok(descriptor)
}

/// Candidate descriptor for a data start. Caller guarantees `data_start <= len`.
fn candidate(
    class: &Classification,
    len: usize,
    data_start: usize,
    floats_per_row: usize,
    interleaved: bool,
) -> FormatDescriptor {
    let bytes_per_row = floats_per_row * 4;
    let data_size = len - data_start;

    FormatDescriptor {
        variant: class.variant,
        magic: class.magic,
        version_field: class.version_field,
        floats_per_row,
        bytes_per_row,
        data_start,
        row_count: data_size / bytes_per_row,
        interleaved,
        trailing_bytes: data_size % bytes_per_row,
    }
}

fn fits_stride(descriptor: &FormatDescriptor) -> bool {
    descriptor.trailing_bytes < ROW_REMAINDER_TOLERANCE
}

fn resolve_compact(data: &[u8], class: &Classification) -> Result<FormatDescriptor> {
    for start in (COMPACT_SCAN_START..COMPACT_SCAN_END).step_by(COMPACT_SCAN_STEP) {
        if start > data.len() {
            break;
        }

        let probe = candidate(class, data.len(), start, COMPACT_FLOATS_PER_ROW, false);
        if !fits_stride(&probe) {
            continue;
        }

        let sentinel = read_f32_le(data, probe.cell_offset(0, COMPACT_SENTINEL_SLOT));
        match sentinel {
            Some(v) if v.abs() < COMPACT_SENTINEL_LIMIT => return Ok(probe),
            _ => log::trace!("Compact candidate {} rejected: sentinel {:?}", start, sentinel),
        }
    }

    // The compact search is pass/fail, reported as a score of 0 against 1
    Err(DecoderError::LayoutNotFound {
        variant: Variant::Compact,
        window_start: COMPACT_SCAN_START,
        window_end: COMPACT_SCAN_END,
        best_score: 0,
        min_score: 1,
    })
}

fn resolve_full(data: &[u8], class: &Classification) -> Result<FormatDescriptor> {
    let stride = STANDARD_FLOATS_PER_ROW * 4;

    if data.len() < FULL_DATA_START {
        return Err(DecoderError::InconsistentLength {
            data_start: FULL_DATA_START,
            stride,
            len: data.len(),
            remainder: 0,
            tolerance: ROW_REMAINDER_TOLERANCE,
        });
    }

    let descriptor = candidate(
        class,
        data.len(),
        FULL_DATA_START,
        STANDARD_FLOATS_PER_ROW,
        true,
    );

    if !fits_stride(&descriptor) {
        return Err(DecoderError::InconsistentLength {
            data_start: FULL_DATA_START,
            stride,
            len: data.len(),
            remainder: descriptor.trailing_bytes,
            tolerance: ROW_REMAINDER_TOLERANCE,
        });
    }

    Ok(descriptor)
}

fn resolve_heuristic(data: &[u8], class: &Classification) -> Result<FormatDescriptor> {
    let mut best: Option<FormatDescriptor> = None;
    let mut best_score = 0;

    for start in (HEURISTIC_SCAN_START..HEURISTIC_SCAN_END).step_by(HEURISTIC_SCAN_STEP) {
        if start > data.len() {
            break;
        }

        let probe = candidate(class, data.len(), start, STANDARD_FLOATS_PER_ROW, true);
        if probe.row_count == 0 || !fits_stride(&probe) {
            continue;
        }

        if !throttle_plausible(data, &probe) {
            log::trace!("Heuristic candidate {} rejected by throttle check", start);
            continue;
        }

        let score = score_candidate(data, &probe);
        log::trace!("Heuristic candidate {} scored {}", start, score);

        // Strictly greater keeps the lowest offset on ties
        if score > best_score {
            best_score = score;
            best = Some(probe);
        }
    }

    match best {
        Some(descriptor) if best_score >= HEURISTIC_MIN_SCORE => {
            log::debug!(
                "Heuristic search accepted data start {} with score {}",
                descriptor.data_start,
                best_score
            );
            Ok(descriptor)
        }
        _ => Err(DecoderError::LayoutNotFound {
            variant: Variant::Heuristic,
            window_start: HEURISTIC_SCAN_START,
            window_end: HEURISTIC_SCAN_END,
            best_score,
            min_score: HEURISTIC_MIN_SCORE,
        }),
    }
}

/// Throttle position of row 0 must be a percentage
fn throttle_plausible(data: &[u8], probe: &FormatDescriptor) -> bool {
    read_f32_le(data, probe.cell_offset(0, THROTTLE_CHANNEL))
        .map_or(false, |tps| (THROTTLE_MIN..=THROTTLE_MAX).contains(&tps))
}

/// Score the leading rows of a candidate. Row 0 must look like sensor data:
/// a start that lands in the header or filler before the data region scores
/// 0 even when the later rows line up.
fn score_candidate(data: &[u8], probe: &FormatDescriptor) -> u32 {
    let rows = probe.row_count.min(HEURISTIC_SCORE_ROWS);
    let mut score = 0;

    for row in 0..rows {
        let values: Vec<f32> = (0..HEURISTIC_SCORE_CHANNELS)
            .filter_map(|channel| read_f32_le(data, probe.cell_offset(row, channel)))
            .collect();
        let row_score = score_row(&values);
        if row == 0 && row_score == 0 {
            return 0;
        }
        score += row_score;

        let rpm = read_f32_le(data, probe.cell_offset(row, ENGINE_SPEED_CHANNEL));
        if rpm.map_or(false, |v| v > ENGINE_SPEED_MIN && v < ENGINE_SPEED_MAX) {
            score += ENGINE_SPEED_BONUS;
        }
    }

    score
}

/// Number of sensor-like values in a row, or 0 if the row looks like filler,
/// blank memory, or garbage
fn score_row(values: &[f32]) -> u32 {
    let sensor_like = values
        .iter()
        .filter(|v| {
            let m = v.abs();
            m > SENSOR_MIN_MAGNITUDE && m < SENSOR_MAX_MAGNITUDE
        })
        .count() as u32;
    let zeros = values.iter().filter(|&&v| v == 0.0).count();
    // NaN fails the comparison and counts as extreme
    let extreme = values.iter().filter(|v| !(v.abs() < OVERFLOW_MAGNITUDE)).count();

    if sensor_like >= HEURISTIC_MIN_ROW_HITS && zeros + 2 <= values.len() && extreme == 0 {
        sensor_like
    } else {
        0
    }
}
