//! Reverse-engineered layout constants
//!
//! None of these values come from a published specification. They were
//! recovered by comparing datalogs against the vendor's CSV exports, and they
//! are collected here so that every classification and layout decision reads
//! from one place. A log that matches none of the known layouts must fail with
//! `UnknownFormat` or `LayoutNotFound` rather than be decoded with a guessed
//! layout.

// Header

/// Smallest buffer that can be classified
pub const HEADER_MIN_LEN: usize = 32;
/// Offset of the u32 magic number
pub const MAGIC_OFFSET: usize = 0;
/// Offset of the u32 version-indicator field
pub const VERSION_FIELD_OFFSET: usize = 8;

/// Magic of the legacy/compact layout
pub const MAGIC_COMPACT: u32 = 0x0095_365F;
/// Magic shared by the standard layouts (sparse, full and unclassified)
pub const MAGIC_STANDARD: u32 = 0x0085_F41F;

/// Version field of the sparse layout, which omits most rows
pub const VERSION_SPARSE: u32 = 5;
/// Version field of the full layout
pub const VERSION_FULL: u32 = 6;

// Rows

/// Float slots per row in the compact layout
pub const COMPACT_FLOATS_PER_ROW: usize = 516;
/// Float slots per row in the standard layouts
pub const STANDARD_FLOATS_PER_ROW: usize = 1030;
/// Channel columns decoded from an interleaved row
pub const MAX_INTERLEAVED_CHANNELS: usize = 516;
/// Largest leftover after the last whole row that is accepted as an
/// incomplete trailing row
pub const ROW_REMAINDER_TOLERANCE: usize = 100;

// Full layout

/// Data start of the full layout
pub const FULL_DATA_START: usize = 16_456;

// Compact layout search

/// First candidate data start for the compact layout
pub const COMPACT_SCAN_START: usize = 1_000;
/// End (exclusive) of the compact data start window
pub const COMPACT_SCAN_END: usize = 5_000;
/// Step between compact candidates
pub const COMPACT_SCAN_STEP: usize = 100;
/// Slot of row 0 that must hold a plausible value
pub const COMPACT_SENTINEL_SLOT: usize = 10;
/// Sentinel plausibility bound (exclusive, on magnitude)
pub const COMPACT_SENTINEL_LIMIT: f32 = 50_000.0;

// Heuristic search for unclassified standard logs

/// First candidate data start for the heuristic search
pub const HEURISTIC_SCAN_START: usize = 15_000;
/// End (exclusive) of the heuristic data start window
pub const HEURISTIC_SCAN_END: usize = 18_000;
/// Step between heuristic candidates
pub const HEURISTIC_SCAN_STEP: usize = 4;
/// Rows scored per candidate
pub const HEURISTIC_SCORE_ROWS: usize = 10;
/// Leading channel slots scored per row
pub const HEURISTIC_SCORE_CHANNELS: usize = 20;
/// A row counts only if at least this many of its scored slots are sensor-like
pub const HEURISTIC_MIN_ROW_HITS: u32 = 3;
/// Lowest total score that is accepted
pub const HEURISTIC_MIN_SCORE: u32 = 20;

/// Magnitude bounds (exclusive) of a sensor-like value
pub const SENSOR_MIN_MAGNITUDE: f32 = 0.01;
pub const SENSOR_MAX_MAGNITUDE: f32 = 10_000.0;
/// Magnitudes at or above this look like uninitialised memory or overflow
pub const OVERFLOW_MAGNITUDE: f32 = 1.0e10;

/// Channel holding engine speed
pub const ENGINE_SPEED_CHANNEL: usize = 2;
/// Engine speed plausibility bounds (exclusive)
pub const ENGINE_SPEED_MIN: f32 = 300.0;
pub const ENGINE_SPEED_MAX: f32 = 10_000.0;
/// Score added for each row with a plausible engine speed
pub const ENGINE_SPEED_BONUS: u32 = 2;

/// Channel holding throttle position, a percentage
pub const THROTTLE_CHANNEL: usize = 33;
/// Throttle plausibility bounds (inclusive)
pub const THROTTLE_MIN: f32 = 0.0;
pub const THROTTLE_MAX: f32 = 100.0;
