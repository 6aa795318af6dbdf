//! EFI Datalog Decoder Library
//!
//! A stateless library for decoding binary datalogs written by an engine
//! control unit: the compressed DLZ container and the expanded DL table of
//! little-endian floats.
//!
//! # Architecture
//!
//! Data flows through the pipeline in one direction:
//! - `decompress`: byte swap → run-length decode → byte swap (DLZ → DL)
//! - `identify`: header classification, then row layout resolution
//! - `decode`: walks the data region and produces a [`DecodedTable`]
//!
//! Every step is a pure function of its input bytes, so separate buffers can be
//! decoded on separate threads without coordination.
//!
//! The library does NOT:
//! - Compress logs back into DLZ form
//! - Know channel names (an optional [`ChannelMap`] overlay supplies them)
//! - Guess at layouts it does not recognise; unknown logs fail closed
//!
//! File selection, export formats and batch processing live in the
//! application layer (efi-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use efi_log_decoder::{ChannelMap, DecoderConfig, LogFile};
//! use std::path::Path;
//!
//! let log = LogFile::open(Path::new("pass1.dlz"), &DecoderConfig::new()).unwrap();
//! println!("Layout: {}", log.descriptor());
//!
//! let names = ChannelMap::common();
//! let table = log.decode(Some(&names));
//!
//! if let Some(rpm) = table.column_by_name("RPM") {
//!     let peak = rpm.flatten().fold(f32::MIN, f32::max);
//!     println!("Peak RPM: {}", peak);
//! };
//! ```

// Public modules
pub mod config;
pub mod decoder;
pub mod dlz;
pub mod formats;
pub mod signals;
pub mod table_decoder;
pub mod types;

// Re-export main types for convenience
pub use config::{ContainerKind, DecoderConfig};
pub use decoder::{decode, decompress, identify, LogFile};
pub use dlz::{inspect_container, ContainerSummary};
pub use formats::HeaderFields;
pub use signals::{ChannelInfo, ChannelMap};
pub use table_decoder::{TableDecoder, TableLimits};
pub use types::{DecodedTable, DecoderError, FormatDescriptor, Result, Variant};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
