//! Decoder configuration types
//!
//! This module defines the small amount of configuration the decoder library
//! accepts. Output formats, file lists and channel map locations belong to the
//! application layer (efi-log-cli).

use crate::table_decoder::TableLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the decoder library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// How to treat input files (default: decide from the file extension)
    #[serde(default)]
    pub container: ContainerKind,

    /// Optional: decode at most this many channel columns
    #[serde(default)]
    pub channel_limit: Option<usize>,

    /// Optional: decode at most this many rows
    #[serde(default)]
    pub max_rows: Option<usize>,
}

/// On-disk form of a log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// `.dlz` is compressed, anything else is treated as expanded
    #[default]
    Auto,
    /// DLZ container: byte-swapped and run-length encoded
    Compressed,
    /// DL file: header plus fixed-stride float rows
    Expanded,
}

impl ContainerKind {
    /// Resolve `Auto` from a file extension; explicit kinds are returned as-is
    pub fn for_path(self, path: &Path) -> ContainerKind {
        if self != ContainerKind::Auto {
            return self;
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("dlz") => ContainerKind::Compressed,
            Some("dl") => ContainerKind::Expanded,
            other => {
                log::debug!(
                    "No container hint from extension {:?}, treating {:?} as expanded",
                    other,
                    path
                );
                ContainerKind::Expanded
            }
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: force the container kind
    pub fn with_container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    /// Builder method: cap the number of channel columns
    pub fn with_channel_limit(mut self, limit: usize) -> Self {
        self.channel_limit = Some(limit);
        self
    }

    /// Builder method: cap the number of rows
    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = Some(rows);
        self
    }

    /// Row and channel caps for the table decoder
    pub fn limits(&self) -> TableLimits {
        TableLimits {
            channel_limit: self.channel_limit,
            max_rows: self.max_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config_builder() {
        let config = DecoderConfig::new()
            .with_container(ContainerKind::Compressed)
            .with_channel_limit(64)
            .with_max_rows(1000);

        assert_eq!(config.container, ContainerKind::Compressed);
        assert_eq!(config.limits().channel_limit, Some(64));
        assert_eq!(config.limits().max_rows, Some(1000));
    }

    #[test]
    fn test_container_from_extension() {
        let auto = ContainerKind::Auto;
        assert_eq!(auto.for_path(Path::new("run.DLZ")), ContainerKind::Compressed);
        assert_eq!(auto.for_path(Path::new("run.dl")), ContainerKind::Expanded);
        assert_eq!(auto.for_path(Path::new("run.V6.dl")), ContainerKind::Expanded);
        assert_eq!(auto.for_path(Path::new("run.bin")), ContainerKind::Expanded);
        assert_eq!(auto.for_path(Path::new("run")), ContainerKind::Expanded);
    }

    #[test]
    fn test_explicit_container_wins() {
        let kind = ContainerKind::Compressed;
        assert_eq!(kind.for_path(Path::new("run.dl")), ContainerKind::Compressed);
    }

    #[test]
    fn test_no_limits_by_default() {
        let config = DecoderConfig::new();
        assert_eq!(config.container, ContainerKind::Auto);
        assert_eq!(config.limits(), TableLimits::default());
    }
}
