//! Channel name overlay
//!
//! Maps channel slot indices to human-readable names and optional units. The
//! overlay is applied after decoding and only renames columns; it never
//! influences which bytes are read.
//!
//! ## File format
//! ```json
//! { "channels": [ { "slot": 2, "name": "RPM", "unit": "rpm" } ] }
//! ```

use crate::types::{DecodedTable, DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Leading columns of the vendor's CSV export, in slot order
const COMMON_CHANNELS: [&str; 11] = [
    "Point Number",
    "RTC",
    "RPM",
    "Inj PW",
    "Duty Cycle",
    "CL Comp",
    "Target AFR",
    "AFR Left",
    "AFR Right",
    "AFR Average",
    "Air Temp Enr",
];

/// Name and unit of one channel slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelMapFile {
    channels: Vec<ChannelEntry>,
}

#[derive(Debug, Deserialize)]
struct ChannelEntry {
    slot: usize,
    name: String,
    #[serde(default)]
    unit: Option<String>,
}

/// Slot index → channel name overlay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelMap {
    channels: BTreeMap<usize, ChannelInfo>,
}

impl ChannelMap {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an overlay from `(slot, name)` pairs; later pairs win
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (slot, name) in pairs {
            map.insert(slot, name);
        }
        map
    }

    /// Names of the leading channels known from the vendor's CSV export
    pub fn common() -> Self {
        Self::from_pairs(COMMON_CHANNELS.iter().copied().enumerate())
    }

    /// Load an overlay from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading channel map: {:?}", path);

        let content = std::fs::read_to_string(path)?;
        let map = Self::from_json_str(&content)?;

        log::info!("Loaded {} channel names from {:?}", map.len(), path);
        Ok(map)
    }

    /// Parse an overlay from a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: ChannelMapFile = serde_json::from_str(content)
            .map_err(|e| DecoderError::InvalidOverlay(format!("Failed to parse JSON: {}", e)))?;

        let mut map = Self::new();
        for entry in file.channels {
            if entry.name.trim().is_empty() {
                return Err(DecoderError::InvalidOverlay(format!(
                    "Empty name for slot {}",
                    entry.slot
                )));
            }
            if map.channels.contains_key(&entry.slot) {
                return Err(DecoderError::InvalidOverlay(format!(
                    "Slot {} is named more than once",
                    entry.slot
                )));
            }
            map.channels.insert(
                entry.slot,
                ChannelInfo {
                    name: entry.name,
                    unit: entry.unit,
                },
            );
        }

        Ok(map)
    }

    /// Name a slot, replacing any previous name
    pub fn insert(&mut self, slot: usize, name: impl Into<String>) {
        self.channels.insert(
            slot,
            ChannelInfo {
                name: name.into(),
                unit: None,
            },
        );
    }

    /// Name a slot with a unit
    pub fn insert_with_unit(&mut self, slot: usize, name: impl Into<String>, unit: impl Into<String>) {
        self.channels.insert(
            slot,
            ChannelInfo {
                name: name.into(),
                unit: Some(unit.into()),
            },
        );
    }

    /// Add every entry of `other`, overriding names already present
    pub fn merge(&mut self, other: &ChannelMap) {
        for (slot, info) in &other.channels {
            self.channels.insert(*slot, info.clone());
        }
    }

    pub fn get(&self, slot: usize) -> Option<&ChannelInfo> {
        self.channels.get(&slot)
    }

    pub fn name(&self, slot: usize) -> Option<&str> {
        self.get(slot).map(|info| info.name.as_str())
    }

    pub fn unit(&self, slot: usize) -> Option<&str> {
        self.get(slot).and_then(|info| info.unit.as_deref())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Iterate over `(slot, info)` in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ChannelInfo)> {
        self.channels.iter().map(|(slot, info)| (*slot, info))
    }

    /// Rename the columns of a decoded table. Slots beyond the table width are
    /// ignored; unnamed slots keep their positional identifier.
    pub fn apply(&self, table: &mut DecodedTable) {
        let columns = table.columns_mut();
        for (slot, info) in &self.channels {
            if let Some(column) = columns.get_mut(*slot) {
                column.clone_from(&info.name);
            } else {
                log::trace!("Channel map slot {} ({}) is outside the table", slot, info.name);
            }
        }
    }
}
