//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use efi_log_decoder::{ChannelMap, DecoderConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChannelsConfig {
    /// JSON channel map file
    pub map_file: Option<PathBuf>,
    /// Name the leading channels with the vendor's CSV column names
    #[serde(default)]
    pub use_common_names: bool,
}

impl ChannelsConfig {
    /// Build the name overlay; `None` keeps positional column names.
    /// Names from `map_file` override the common names.
    pub fn build_map(&self) -> Result<Option<ChannelMap>> {
        let mut map = if self.use_common_names {
            ChannelMap::common()
        } else {
            ChannelMap::new()
        };

        if let Some(path) = &self.map_file {
            let custom = ChannelMap::load(path)
                .with_context(|| format!("Failed to load channel map: {:?}", path))?;
            map.merge(&custom);
        }

        Ok(if map.is_empty() { None } else { Some(map) })
    }
}

impl AppConfig {
    /// Make relative paths relative to `base` (the config file's directory)
    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        self.input.files.iter_mut().for_each(resolve);
        self.output.output_dir.iter_mut().for_each(resolve);
        self.channels.map_file.iter_mut().for_each(resolve);
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.input.files.is_empty() {
        bail!("Config file {:?} lists no input files", path);
    }

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }

    Ok(config)
}
