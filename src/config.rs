//! Configuration
//! TOML settings for the input file, the category list and coordinate overrides.

use crate::data::{LoadOptions, DEFAULT_SUMMARY_LABEL, HERITAGE_CATEGORIES};
use crate::regions::{Coordinate, RegionCoordinates};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_CSV: &str = "korean_heritage.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub view: ViewConfig,
    /// Region name to `[lat, lon]`, replacing or extending the built-in map.
    pub coordinates: BTreeMap<String, [f64; 2]>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub data_csv: PathBuf,
    pub category_column: Option<String>,
    pub summary_label: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_csv: PathBuf::from(DEFAULT_DATA_CSV),
            category_column: None,
            summary_label: DEFAULT_SUMMARY_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Categories of the per-region breakdown, in display order.
    pub categories: Vec<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            categories: HERITAGE_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            category_column: self.input.category_column.clone(),
            summary_label: self.input.summary_label.clone(),
        }
    }

    /// Built-in region coordinates with the configured overrides applied.
    pub fn coordinates(&self) -> RegionCoordinates {
        RegionCoordinates::korea().with_overrides(
            self.coordinates
                .iter()
                .map(|(name, [lat, lon])| (name.clone(), Coordinate { lat: *lat, lon: *lon })),
        )
    }
}
