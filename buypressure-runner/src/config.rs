//! Serializable pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use buypressure_core::data::stock::DEFAULT_RESULTS_SHEET;
use buypressure_core::data::IndustrySheets;

use crate::view::ViewOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where snapshots live and how they are laid out.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory scanned for snapshot workbooks.
    pub data_dir: PathBuf,

    /// File extension of snapshot workbooks, without the dot.
    pub extension: String,

    /// File-name prefix of the industry multi-condition snapshots.
    pub industry_prefix: String,

    /// File-name prefix of the integrated screening snapshots.
    pub screening_prefix: String,

    pub sheets: SheetConfig,

    /// Default post-load filters.
    pub view: ViewOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extension: "xlsx".into(),
            industry_prefix: "industry_multicondition_".into(),
            screening_prefix: "integrated_screening_".into(),
            sheets: SheetConfig::default(),
            view: ViewOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Default layout rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Sheet names inside the two snapshot workbooks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SheetConfig {
    pub qualified: String,
    pub full_population: String,
    pub results: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        let industry = IndustrySheets::default();
        Self {
            qualified: industry.qualified,
            full_population: industry.full_population,
            results: DEFAULT_RESULTS_SHEET.into(),
        }
    }
}

impl SheetConfig {
    pub fn industry_sheets(&self) -> IndustrySheets {
        IndustrySheets {
            qualified: self.qualified.clone(),
            full_population: self.full_population.clone(),
        }
    }
}
