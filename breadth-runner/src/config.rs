//! Serializable dashboard configuration.
//!
//! ```toml
//! universe_file = "data/ind_niftytotalmarket_list.csv"
//! symbol_suffix = ".NS"
//! lookback_days = 365
//!
//! [params]
//! short_ma = 50
//! long_ma = 200
//!
//! [[indices]]
//! name = "Nifty 50"
//! file = "data/ind_nifty50_list.csv"
//! ```

use breadth_core::breadth::BreadthParams;
use breadth_core::data::{load_catalog, MembershipError};
use breadth_core::domain::MembershipCatalog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data_loader::LoadOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One named index and the membership list that defines it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSource {
    pub name: String,
    pub file: PathBuf,
}

/// Everything needed to assemble a breadth report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Universe list with SYMBOL and INDUSTRY columns.
    pub universe_file: PathBuf,

    /// Appended to each symbol to form the provider ticker.
    #[serde(default = "default_suffix")]
    pub symbol_suffix: String,

    /// Calendar days of history to request (one year by default).
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    #[serde(default)]
    pub params: BreadthParams,

    /// Indices in display order.
    #[serde(default)]
    pub indices: Vec<IndexSource>,
}

fn default_suffix() -> String {
    ".NS".into()
}

fn default_lookback_days() -> u32 {
    365
}

impl DashboardConfig {
    /// Load a config file. Relative membership paths resolve against the
    /// directory containing the config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::Invalid("lookback_days must be >= 1".into()));
        }
        self.params
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let mut seen = BTreeSet::new();
        for index in &self.indices {
            if index.name.trim().is_empty() {
                return Err(ConfigError::Invalid("index name must not be empty".into()));
            }
            if !seen.insert(index.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "index '{}' is declared twice",
                    index.name
                )));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        if self.universe_file.is_relative() {
            self.universe_file = base.join(&self.universe_file);
        }
        for index in &mut self.indices {
            if index.file.is_relative() {
                index.file = base.join(&index.file);
            }
        }
    }

    /// Online load options covering `lookback_days` up to `as_of`.
    pub fn load_options(&self, as_of: NaiveDate) -> LoadOptions {
        LoadOptions::lookback(as_of, self.lookback_days, self.symbol_suffix.as_str())
    }

    pub fn index_sources(&self) -> Vec<(String, PathBuf)> {
        self.indices
            .iter()
            .map(|i| (i.name.clone(), i.file.clone()))
            .collect()
    }

    /// Read the universe and every index list.
    pub fn load_catalog(&self) -> Result<MembershipCatalog, MembershipError> {
        load_catalog(&self.universe_file, &self.index_sources())
    }

    /// NSE total-market universe with the six standard Nifty indices.
    pub fn default_nifty() -> Self {
        let indices = [
            ("Nifty 50", "data/ind_nifty50_list.csv"),
            ("Nifty Defence", "data/ind_niftyindiadefence_list.csv"),
            ("Bank Nifty", "data/ind_niftybank_list.csv"),
            ("Nifty Smallcap 250", "data/ind_niftysmallcap250_list.csv"),
            ("Nifty Midcap 150", "data/ind_niftymidcap150_list.csv"),
            ("Nifty IT", "data/ind_niftyit_list.csv"),
        ]
        .into_iter()
        .map(|(name, file)| IndexSource {
            name: name.into(),
            file: file.into(),
        })
        .collect();

        Self {
            universe_file: "data/ind_niftytotalmarket_list.csv".into(),
            symbol_suffix: default_suffix(),
            lookback_days: default_lookback_days(),
            params: BreadthParams::default(),
            indices,
        }
    }
}
