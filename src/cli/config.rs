//! TOML configuration file support.
//!
//! Extender tuning lives in an `[extender]` table; every key is optional:
//!
//! ```toml
//! # result-catalog.toml
//! [extender]
//! bucket_size = 256
//! buffer_size = 100
//! metadata_suffix = ".metadata"
//! owner = "solver-farm"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use result_catalog::extender::ExtenderConfig;

/// Root configuration structure for result-catalog.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Write path settings.
    #[serde(default)]
    pub extender: ExtenderConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        if config.extender.bucket_size == 0 || config.extender.buffer_size == 0 {
            anyhow::bail!("bucket_size and buffer_size must be at least 1");
        }
        if config.extender.metadata_suffix.is_empty() {
            config.extender.metadata_suffix = ExtenderConfig::default().metadata_suffix;
        }
        Ok(config)
    }
}
