// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::params::validate_year;

pub const DATA_DIR_ENV: &str = "LODES_DATA_DIR";
pub const BASE_URL_ENV: &str = "LODES_BASE_URL";

/// Process-wide settings, built once and passed to whatever needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root for materialised tables and the local reference files.
    pub data_dir: PathBuf,
    /// Where mirrored raw `.csv.gz` files live.
    pub raw_dir: PathBuf,
    /// Remote directory holding the state's LODES files (trailing slash).
    pub base_url: String,
    /// Two-letter state prefix used in source file names.
    pub state: String,
    pub default_year: u16,
    pub max_concurrent_downloads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            raw_dir: PathBuf::from("data/raw"),
            base_url: "https://lehd.ces.census.gov/data/lodes/LODES7/pa/".into(),
            state: "pa".into(),
            default_year: 2017,
            max_concurrent_downloads: 3,
        }
    }
}

impl Config {
    /// Load from an optional YAML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            debug!(%dir, "data_dir overridden from environment");
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var(BASE_URL_ENV) {
            debug!(%url, "base_url overridden from environment");
            self.base_url = url;
        }
    }

    fn validate(&self) -> Result<()> {
        validate_year(self.default_year).context("config default_year")?;
        if self.state.is_empty() {
            anyhow::bail!("config state must not be empty");
        }
        if self.max_concurrent_downloads == 0 {
            anyhow::bail!("config max_concurrent_downloads must be at least 1");
        }
        Ok(())
    }
}
