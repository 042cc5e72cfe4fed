use std::{fs, path::{Path, PathBuf}, net::SocketAddr};
use serde::{Serialize, Deserialize};
use anyhow::{self, Context};

use crate::core::Amount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bills_file: PathBuf
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { bills_file: PathBuf::from("bills.json") }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Rate offered for taxable expenses when none is given.
    pub tax_rate: Amount
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults { tax_rate: 0.08375 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: SocketAddr
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { address: SocketAddr::from(([127, 0, 0, 1], 8080)) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub defaults: Defaults,
    pub server: ServerConfig
}

impl AppConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(filepath)
            .with_context(|| "failed to read config file")?;
        let config: AppConfig = toml::from_str(&file_content)
            .with_context(|| "failed to parse config file")?;

        if !(0.0..=1.0).contains(&config.defaults.tax_rate) {
            anyhow::bail!("default tax rate {} is not between 0 and 1", config.defaults.tax_rate);
        }
        return Ok(config);
    }
}
