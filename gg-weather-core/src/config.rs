use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    CityId,
    provider::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS},
};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// service_key = "..."
/// default_city = "suwon"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// data.go.kr service key.
    pub service_key: Option<String>,

    /// Overrides the nowcast endpoint, e.g. for a proxy.
    pub endpoint: Option<String>,

    pub timeout_secs: Option<u64>,

    /// City used by `show` when none is given on the command line.
    pub default_city: Option<CityId>,
}

impl Config {
    /// Connection settings for the client, or a hint when no key is set.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let service_key = self
            .service_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No service key configured.\n\
                     Hint: run `gg-weather configure` and enter your data.go.kr service key."
                )
            })?;

        Ok(ClientConfig {
            endpoint: self.endpoint.clone().unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            service_key: service_key.to_string(),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn set_service_key(&mut self, service_key: String) {
        self.service_key = Some(service_key.trim().to_string());
    }

    pub fn set_default_city(&mut self, city: CityId) {
        self.default_city = Some(city);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "gg-weather", "gg-weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
