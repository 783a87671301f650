use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

use super::currency::CurrencyCode;

pub const ACCESS_KEY_ENV: &str = "FXCONV_ACCESS_KEY";

fn default_base_url() -> String {
    "https://apilayer.net".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_read_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl ProviderConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            access_key: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub currencies: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("net", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The access key from the environment, falling back to the file.
    pub fn access_key(&self) -> Result<String> {
        let key = std::env::var(ACCESS_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| self.provider.access_key.clone());
        if key.trim().is_empty() {
            bail!("No access key configured; set provider.access_key or {ACCESS_KEY_ENV}");
        }
        Ok(key)
    }

    /// Maps user input onto the configured currency list, the way a picker
    /// would. Codes outside the list count as unselected; an empty list
    /// accepts any code.
    pub fn select(&self, input: &str) -> Option<CurrencyCode> {
        let code = CurrencyCode::selected(input)?;
        let listed = self
            .currencies
            .iter()
            .any(|c| c.eq_ignore_ascii_case(code.as_str()));
        if self.currencies.is_empty() || listed {
            Some(code)
        } else {
            debug!(%code, "Currency not in configured list");
            None
        }
    }
}
