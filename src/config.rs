// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration module.
//!
//! Handles loading application settings; the default file is written on
//! first run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory name under the user config and data roots.
const APP_DIR: &str = "fieldkit";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for history feeds.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Weather settings.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Bluetooth settings.
    #[serde(default)]
    pub bluetooth: BluetoothConfig,

    /// Wi-Fi settings.
    #[serde(default)]
    pub wifi: WifiConfig,

    /// History settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key.
    pub api_key: String,

    /// Country code appended to ZIP lookups.
    pub country: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            country: "us".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BluetoothConfig {
    /// Scan duration in seconds.
    pub scan_secs: u64,

    /// Only report devices advertising a name.
    pub named_only: bool,
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        Self {
            scan_secs: 5,
            named_only: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    /// Backend: "auto", "nmcli", or "stub".
    pub backend: String,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            backend: "auto".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept per feed.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 5 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            weather: WeatherConfig::default(),
            bluetooth: BluetoothConfig::default(),
            wifi: WifiConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location or an explicit path.
    ///
    /// The default file is created on first run; an explicit path must
    /// already exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {:?}", path))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config {:?}", path))?
            }
            None => Self::load_default()?,
        };

        config.data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Ok(config)
    }

    fn load_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&config_path, content)?;
            info!("Wrote default config to {:?}", config_path);
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.weather.country, "us");
        assert!(config.weather.api_key.is_empty());
        assert_eq!(config.bluetooth.scan_secs, 5);
        assert!(config.bluetooth.named_only);
        assert_eq!(config.wifi.backend, "auto");
        assert_eq!(config.history.max_entries, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[weather]\napi_key = \"abc123\"\n").unwrap();

        assert_eq!(config.weather.api_key, "abc123");
        assert_eq!(config.weather.country, "us");
        assert_eq!(config.history.max_entries, 5);
    }

    #[test]
    fn test_load_explicit_path() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[history]\nmax_entries = 3")?;

        let config = Config::load(Some(file.path()))?;
        assert_eq!(config.history.max_entries, 3);
        Ok(())
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        assert!(Config::load(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }
}
