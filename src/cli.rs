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

//! Command line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Linux field toolbox: weather, BLE, Wi-Fi, and barcode utilities.
#[derive(Debug, Parser)]
#[command(name = "fieldkit", version, about)]
pub struct Cli {
    /// Path to an alternative config file.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast lookup by ZIP code
    Weather {
        #[command(subcommand)]
        action: WeatherAction,
    },

    /// Bluetooth LE device utilities
    #[command(alias = "bt")]
    Bluetooth {
        #[command(subcommand)]
        action: BluetoothAction,
    },

    /// Wi-Fi network utilities
    Wifi {
        #[command(subcommand)]
        action: WifiAction,
    },

    /// Barcode capture utilities
    Barcode {
        #[command(subcommand)]
        action: BarcodeAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum WeatherAction {
    /// Fetch the forecast for a ZIP code
    Lookup {
        /// ZIP code to look up
        zip: String,
    },
    /// Show recent searches
    History,
}

#[derive(Debug, Subcommand)]
pub enum BluetoothAction {
    /// Scan for nearby devices
    Scan {
        /// Scan duration in seconds (default from config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Include devices that advertise no name
        #[arg(long)]
        all: bool,
    },
    /// Connect to a device and list its GATT services
    Connect {
        /// Device address (AA:BB:CC:DD:EE:FF)
        address: String,
    },
    /// Show recently connected devices
    History,
}

#[derive(Debug, Subcommand)]
pub enum WifiAction {
    /// Scan for visible networks
    Scan,
    /// Join a network
    Connect {
        /// Network name
        ssid: String,

        /// Network password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show the active connection
    Status,
    /// Show recently joined networks
    History,
}

#[derive(Debug, Subcommand)]
pub enum BarcodeAction {
    /// Read codes from stdin until EOF or Ctrl-C
    Watch,
    /// Show recent scans
    History,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_weather_lookup() {
        let cli = Cli::parse_from(["fieldkit", "weather", "lookup", "10001"]);
        match cli.command {
            Command::Weather {
                action: WeatherAction::Lookup { zip },
            } => assert_eq!(zip, "10001"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bt_alias_and_scan_flags() {
        let cli = Cli::parse_from(["fieldkit", "bt", "scan", "--timeout", "10", "--all"]);
        match cli.command {
            Command::Bluetooth {
                action: BluetoothAction::Scan { timeout, all },
            } => {
                assert_eq!(timeout, Some(10));
                assert!(all);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["fieldkit", "wifi", "status", "--config", "/tmp/alt.toml"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/alt.toml")));
    }
}
