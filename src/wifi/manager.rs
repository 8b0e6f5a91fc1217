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

//! Wi-Fi management abstraction and backend factory.

use anyhow::{bail, Result};
use tracing::info;

use super::nmcli::NmcliManager;

/// A wireless network visible in a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct WifiNetwork {
    /// Network name; hidden networks advertise none.
    pub ssid: Option<String>,
    pub bssid: String,
    /// Signal strength in percent.
    pub signal: Option<u8>,
    /// Security descriptor as reported by the backend ("WPA2", ...).
    pub security: Option<String>,
}

/// Trait for Wi-Fi management backends.
pub trait WifiManager: Send + Sync {
    /// Get the backend name.
    fn backend_name(&self) -> &'static str;

    /// Scan for visible networks.
    fn scan(&self) -> Result<Vec<WifiNetwork>>;

    /// Join a network.
    fn connect(&self, ssid: &str, password: &str) -> Result<()>;

    /// SSID of the active wireless connection, if any.
    fn current_ssid(&self) -> Result<Option<String>>;
}

/// Create the Wi-Fi manager for the configured backend.
///
/// - "auto" or "nmcli": NetworkManager via nmcli
/// - "stub": no-op backend
pub fn create_manager(preference: &str) -> Result<Box<dyn WifiManager>> {
    match preference.to_lowercase().as_str() {
        "auto" | "nmcli" => {
            info!("Using nmcli Wi-Fi backend");
            Ok(Box::new(NmcliManager::new()?))
        }
        "stub" => {
            info!("Using stub Wi-Fi backend");
            Ok(Box::new(StubManager))
        }
        other => bail!("Unknown Wi-Fi backend '{}'", other),
    }
}

/// Stub manager for exercising flows without a wireless interface.
pub struct StubManager;

impl WifiManager for StubManager {
    fn backend_name(&self) -> &'static str {
        "Stub (no-op)"
    }

    fn scan(&self) -> Result<Vec<WifiNetwork>> {
        info!("[STUB] Would scan for networks");
        Ok(Vec::new())
    }

    fn connect(&self, ssid: &str, _password: &str) -> Result<()> {
        info!("[STUB] Would connect to: {}", ssid);
        Ok(())
    }

    fn current_ssid(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
