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

//! NetworkManager backend using nmcli.
//!
//! Terse mode (`-t`) output is colon separated with `\:` and `\\` escapes
//! inside field values, which matters for BSSIDs.

use anyhow::{anyhow, Result};
use std::process::Command;
use tracing::{debug, warn};

use super::manager::{WifiManager, WifiNetwork};

/// Wi-Fi manager shelling out to nmcli.
pub struct NmcliManager {
    /// Whether nmcli was found in PATH.
    nmcli_available: bool,
}

impl NmcliManager {
    /// Create a new manager, probing for the tool.
    pub fn new() -> Result<Self> {
        let nmcli_available = Command::new("which")
            .arg("nmcli")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);

        if !nmcli_available {
            warn!("nmcli not found in PATH");
        }

        Ok(Self { nmcli_available })
    }

    /// Run nmcli and capture stdout.
    fn run_nmcli(&self, args: &[&str]) -> Result<String> {
        if !self.nmcli_available {
            return Err(anyhow!("nmcli not available"));
        }

        debug!("Running: nmcli {:?}", args);

        let output = Command::new("nmcli")
            .args(args)
            .output()
            .map_err(|e| anyhow!("Failed to run nmcli: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("nmcli failed: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl WifiManager for NmcliManager {
    fn backend_name(&self) -> &'static str {
        "NetworkManager (nmcli)"
    }

    fn scan(&self) -> Result<Vec<WifiNetwork>> {
        let output = self.run_nmcli(&[
            "-t",
            "-f",
            "SSID,BSSID,SIGNAL,SECURITY",
            "device",
            "wifi",
            "list",
            "--rescan",
            "yes",
        ])?;
        Ok(parse_scan_output(&output))
    }

    fn connect(&self, ssid: &str, password: &str) -> Result<()> {
        self.run_nmcli(&["device", "wifi", "connect", ssid, "password", password])?;
        Ok(())
    }

    fn current_ssid(&self) -> Result<Option<String>> {
        let output = self.run_nmcli(&["-t", "-f", "ACTIVE,SSID", "device", "wifi"])?;
        Ok(parse_active_ssid(&output))
    }
}

/// Split a terse-mode line on unescaped colons, unescaping `\:` and `\\`.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    field.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Parse `nmcli -t -f SSID,BSSID,SIGNAL,SECURITY device wifi list` output.
fn parse_scan_output(output: &str) -> Vec<WifiNetwork> {
    let mut networks = Vec::new();

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        let fields = split_terse(line);
        if fields.len() < 4 {
            warn!("Skipping malformed scan line: {}", line);
            continue;
        }

        let ssid = if fields[0].is_empty() {
            None
        } else {
            Some(fields[0].clone())
        };
        let signal = fields[2].parse::<u8>().ok();
        let security = if fields[3].is_empty() || fields[3] == "--" {
            None
        } else {
            Some(fields[3].clone())
        };

        networks.push(WifiNetwork {
            ssid,
            bssid: fields[1].clone(),
            signal,
            security,
        });
    }

    networks
}

/// Parse `nmcli -t -f ACTIVE,SSID device wifi` output.
fn parse_active_ssid(output: &str) -> Option<String> {
    for line in output.lines() {
        let fields = split_terse(line);
        if fields.len() >= 2 && fields[0] == "yes" && !fields[1].is_empty() {
            return Some(fields[1].clone());
        }
    }
    None
}
