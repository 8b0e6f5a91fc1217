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

//! Remote device link and GATT inspection.

use anyhow::{Context, Result};
use bluer::gatt::remote::Characteristic;
use bluer::{Adapter, Address, Device};
use tracing::{debug, info};
use uuid::Uuid;

/// A characteristic of a remote service.
#[derive(Debug, Clone)]
pub struct CharacteristicInfo {
    pub uuid: Uuid,
    /// Supported operations ("read", "notify", ...).
    pub flags: Vec<String>,
}

/// A GATT service discovered on a remote device.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub uuid: Uuid,
    pub primary: bool,
    pub characteristics: Vec<CharacteristicInfo>,
}

/// An established link to a remote device.
///
/// Callers release the link when done; `release` is safe to call twice.
pub struct DeviceLink {
    device: Device,
    released: bool,
}

impl DeviceLink {
    /// Connect to `address` on the given adapter.
    ///
    /// A device that is already connected is reused without another
    /// connect call.
    pub async fn connect(adapter: &Adapter, address: Address) -> Result<Self> {
        let device = adapter.device(address)?;

        if device.is_connected().await? {
            debug!("Device {} already connected", address);
        } else {
            info!("Connecting to {}...", address);
            device
                .connect()
                .await
                .with_context(|| format!("Failed to connect to {}", address))?;
        }

        Ok(Self {
            device,
            released: false,
        })
    }

    pub fn address(&self) -> Address {
        self.device.address()
    }

    /// Remote device name, if it advertises one.
    pub async fn name(&self) -> Result<Option<String>> {
        Ok(self.device.name().await?)
    }

    /// Walk all services and characteristics of the device.
    pub async fn discover_services(&self) -> Result<Vec<ServiceInfo>> {
        let mut services = Vec::new();

        for service in self.device.services().await? {
            let uuid = service.uuid().await?;
            let primary = service.primary().await?;

            let mut characteristics = Vec::new();
            for characteristic in service.characteristics().await? {
                characteristics.push(describe(&characteristic).await?);
            }

            debug!("Service {}: {} characteristics", uuid, characteristics.len());
            services.push(ServiceInfo {
                uuid,
                primary,
                characteristics,
            });
        }

        Ok(services)
    }

    /// Disconnect the device. Later calls are no-ops.
    pub async fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        info!("Disconnecting {}", self.device.address());
        self.device.disconnect().await.context("Disconnect failed")?;
        Ok(())
    }
}

async fn describe(characteristic: &Characteristic) -> Result<CharacteristicInfo> {
    let uuid = characteristic.uuid().await?;
    let flags = characteristic.flags().await?;

    let mut names: Vec<&str> = Vec::new();
    if flags.read {
        names.push("read");
    }
    if flags.write {
        names.push("write");
    }
    if flags.write_without_response {
        names.push("write-without-response");
    }
    if flags.notify {
        names.push("notify");
    }
    if flags.indicate {
        names.push("indicate");
    }
    if flags.broadcast {
        names.push("broadcast");
    }

    Ok(CharacteristicInfo {
        uuid,
        flags: names.into_iter().map(String::from).collect(),
    })
}
