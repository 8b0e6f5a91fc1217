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

//! BlueZ session and adapter handle.

use anyhow::Result;
use bluer::{Adapter, Address, Session};
use tracing::info;

/// Owned handle to the local Bluetooth adapter.
///
/// Callers construct the handle explicitly and pass it to whatever needs
/// radio access; dropping it releases the BlueZ connection.
pub struct BleSession {
    /// BlueZ session (kept alive).
    _session: Session,
    adapter: Adapter,
}

impl BleSession {
    /// Open the BlueZ session and power on the default adapter.
    pub async fn acquire() -> Result<Self> {
        let session = Session::new().await?;
        let adapter = session.default_adapter().await?;
        info!("Using Bluetooth adapter: {}", adapter.name());

        if !adapter.is_powered().await? {
            info!("Powering on Bluetooth adapter...");
            adapter.set_powered(true).await?;
        }

        Ok(Self {
            _session: session,
            adapter,
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Adapter hardware address.
    pub async fn address(&self) -> Result<Address> {
        Ok(self.adapter.address().await?)
    }
}
