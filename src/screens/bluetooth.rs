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

//! Bluetooth screen: device scan, GATT inspection, recent connections.

use anyhow::Result;
use bluer::Address;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::bluetooth::{
    start_scan, BleSession, DeviceLink, DiscoveredDevice, ScanHandle, ScanOptions, ServiceInfo,
};
use crate::history::{DedupPolicy, FeedEntry, HistoryFeed, KeyValueStore};

/// Store key of the bluetooth feed.
pub const BLUETOOTH_FEED: &str = "bluetooth";

/// A device we connected to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownDevice {
    pub address: String,
    pub name: Option<String>,
    pub connected_at: DateTime<Local>,
}

impl FeedEntry for KnownDevice {
    fn key(&self) -> &str {
        &self.address
    }
}

/// What a connect found on the device.
#[derive(Debug, Clone)]
pub struct DeviceReport {
    pub address: Address,
    pub name: Option<String>,
    pub services: Vec<ServiceInfo>,
}

/// Open the bluetooth feed without radio access (history display).
pub fn open_feed(store: Arc<dyn KeyValueStore>, max_entries: usize) -> HistoryFeed<KnownDevice> {
    HistoryFeed::open(
        store,
        BLUETOOTH_FEED,
        max_entries,
        DedupPolicy::RefreshRecency,
    )
}

/// Device scan and inspection surface.
pub struct BluetoothScreen {
    session: BleSession,
    feed: HistoryFeed<KnownDevice>,
}

impl BluetoothScreen {
    /// Mount the screen on an acquired session, loading stored history.
    pub fn mount(session: BleSession, store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            session,
            feed: open_feed(store, max_entries),
        }
    }

    /// Start a device scan.
    pub async fn scan(
        &self,
        options: ScanOptions,
    ) -> Result<(mpsc::Receiver<DiscoveredDevice>, ScanHandle)> {
        start_scan(self.session.adapter(), options).await
    }

    /// Connect to a device, walk its GATT database, and release the link.
    ///
    /// The link is released on the error path as well; successful connects
    /// are remembered in the feed.
    pub async fn inspect(&mut self, address: Address) -> Result<DeviceReport> {
        let mut link = DeviceLink::connect(self.session.adapter(), address).await?;

        let name = link.name().await.ok().flatten();
        let discovered = link.discover_services().await;

        if let Err(e) = link.release().await {
            warn!("Disconnect failed: {:#}", e);
        }

        let services = discovered?;
        self.remember(address, name.clone());

        Ok(DeviceReport {
            address,
            name,
            services,
        })
    }

    fn remember(&mut self, address: Address, name: Option<String>) {
        let entry = KnownDevice {
            address: address.to_string(),
            name,
            connected_at: Local::now(),
        };
        if let Err(e) = self.feed.record(entry) {
            warn!("Connection history not persisted: {:#}", e);
        }
    }

    /// Recently connected devices, most recent first.
    pub fn history(&self) -> &[KnownDevice] {
        self.feed.entries()
    }
}
