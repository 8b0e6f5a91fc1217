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

//! Wi-Fi screen: scan, join, recently joined networks.

use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::history::{DedupPolicy, FeedEntry, HistoryFeed, KeyValueStore};
use crate::wifi::{WifiManager, WifiNetwork};

/// Store key of the wifi feed.
pub const WIFI_FEED: &str = "wifi";

/// A network we joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedNetwork {
    pub ssid: String,
    pub joined_at: DateTime<Local>,
}

impl FeedEntry for JoinedNetwork {
    fn key(&self) -> &str {
        &self.ssid
    }
}

/// Open the wifi feed without building the full screen.
pub fn open_feed(store: Arc<dyn KeyValueStore>, max_entries: usize) -> HistoryFeed<JoinedNetwork> {
    HistoryFeed::open(store, WIFI_FEED, max_entries, DedupPolicy::RefreshRecency)
}

/// Network scan and join surface.
pub struct WifiScreen {
    manager: Box<dyn WifiManager>,
    feed: HistoryFeed<JoinedNetwork>,
}

impl WifiScreen {
    /// Mount the screen on a backend, loading stored join history.
    pub fn mount(
        manager: Box<dyn WifiManager>,
        store: Arc<dyn KeyValueStore>,
        max_entries: usize,
    ) -> Self {
        Self {
            manager,
            feed: open_feed(store, max_entries),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.manager.backend_name()
    }

    /// Scan for visible networks.
    pub fn scan(&self) -> Result<Vec<WifiNetwork>> {
        self.manager.scan()
    }

    /// Join a network and remember it.
    ///
    /// Returns the SSID reported active after the join, falling back to
    /// the requested one when the backend cannot report it.
    pub fn connect(&mut self, ssid: &str, password: &str) -> Result<String> {
        if password.is_empty() {
            bail!("Password must not be empty");
        }

        self.manager.connect(ssid, password)?;

        let joined = match self.manager.current_ssid() {
            Ok(Some(active)) => active,
            Ok(None) => ssid.to_string(),
            Err(e) => {
                warn!("Could not read active SSID after join: {:#}", e);
                ssid.to_string()
            }
        };

        self.remember(&joined);
        Ok(joined)
    }

    fn remember(&mut self, ssid: &str) {
        let entry = JoinedNetwork {
            ssid: ssid.to_string(),
            joined_at: Local::now(),
        };
        if let Err(e) = self.feed.record(entry) {
            warn!("Join history not persisted: {:#}", e);
        }
    }

    /// SSID of the active connection.
    pub fn status(&self) -> Result<Option<String>> {
        self.manager.current_ssid()
    }

    /// Recently joined networks, most recent first.
    pub fn history(&self) -> &[JoinedNetwork] {
        self.feed.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;
    use crate::wifi::StubManager;

    /// Backend that always reports a fixed active SSID.
    struct FixedManager {
        active: Option<String>,
    }

    impl WifiManager for FixedManager {
        fn backend_name(&self) -> &'static str {
            "Fixed (test)"
        }

        fn scan(&self) -> Result<Vec<WifiNetwork>> {
            Ok(Vec::new())
        }

        fn connect(&self, _ssid: &str, _password: &str) -> Result<()> {
            Ok(())
        }

        fn current_ssid(&self) -> Result<Option<String>> {
            Ok(self.active.clone())
        }
    }

    fn stub_screen() -> WifiScreen {
        WifiScreen::mount(Box::new(StubManager), Arc::new(MemoryStore::new()), 5)
    }

    #[test]
    fn test_connect_requires_password() {
        let mut screen = stub_screen();

        assert!(screen.connect("HomeNet", "").is_err());
        assert!(screen.history().is_empty());
    }

    #[test]
    fn test_connect_records_join() -> Result<()> {
        let mut screen = stub_screen();

        let joined = screen.connect("HomeNet", "hunter2")?;
        assert_eq!(joined, "HomeNet");
        assert_eq!(screen.history().len(), 1);
        assert_eq!(screen.history()[0].ssid, "HomeNet");
        Ok(())
    }

    #[test]
    fn test_connect_prefers_backend_reported_ssid() -> Result<()> {
        let manager = FixedManager {
            active: Some("HomeNet 5G".to_string()),
        };
        let mut screen = WifiScreen::mount(Box::new(manager), Arc::new(MemoryStore::new()), 5);

        let joined = screen.connect("HomeNet", "hunter2")?;
        assert_eq!(joined, "HomeNet 5G");
        assert_eq!(screen.history()[0].ssid, "HomeNet 5G");
        Ok(())
    }

    #[test]
    fn test_rejoin_refreshes_recency() -> Result<()> {
        let mut screen = stub_screen();

        screen.connect("HomeNet", "hunter2")?;
        screen.connect("Office", "hunter2")?;
        screen.connect("HomeNet", "hunter2")?;

        let ssids: Vec<&str> = screen.history().iter().map(|n| n.ssid.as_str()).collect();
        assert_eq!(ssids, vec!["HomeNet", "Office"]);
        Ok(())
    }
}
