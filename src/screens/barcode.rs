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

//! Barcode screen: scan capture with scan history.
//!
//! A rescan of a code already in history is reported but leaves the feed
//! untouched.

use std::sync::Arc;
use tracing::warn;

use crate::history::{DedupPolicy, HistoryFeed, KeyValueStore};

/// Store key of the barcode feed.
pub const BARCODE_FEED: &str = "barcode";

/// What happened to a recorded scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// New code, added to history.
    Recorded,
    /// Code already in history; history untouched.
    AlreadyKnown,
    /// History write failed; the scan itself still counts.
    NotPersisted,
}

/// Open the barcode feed without building the full screen.
pub fn open_feed(store: Arc<dyn KeyValueStore>, max_entries: usize) -> HistoryFeed<String> {
    HistoryFeed::open(store, BARCODE_FEED, max_entries, DedupPolicy::KeepExisting)
}

/// Scan capture surface.
pub struct BarcodeScreen {
    feed: HistoryFeed<String>,
}

impl BarcodeScreen {
    /// Mount the screen, loading stored scan history.
    pub fn mount(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            feed: open_feed(store, max_entries),
        }
    }

    /// Record a scanned code.
    pub fn record_scan(&mut self, code: &str) -> ScanOutcome {
        match self.feed.record(code.to_string()) {
            Ok(true) => ScanOutcome::Recorded,
            Ok(false) => ScanOutcome::AlreadyKnown,
            Err(e) => {
                warn!("Scan history not persisted: {:#}", e);
                ScanOutcome::NotPersisted
            }
        }
    }

    /// Recent scans, most recent first.
    pub fn history(&self) -> &[String] {
        self.feed.entries()
    }
}
