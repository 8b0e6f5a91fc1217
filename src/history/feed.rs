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

//! Bounded, deduplicated recent-history feed.
//!
//! A feed keeps at most `max_entries` entries, most recent first, with no
//! two entries sharing a key. Every accepted mutation is written through to
//! the backing store before the in-memory list changes.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::store::KeyValueStore;

/// An entry that can live in a history feed.
///
/// The key is the identity used for deduplication within one feed.
pub trait FeedEntry: Clone + Serialize + DeserializeOwned {
    /// Deduplication key for this entry.
    fn key(&self) -> &str;
}

/// Raw string entries (barcodes) are their own key.
impl FeedEntry for String {
    fn key(&self) -> &str {
        self
    }
}

/// What to do when a recorded entry's key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Drop the old occurrence and reinsert at the front with the new payload.
    RefreshRecency,
    /// Leave the feed untouched; the new entry is discarded.
    KeepExisting,
}

/// A persisted feed of recent entries.
pub struct HistoryFeed<T: FeedEntry> {
    store: Arc<dyn KeyValueStore>,
    feed_key: String,
    max_entries: usize,
    policy: DedupPolicy,
    entries: Vec<T>,
}

impl<T: FeedEntry> HistoryFeed<T> {
    /// Open the feed stored under `feed_key`.
    ///
    /// Absent or unreadable stored state degrades to an empty feed; loading
    /// never fails. Loaded state is sanitized to the feed invariants.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        feed_key: impl Into<String>,
        max_entries: usize,
        policy: DedupPolicy,
    ) -> Self {
        let feed_key = feed_key.into();
        let entries = load_entries(store.as_ref(), &feed_key, max_entries);
        debug!("Feed '{}' opened with {} entries", feed_key, entries.len());

        Self {
            store,
            feed_key,
            max_entries,
            policy,
            entries,
        }
    }

    /// Current entries, most recent first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an entry.
    ///
    /// Returns `Ok(true)` when the feed changed and the change was
    /// persisted, `Ok(false)` when the entry was discarded by the
    /// `KeepExisting` policy. A store write failure is returned as an error
    /// and leaves the in-memory list unchanged.
    pub fn record(&mut self, entry: T) -> Result<bool> {
        let duplicate = self.entries.iter().any(|e| e.key() == entry.key());
        if duplicate && self.policy == DedupPolicy::KeepExisting {
            debug!("Feed '{}': '{}' already present", self.feed_key, entry.key());
            return Ok(false);
        }

        let next = insert_front(&self.entries, entry, self.max_entries);

        // Write-through precedes publish: the in-memory list only changes
        // once the store has accepted the new state.
        let blob = serde_json::to_string(&next)
            .with_context(|| format!("Failed to serialize feed '{}'", self.feed_key))?;
        self.store
            .set(&self.feed_key, &blob)
            .with_context(|| format!("Failed to persist feed '{}'", self.feed_key))?;

        self.entries = next;
        Ok(true)
    }
}

/// Remove any entry sharing the new entry's key, insert the new entry at
/// the front, and truncate from the tail down to `max`.
fn insert_front<T: FeedEntry>(current: &[T], entry: T, max: usize) -> Vec<T> {
    let mut next: Vec<T> = current
        .iter()
        .filter(|e| e.key() != entry.key())
        .cloned()
        .collect();
    next.insert(0, entry);
    next.truncate(max);
    next
}

/// Load and sanitize stored entries. Anything unreadable becomes an empty
/// feed rather than an error.
fn load_entries<T: FeedEntry>(store: &dyn KeyValueStore, feed_key: &str, max: usize) -> Vec<T> {
    let blob = match store.get(feed_key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Feed '{}': stored state unreadable: {:#}", feed_key, e);
            return Vec::new();
        }
    };

    let parsed: Vec<T> = match serde_json::from_str(&blob) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Feed '{}': stored state malformed, starting empty: {}", feed_key, e);
            return Vec::new();
        }
    };

    sanitize(parsed, max)
}

/// Collapse duplicate keys to their first occurrence and cap the length.
fn sanitize<T: FeedEntry>(entries: Vec<T>, max: usize) -> Vec<T> {
    let mut seen: Vec<String> = Vec::new();
    let mut clean: Vec<T> = Vec::new();
    for entry in entries {
        if seen.iter().any(|k| k == entry.key()) {
            continue;
        }
        seen.push(entry.key().to_string());
        clean.push(entry);
        if clean.len() == max {
            break;
        }
    }
    clean
}
