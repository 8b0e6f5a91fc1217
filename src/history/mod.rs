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

//! Bounded history feeds.
//!
//! Each screen keeps a small persisted list of recent entries. The feed
//! guarantees most-recent-first order, key uniqueness, and a hard size cap.

mod feed;
mod store;

pub use feed::{DedupPolicy, FeedEntry, HistoryFeed};
pub use store::{FileStore, KeyValueStore, MemoryStore};
