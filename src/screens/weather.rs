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

//! Weather screen: forecast lookup with recent-search history.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::history::{DedupPolicy, FeedEntry, HistoryFeed, KeyValueStore};
use crate::weather::{first_temperature, Forecast, WeatherClient};

/// Store key of the weather feed.
pub const WEATHER_FEED: &str = "weather";

/// A remembered forecast lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSearch {
    pub zip: String,
    /// Display temperature at lookup time, e.g. "21.5°C".
    pub temperature: String,
}

impl FeedEntry for WeatherSearch {
    fn key(&self) -> &str {
        &self.zip
    }
}

/// Open the weather feed without building the full screen.
pub fn open_feed(store: Arc<dyn KeyValueStore>, max_entries: usize) -> HistoryFeed<WeatherSearch> {
    HistoryFeed::open(store, WEATHER_FEED, max_entries, DedupPolicy::RefreshRecency)
}

/// Forecast lookup surface.
pub struct WeatherScreen {
    client: WeatherClient,
    feed: HistoryFeed<WeatherSearch>,
}

impl WeatherScreen {
    /// Mount the screen, loading stored search history.
    pub fn mount(client: WeatherClient, store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            client,
            feed: open_feed(store, max_entries),
        }
    }

    /// Fetch the forecast for `zip` and remember the lookup.
    ///
    /// History is best effort: a failed write is logged and the forecast
    /// is still returned.
    pub async fn lookup(&mut self, zip: &str) -> Result<Forecast> {
        let forecast = self.client.forecast_by_zip(zip).await?;
        self.remember(zip, &forecast);
        Ok(forecast)
    }

    fn remember(&mut self, zip: &str, forecast: &Forecast) {
        let temperature = match first_temperature(forecast) {
            Some(t) => t,
            None => {
                warn!("Forecast for {} has no usable slot, not recording", zip);
                return;
            }
        };

        let entry = WeatherSearch {
            zip: zip.to_string(),
            temperature,
        };
        if let Err(e) = self.feed.record(entry) {
            warn!("Search history not persisted: {:#}", e);
        }
    }

    /// Recent searches, most recent first.
    pub fn history(&self) -> &[WeatherSearch] {
        self.feed.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;

    fn forecast(temp: &str) -> Forecast {
        let json = format!(r#"{{"list": [{{"dt": 0, "main": {{"temp": {}}}}}]}}"#, temp);
        serde_json::from_str(&json).unwrap()
    }

    fn screen(store: Arc<dyn KeyValueStore>) -> WeatherScreen {
        WeatherScreen::mount(WeatherClient::new("test-key", "us"), store, 5)
    }

    #[test]
    fn test_remember_records_first_slot_temperature() {
        let store = Arc::new(MemoryStore::new());
        let mut screen = screen(store);

        screen.remember("10001", &forecast("21.5"));

        assert_eq!(screen.history().len(), 1);
        assert_eq!(screen.history()[0].zip, "10001");
        assert_eq!(screen.history()[0].temperature, "21.5°C");
    }

    #[test]
    fn test_repeated_zip_refreshes_recency_and_payload() {
        let store = Arc::new(MemoryStore::new());
        let mut screen = screen(store);

        screen.remember("10001", &forecast("21.5"));
        screen.remember("90210", &forecast("28"));
        screen.remember("10001", &forecast("19"));

        let zips: Vec<&str> = screen.history().iter().map(|s| s.zip.as_str()).collect();
        assert_eq!(zips, vec!["10001", "90210"]);
        assert_eq!(screen.history()[0].temperature, "19°C");
    }

    #[test]
    fn test_forecast_without_slots_is_not_recorded() {
        let store = Arc::new(MemoryStore::new());
        let mut screen = screen(store);

        let empty: Forecast = serde_json::from_str(r#"{"list": []}"#).unwrap();
        screen.remember("10001", &empty);

        assert!(screen.history().is_empty());
    }

    #[test]
    fn test_history_survives_remount() {
        let store = Arc::new(MemoryStore::new());

        let mut first = screen(store.clone());
        first.remember("10001", &forecast("21.5"));
        drop(first);

        let second = screen(store);
        assert_eq!(second.history().len(), 1);
        assert_eq!(second.history()[0].zip, "10001");
    }
}
