//! Integration tests for history persistence across restarts.

use std::sync::Arc;

use fieldkit::history::{DedupPolicy, FileStore, HistoryFeed, KeyValueStore};
use fieldkit::screens::{self, KnownDevice, WeatherSearch};
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::new(dir.path()).unwrap())
}

fn search(zip: &str, temperature: &str) -> WeatherSearch {
    WeatherSearch {
        zip: zip.to_string(),
        temperature: temperature.to_string(),
    }
}

#[test]
fn test_searches_survive_restart() {
    let dir = TempDir::new().unwrap();

    // First run records two lookups
    {
        let mut feed = screens::weather::open_feed(file_store(&dir), 5);
        feed.record(search("10001", "21.5°C")).unwrap();
        feed.record(search("90210", "28°C")).unwrap();
    }

    // Second run sees them, most recent first
    let feed = screens::weather::open_feed(file_store(&dir), 5);
    let zips: Vec<&str> = feed.entries().iter().map(|s| s.zip.as_str()).collect();
    assert_eq!(zips, vec!["90210", "10001"]);
}

#[test]
fn test_eviction_order_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = screens::weather::open_feed(file_store(&dir), 5);
        for zip in ["10001", "10002", "10003", "10004", "10005", "10006"] {
            feed.record(search(zip, "20°C")).unwrap();
        }
    }

    let feed = screens::weather::open_feed(file_store(&dir), 5);
    let zips: Vec<&str> = feed.entries().iter().map(|s| s.zip.as_str()).collect();
    assert_eq!(zips, vec!["10006", "10005", "10004", "10003", "10002"]);
}

#[test]
fn test_refresh_recency_spans_restarts() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = screens::weather::open_feed(file_store(&dir), 5);
        feed.record(search("10001", "21.5°C")).unwrap();
        feed.record(search("90210", "28°C")).unwrap();
    }

    // Looking up a known zip again moves it to the front with new data
    {
        let mut feed = screens::weather::open_feed(file_store(&dir), 5);
        feed.record(search("10001", "19°C")).unwrap();
    }

    let feed = screens::weather::open_feed(file_store(&dir), 5);
    assert_eq!(feed.len(), 2);
    assert_eq!(feed.entries()[0].zip, "10001");
    assert_eq!(feed.entries()[0].temperature, "19°C");
}

#[test]
fn test_rescanned_barcode_stays_put_across_restarts() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = screens::barcode::open_feed(file_store(&dir), 5);
        assert!(feed.record("8901030895559".to_string()).unwrap());
        assert!(feed.record("4006381333931".to_string()).unwrap());
    }

    // Rescan of a known code after restart is discarded
    {
        let mut feed = screens::barcode::open_feed(file_store(&dir), 5);
        assert!(!feed.record("8901030895559".to_string()).unwrap());
    }

    let feed = screens::barcode::open_feed(file_store(&dir), 5);
    assert_eq!(
        feed.entries(),
        ["4006381333931".to_string(), "8901030895559".to_string()]
    );
}

#[test]
fn test_corrupt_file_degrades_to_empty_and_recovers() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = screens::weather::open_feed(file_store(&dir), 5);
        feed.record(search("10001", "21.5°C")).unwrap();
    }

    // Garbage on disk must not prevent startup
    std::fs::write(dir.path().join("weather.json"), "{oops").unwrap();

    let mut feed = screens::weather::open_feed(file_store(&dir), 5);
    assert!(feed.is_empty());

    // The next record heals the file
    feed.record(search("90210", "28°C")).unwrap();
    drop(feed);

    let healed = screens::weather::open_feed(file_store(&dir), 5);
    assert_eq!(healed.len(), 1);
    assert_eq!(healed.entries()[0].zip, "90210");
}

#[test]
fn test_feeds_do_not_interfere() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);

    let mut weather = screens::weather::open_feed(store.clone(), 5);
    let mut barcode = screens::barcode::open_feed(store.clone(), 5);
    let mut bluetooth = screens::bluetooth::open_feed(store.clone(), 5);

    weather.record(search("10001", "21.5°C")).unwrap();
    barcode.record("8901030895559".to_string()).unwrap();
    bluetooth
        .record(KnownDevice {
            address: "AA:BB:CC:DD:EE:FF".to_string(),
            name: Some("Thermometer".to_string()),
            connected_at: chrono::Local::now(),
        })
        .unwrap();

    // One document per feed
    assert!(dir.path().join("weather.json").exists());
    assert!(dir.path().join("barcode.json").exists());
    assert!(dir.path().join("bluetooth.json").exists());

    drop(weather);
    let weather = screens::weather::open_feed(store, 5);
    assert_eq!(weather.len(), 1);
}

#[test]
fn test_stored_documents_are_plain_json_arrays() {
    let dir = TempDir::new().unwrap();

    let mut feed = screens::barcode::open_feed(file_store(&dir), 5);
    feed.record("111".to_string()).unwrap();
    feed.record("222".to_string()).unwrap();

    let blob = std::fs::read_to_string(dir.path().join("barcode.json")).unwrap();
    let parsed: Vec<String> = serde_json::from_str(&blob).unwrap();
    assert_eq!(parsed, ["222".to_string(), "111".to_string()]);
}

#[test]
fn test_shrunk_capacity_truncates_on_open() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = screens::barcode::open_feed(file_store(&dir), 5);
        for code in ["1", "2", "3", "4", "5"] {
            feed.record(code.to_string()).unwrap();
        }
    }

    // Reopening with a smaller cap keeps only the most recent entries
    let feed: HistoryFeed<String> =
        HistoryFeed::open(file_store(&dir), "barcode", 2, DedupPolicy::KeepExisting);
    assert_eq!(feed.entries(), ["5".to_string(), "4".to_string()]);
}
