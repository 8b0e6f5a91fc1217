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

//! Utility screens.
//!
//! One controller per surface, owning its capability handle and its
//! history feed. Construction performs the feed's one-time load; the
//! `open_feed` helpers open a feed alone for history display.

pub mod barcode;
pub mod bluetooth;
pub mod weather;
pub mod wifi;

pub use barcode::{BarcodeScreen, ScanOutcome, BARCODE_FEED};
pub use bluetooth::{BluetoothScreen, DeviceReport, KnownDevice, BLUETOOTH_FEED};
pub use weather::{WeatherScreen, WeatherSearch, WEATHER_FEED};
pub use wifi::{JoinedNetwork, WifiScreen, WIFI_FEED};
