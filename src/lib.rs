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

//! Fieldkit: Linux field toolbox.
//!
//! Four device-facing surfaces behind one CLI: weather lookup, BLE
//! scanning and inspection, Wi-Fi management, and barcode capture. Each
//! surface keeps a bounded feed of recent entries persisted under the
//! data directory.

pub mod barcode;
pub mod bluetooth;
pub mod cli;
pub mod config;
pub mod history;
pub mod screens;
pub mod weather;
pub mod wifi;

pub use config::Config;
