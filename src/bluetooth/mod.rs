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

//! Bluetooth LE central role.
//!
//! Adapter session handling, timed device discovery, and GATT inspection
//! of remote devices.

mod device;
mod scanner;
mod session;

pub use device::{CharacteristicInfo, DeviceLink, ServiceInfo};
pub use scanner::{start_scan, DiscoveredDevice, ScanHandle, ScanOptions};
pub use session::BleSession;
