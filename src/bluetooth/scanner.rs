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

//! Timed, cancellable BLE discovery.
//!
//! A scan runs as a spawned task that owns the discovery session and
//! forwards devices over a channel. The task exits at the deadline, on
//! cancellation, or when the event stream ends; the discovery session is
//! released at that single exit point.

use anyhow::Result;
use bluer::{Adapter, AdapterEvent, Address};
use futures::{pin_mut, Stream, StreamExt};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Scan parameters.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How long to scan before stopping on its own.
    pub timeout: Duration,
    /// Report only devices advertising a name.
    pub named_only: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            named_only: true,
        }
    }
}

/// A device seen during a scan.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    pub address: Address,
    pub name: Option<String>,
    pub rssi: Option<i16>,
}

/// Cancellation handle for a running scan.
///
/// The scan ends on its own at the deadline; `stop` ends it earlier, as
/// does dropping the handle. Calling `stop` more than once is a no-op.
pub struct ScanHandle {
    stop_tx: Option<oneshot::Sender<()>>,
}

impl ScanHandle {
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            debug!("Scan stop requested");
            let _ = tx.send(());
        }
    }
}

/// Start discovery on `adapter`.
///
/// Returns the channel of discovered devices, deduplicated by address, and
/// the handle that cancels the scan.
pub async fn start_scan(
    adapter: &Adapter,
    options: ScanOptions,
) -> Result<(mpsc::Receiver<DiscoveredDevice>, ScanHandle)> {
    let discover = adapter.discover_devices().await?;
    info!(
        "Scanning for {:?} (named devices only: {})",
        options.timeout, options.named_only
    );

    let (device_tx, device_rx) = mpsc::channel(32);
    let (stop_tx, stop_rx) = oneshot::channel();

    let adapter = adapter.clone();
    tokio::spawn(async move {
        run_scan(adapter, discover, options, device_tx, stop_rx).await;
        debug!("Scan finished, discovery released");
    });

    Ok((
        device_rx,
        ScanHandle {
            stop_tx: Some(stop_tx),
        },
    ))
}

async fn run_scan(
    adapter: Adapter,
    discover: impl Stream<Item = AdapterEvent>,
    options: ScanOptions,
    device_tx: mpsc::Sender<DiscoveredDevice>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    pin_mut!(discover);
    let deadline = tokio::time::sleep(options.timeout);
    tokio::pin!(deadline);

    let mut seen: HashSet<Address> = HashSet::new();

    loop {
        tokio::select! {
            _ = &mut deadline => {
                debug!("Scan deadline reached");
                break;
            }
            _ = &mut stop_rx => {
                debug!("Scan cancelled");
                break;
            }
            event = discover.next() => {
                match event {
                    Some(AdapterEvent::DeviceAdded(address)) => {
                        if !seen.insert(address) {
                            continue;
                        }
                        match inspect(&adapter, address, options.named_only).await {
                            Ok(Some(device)) => {
                                // Receiver gone means nobody is listening
                                if device_tx.send(device).await.is_err() {
                                    break;
                                }
                            }
                            Ok(None) => {}
                            Err(e) => warn!("Failed to read device {}: {:#}", address, e),
                        }
                    }
                    Some(_) => {}
                    None => {
                        debug!("Discovery stream ended");
                        break;
                    }
                }
            }
        }
    }
    // The discovery session drops with `discover` when this function
    // returns, on every exit path exactly once.
}

async fn inspect(
    adapter: &Adapter,
    address: Address,
    named_only: bool,
) -> Result<Option<DiscoveredDevice>> {
    let device = adapter.device(address)?;
    let name = device.name().await?;
    if named_only && name.is_none() {
        return Ok(None);
    }
    let rssi = device.rssi().await?;
    Ok(Some(DiscoveredDevice {
        address,
        name,
        rssi,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ScanOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert!(options.named_only);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (tx, mut rx) = oneshot::channel();
        let mut handle = ScanHandle { stop_tx: Some(tx) };

        handle.stop();
        handle.stop();
        handle.stop();

        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_drop_signals_stop() {
        let (tx, mut rx) = oneshot::channel::<()>();
        let handle = ScanHandle { stop_tx: Some(tx) };

        drop(handle);

        // Sender dropped without sending: the scan task sees the channel
        // close and ends the scan.
        assert!(rx.try_recv().is_err());
    }
}
