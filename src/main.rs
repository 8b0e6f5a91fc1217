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

//! Fieldkit command line entry point.

use anyhow::{anyhow, Result};
use bluer::Address;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldkit::barcode;
use fieldkit::bluetooth::{BleSession, ScanOptions};
use fieldkit::cli::{BarcodeAction, BluetoothAction, Cli, Command, WeatherAction, WifiAction};
use fieldkit::config::Config;
use fieldkit::history::{FileStore, KeyValueStore};
use fieldkit::screens::{
    self, BarcodeScreen, BluetoothScreen, ScanOutcome, WeatherScreen, WeatherSearch, WifiScreen,
};
use fieldkit::weather::WeatherClient;
use fieldkit::wifi::create_manager;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout stays reserved for results
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fieldkit=warn".parse().unwrap()),
        )
        .init();

    info!("Starting fieldkit v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir)?);

    match cli.command {
        Command::Weather { action } => run_weather(action, &config, store).await,
        Command::Bluetooth { action } => run_bluetooth(action, &config, store).await,
        Command::Wifi { action } => run_wifi(action, &config, store).await,
        Command::Barcode { action } => run_barcode(action, &config, store).await,
    }
}

async fn run_weather(
    action: WeatherAction,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
) -> Result<()> {
    let max = config.history.max_entries;

    match action {
        WeatherAction::Lookup { zip } => {
            let client = WeatherClient::new(
                config.weather.api_key.clone(),
                config.weather.country.clone(),
            );
            let mut screen = WeatherScreen::mount(client, store, max);

            let forecast = screen.lookup(&zip).await?;

            if let Some(name) = forecast.city.as_ref().and_then(|c| c.name.as_deref()) {
                println!("Location: {}", name);
            }
            if let Some(slot) = forecast.list.first() {
                if let Some(temp) = slot.main.temp {
                    println!("Temperature: {}°C", temp);
                }
                if let Some(feels) = slot.main.feels_like {
                    println!("Feels like: {}°C", feels);
                }
                if let Some(humidity) = slot.main.humidity {
                    println!("Humidity: {}%", humidity);
                }
                if let Some(conditions) = slot.weather.first().and_then(|c| c.description.as_deref())
                {
                    println!("Conditions: {}", conditions);
                }
            }

            if forecast.list.len() > 1 {
                println!();
                println!("Upcoming:");
                for slot in forecast.list.iter().skip(1).take(4) {
                    let time = slot.dt_txt.as_deref().unwrap_or("-");
                    let temp = slot
                        .main
                        .temp
                        .map(|t| format!("{}°C", t))
                        .unwrap_or_else(|| "-".to_string());
                    println!("  {}  {}", time, temp);
                }
            }

            println!();
            print_searches(screen.history());
        }
        WeatherAction::History => {
            let feed = screens::weather::open_feed(store, max);
            print_searches(feed.entries());
        }
    }

    Ok(())
}

fn print_searches(entries: &[WeatherSearch]) {
    if entries.is_empty() {
        println!("No recent searches.");
        return;
    }
    println!("Recent searches:");
    for entry in entries {
        println!("  {}  {}", entry.zip, entry.temperature);
    }
}

async fn run_bluetooth(
    action: BluetoothAction,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
) -> Result<()> {
    let max = config.history.max_entries;

    match action {
        BluetoothAction::Scan { timeout, all } => {
            let session = BleSession::acquire().await?;
            let screen = BluetoothScreen::mount(session, store, max);

            let options = ScanOptions {
                timeout: Duration::from_secs(timeout.unwrap_or(config.bluetooth.scan_secs)),
                named_only: config.bluetooth.named_only && !all,
            };
            let seconds = options.timeout.as_secs();
            let (mut devices, mut scan) = screen.scan(options).await?;

            println!("Scanning for {}s (Ctrl-C stops early)...", seconds);
            loop {
                tokio::select! {
                    maybe = devices.recv() => match maybe {
                        Some(device) => {
                            let name = device.name.as_deref().unwrap_or("(unnamed)");
                            match device.rssi {
                                Some(rssi) => println!("  {}  {}  {} dBm", device.address, name, rssi),
                                None => println!("  {}  {}", device.address, name),
                            }
                        }
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => {
                        scan.stop();
                    }
                }
            }
            println!("Scan finished.");
        }
        BluetoothAction::Connect { address } => {
            let address: Address = address
                .parse()
                .map_err(|_| anyhow!("Invalid device address '{}'", address))?;

            let session = BleSession::acquire().await?;
            let mut screen = BluetoothScreen::mount(session, store, max);

            let report = screen.inspect(address).await?;

            println!(
                "Connected to {} ({})",
                report.name.as_deref().unwrap_or("unnamed"),
                report.address
            );
            if report.services.is_empty() {
                println!("No GATT services exposed.");
            }
            for service in &report.services {
                let kind = if service.primary { "primary" } else { "secondary" };
                println!("Service {} ({})", service.uuid, kind);
                for characteristic in &service.characteristics {
                    println!(
                        "  {}  [{}]",
                        characteristic.uuid,
                        characteristic.flags.join(", ")
                    );
                }
            }
            println!();
            println!("Disconnected.");
        }
        BluetoothAction::History => {
            let feed = screens::bluetooth::open_feed(store, max);
            if feed.is_empty() {
                println!("No recent connections.");
            } else {
                println!("Recent connections:");
                for device in feed.entries() {
                    println!(
                        "  {}  {}  {}",
                        device.address,
                        device.name.as_deref().unwrap_or("(unnamed)"),
                        device.connected_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run_wifi(
    action: WifiAction,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
) -> Result<()> {
    let max = config.history.max_entries;

    match action {
        WifiAction::Scan => {
            let manager = create_manager(&config.wifi.backend)?;
            let screen = WifiScreen::mount(manager, store, max);

            let networks = screen.scan()?;
            if networks.is_empty() {
                println!("No networks found.");
                return Ok(());
            }

            println!("{:<28} {:>6}  {}", "SSID", "SIGNAL", "SECURITY");
            for network in networks {
                let ssid = network.ssid.as_deref().unwrap_or("(hidden)");
                let signal = network
                    .signal
                    .map(|s| format!("{}%", s))
                    .unwrap_or_else(|| "-".to_string());
                let security = network.security.as_deref().unwrap_or("open");
                println!("{:<28} {:>6}  {}", ssid, signal, security);
            }
        }
        WifiAction::Connect { ssid, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password(&ssid)?,
            };

            let manager = create_manager(&config.wifi.backend)?;
            let mut screen = WifiScreen::mount(manager, store, max);

            let joined = screen.connect(&ssid, &password)?;
            println!("Connected to {}", joined);
        }
        WifiAction::Status => {
            let manager = create_manager(&config.wifi.backend)?;
            let screen = WifiScreen::mount(manager, store, max);

            match screen.status()? {
                Some(ssid) => println!("Connected to {}", ssid),
                None => println!("Not connected."),
            }
        }
        WifiAction::History => {
            let feed = screens::wifi::open_feed(store, max);
            if feed.is_empty() {
                println!("No recent networks.");
            } else {
                println!("Recently joined:");
                for network in feed.entries() {
                    println!(
                        "  {}  {}",
                        network.ssid,
                        network.joined_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
    }

    Ok(())
}

/// Read a password from stdin with a prompt.
fn prompt_password(ssid: &str) -> Result<String> {
    print!("Password for {}: ", ssid);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

async fn run_barcode(
    action: BarcodeAction,
    config: &Config,
    store: Arc<dyn KeyValueStore>,
) -> Result<()> {
    let max = config.history.max_entries;

    match action {
        BarcodeAction::Watch => {
            let mut screen = BarcodeScreen::mount(store, max);
            let mut reader = barcode::stdin_reader();

            println!("Waiting for scans (Ctrl-C or EOF ends)...");
            loop {
                tokio::select! {
                    code = reader.next_code() => match code? {
                        Some(code) => match screen.record_scan(&code) {
                            ScanOutcome::Recorded | ScanOutcome::NotPersisted => {
                                println!("Scanned: {}", code)
                            }
                            ScanOutcome::AlreadyKnown => {
                                println!("Scanned: {} (already in history)", code)
                            }
                        },
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            if !screen.history().is_empty() {
                println!();
                println!("Scan history:");
                for code in screen.history() {
                    println!("  {}", code);
                }
            }
        }
        BarcodeAction::History => {
            let feed = screens::barcode::open_feed(store, max);
            if feed.is_empty() {
                println!("No recent scans.");
            } else {
                println!("Recent scans:");
                for code in feed.entries() {
                    println!("  {}", code);
                }
            }
        }
    }

    Ok(())
}
