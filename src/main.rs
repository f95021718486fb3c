// src/main.rs
//! Speed Limit Display - shows the posted limit for the current GPS position

use anyhow::{bail, Context};
use clap::Parser;
use speed_limit_display::{
    config::AppConfig,
    display::{
        terminal::{KeyboardTouch, TerminalDisplay},
        DedupDisplay,
    },
    logging,
    monitor::{self, GpsSource, SpeedMonitor},
    UnitMode,
};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Parser)]
#[command(name = "speed-limit-display", version, about)]
struct Cli {
    /// Serial port the GPS receiver is attached to
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Replay a recorded NMEA file instead of reading a serial port
    #[arg(long, conflicts_with = "port")]
    replay: Option<PathBuf>,

    /// Speed limit zone table (GeoJSON feature collection)
    #[arg(short, long)]
    zones: Option<PathBuf>,

    /// Decision loop period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Maximum distance to a zone center, in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Start in KPH instead of MPH
    #[arg(long)]
    kph: bool,

    /// Configuration file (defaults to ~/.config/speed-limit-display/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = &self.port {
            config.serial_port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            config.serial_baudrate = baud;
        }
        if let Some(zones) = &self.zones {
            config.zone_file = zones.clone();
        }
        if let Some(interval) = self.interval_ms {
            config.update_interval_ms = interval;
        }
        if let Some(radius) = self.radius {
            config.max_distance_meters = radius;
        }
        if self.kph {
            config.start_unit = UnitMode::Kph;
        }
    }

    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load()?,
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

/// How long a fatal boot error stays on screen before the terminal is restored
const FATAL_ERROR_HOLD: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    if cli.list_ports {
        monitor::list_serial_ports()?;
        return Ok(());
    }

    let config = cli.load_config().context("Invalid configuration")?;

    let source = match (&cli.replay, &config.serial_port) {
        (Some(path), _) => GpsSource::Replay { path: path.clone() },
        (None, Some(port)) => GpsSource::Serial {
            port: port.clone(),
            baudrate: config.serial_baudrate,
        },
        (None, None) => bail!("No GPS source: pass --port <PORT> or --replay <FILE>"),
    };

    log::info!("Initializing components...");
    let monitor = SpeedMonitor::new(config.clone());
    let mut display = DedupDisplay::new(TerminalDisplay::new()?);

    let zones = match monitor.boot(&mut display, &config.zone_file) {
        Ok(zones) => zones,
        Err(e) => {
            if e.is_fatal() {
                // Leave the error on the sign long enough to be read
                tokio::time::sleep(FATAL_ERROR_HOLD).await;
            }
            drop(display);
            return Err(e).with_context(|| format!("Cannot start without {}", config.zone_file.display()));
        }
    };

    let _gps_task = monitor.start_gps(source).await?;
    let _touch_task = monitor.start_touch(KeyboardTouch::new(monitor.running()));

    tokio::select! {
        _ = monitor.run_decision_loop(&zones, &mut display) => {}
        _ = monitor.shutdown_signal() => {}
    }

    monitor.stop();
    drop(display);
    log::info!("Shutting down...");
    Ok(())
}
