// src/monitor.rs
//! Task coordination: GPS ingestion, touch monitoring and the decision loop

use crate::{
    config::AppConfig,
    decision::{DecisionLoop, RenderCommand, WAITING_FOR_GPS},
    display::SpeedDisplay,
    error::{Result, SpeedLimitError},
    gps::FixTracker,
    toggle::{self, ToggleState, TouchDebouncer, TouchSensor},
    zones::ZoneIndex,
};
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
    time::Duration,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    task::JoinHandle,
    time::{sleep, timeout, MissedTickBehavior},
};
use tokio_serial::SerialPortBuilderExt;

/// Longest line kept while waiting for a newline. NMEA caps sentences at 82
/// characters, so anything past this is line noise.
pub const MAX_NMEA_LINE: usize = 1024;

/// GPS data source configuration
#[derive(Debug, Clone)]
pub enum GpsSource {
    Serial { port: String, baudrate: u32 },
    /// Recorded NMEA capture, replayed one line per GPS poll interval
    Replay { path: PathBuf },
}

/// Shared state handles plus the configuration the three tasks run with
pub struct SpeedMonitor {
    config: AppConfig,
    tracker: Arc<RwLock<FixTracker>>,
    toggle: ToggleState,
    running: Arc<AtomicBool>,
}

impl SpeedMonitor {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            tracker: Arc::new(RwLock::new(FixTracker::new())),
            toggle: ToggleState::new(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Stop all tasks
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Show the boot screen and load the zone table. A load failure is shown
    /// on the display and returned; the caller must not continue without zones.
    pub fn boot<D: SpeedDisplay + ?Sized>(&self, display: &mut D, zone_file: &Path) -> Result<ZoneIndex> {
        render_or_log(display, &RenderCommand::message("Booting..."));

        log::info!("Attempting to load {}...", zone_file.display());
        match ZoneIndex::load(zone_file) {
            Ok(zones) => {
                render_or_log(display, &RenderCommand::message(WAITING_FOR_GPS));
                Ok(zones)
            }
            Err(e) => {
                log::error!("{}", e);
                render_or_log(display, &RenderCommand::message(e.screen_message()));
                Err(e)
            }
        }
    }

    /// Open the GPS source and spawn the ingestion task
    pub async fn start_gps(&self, source: GpsSource) -> Result<JoinHandle<()>> {
        let tracker = Arc::clone(&self.tracker);
        let running = Arc::clone(&self.running);
        let read_timeout = self.config.read_timeout();

        match source {
            GpsSource::Serial { port, baudrate } => {
                log::info!("Connecting to GPS on {} at {} baud...", port, baudrate);

                let serial = tokio_serial::new(&port, baudrate)
                    .timeout(read_timeout)
                    .open_native_async()
                    .map_err(|e| {
                        SpeedLimitError::Connection(format!("Failed to open serial port {}: {}", port, e))
                    })?;

                log::info!("Connected successfully!");

                Ok(tokio::spawn(async move {
                    ingest_lines(BufReader::new(serial), tracker, running, read_timeout, None).await;
                }))
            }
            GpsSource::Replay { path } => {
                log::info!("Replaying NMEA capture {}", path.display());

                let file = tokio::fs::File::open(&path).await.map_err(|e| {
                    SpeedLimitError::Connection(format!("Failed to open {}: {}", path.display(), e))
                })?;
                let pace = Some(self.config.gps_poll_interval());

                Ok(tokio::spawn(async move {
                    ingest_lines(BufReader::new(file), tracker, running, read_timeout, pace).await;
                }))
            }
        }
    }

    /// Spawn the touch monitoring task
    pub fn start_touch<S>(&self, sensor: S) -> JoinHandle<()>
    where
        S: TouchSensor + Send + 'static,
    {
        tokio::spawn(toggle::run_touch_monitor(
            sensor,
            TouchDebouncer::new(self.config.debounce()),
            self.toggle.clone(),
            Arc::clone(&self.running),
            self.config.touch_poll_interval(),
        ))
    }

    /// Fixed-period decision loop. Render failures are logged and the loop
    /// carries on; it only returns once the monitor is stopped.
    pub async fn run_decision_loop<D: SpeedDisplay + ?Sized>(&self, zones: &ZoneIndex, display: &mut D) {
        log::info!("Starting main application loop...");

        let mut decision = DecisionLoop::new(self.config.start_unit, self.config.max_distance_meters);
        let mut ticker = tokio::time::interval(self.config.update_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.is_running() {
            ticker.tick().await;
            if !self.is_running() {
                break;
            }

            let command = {
                let tracker = read_tracker(&self.tracker);
                decision.step(&self.toggle, &tracker, zones)
            };
            render_or_log(display, &command);
        }
    }

    /// Resolves once the monitor is stopped or Ctrl+C arrives
    pub async fn shutdown_signal(&self) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupt received");
            }
            _ = async {
                while self.is_running() {
                    sleep(Duration::from_millis(50)).await;
                }
            } => {}
        }
        self.stop();
    }
}

fn render_or_log<D: SpeedDisplay + ?Sized>(display: &mut D, command: &RenderCommand) {
    if let Err(e) = display.render(command) {
        log::warn!("Failed to render {:?}: {}", command, e);
    }
}

fn read_tracker(tracker: &RwLock<FixTracker>) -> RwLockReadGuard<'_, FixTracker> {
    tracker.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_tracker(tracker: &RwLock<FixTracker>) -> RwLockWriteGuard<'_, FixTracker> {
    tracker.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Feed NMEA lines from `reader` into the tracker until EOF or shutdown.
///
/// Every read is bounded by `read_timeout` so the task never parks on a
/// silent receiver. A line that grows past `MAX_NMEA_LINE` is dropped.
/// With `pace` set, the task sleeps that long after each iteration
/// (replay); otherwise it only yields between lines.
/// Returns the number of lines handed to the parser.
pub async fn ingest_lines<R>(
    mut reader: R,
    tracker: Arc<RwLock<FixTracker>>,
    running: Arc<AtomicBool>,
    read_timeout: Duration,
    pace: Option<Duration>,
) -> usize
where
    R: AsyncBufRead + Unpin,
{
    log::info!("Starting GPS update task...");

    let mut buf = Vec::new();
    let mut lines = 0;

    while running.load(Ordering::Relaxed) {
        match timeout(read_timeout, reader.read_until(b'\n', &mut buf)).await {
            // Nothing complete yet; partial bytes stay in `buf`
            Err(_) => {
                if buf.len() > MAX_NMEA_LINE {
                    log::warn!("Discarding {} bytes of GPS input without a line break", buf.len());
                    buf.clear();
                }
            }
            Ok(Ok(0)) => {
                if !buf.is_empty() {
                    lines += handle_line(&buf, &tracker);
                }
                log::info!("GPS input ended");
                break;
            }
            Ok(Ok(_)) if buf.len() > MAX_NMEA_LINE => {
                log::warn!("Discarding oversized GPS line ({} bytes)", buf.len());
                buf.clear();
            }
            Ok(Ok(_)) => {
                lines += handle_line(&buf, &tracker);
                buf.clear();
            }
            Ok(Err(e)) => {
                log::warn!("Error reading GPS data: {}", e);
                buf.clear();
                sleep(read_timeout).await;
            }
        }

        match pace {
            Some(interval) => sleep(interval).await,
            None => tokio::task::yield_now().await,
        }
    }

    lines
}

fn handle_line(raw: &[u8], tracker: &RwLock<FixTracker>) -> usize {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line.trim(),
        Err(_) => {
            log::warn!("Skipping non-UTF-8 GPS line ({} bytes)", raw.len());
            return 0;
        }
    };

    if line.is_empty() {
        return 0;
    }

    log::trace!("GPS RAW: {}", line);
    write_tracker(tracker).update_from_sentence(line);
    1
}

/// List available serial ports
pub fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| SpeedLimitError::Other(format!("Failed to list serial ports: {}", e)))?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}
