// src/config.rs
//! Configuration management

use crate::{
    decision::{UnitMode, DEFAULT_MAX_DISTANCE_METERS},
    error::{Result, SpeedLimitError},
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial_port: Option<String>,
    pub serial_baudrate: u32,
    pub zone_file: PathBuf,
    pub update_interval_ms: u64,
    pub gps_poll_ms: u64,
    pub touch_poll_ms: u64,
    pub debounce_ms: u64,
    pub read_timeout_ms: u64,
    pub max_distance_meters: f64,
    pub start_unit: UnitMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            serial_port: None,
            serial_baudrate: 9600,
            zone_file: PathBuf::from("speed_limits.json"),
            update_interval_ms: 2000,
            gps_poll_ms: 100,
            touch_poll_ms: 50,
            debounce_ms: 300,
            read_timeout_ms: 100,
            max_distance_meters: DEFAULT_MAX_DISTANCE_METERS,
            start_unit: UnitMode::Mph,
        }
    }
}

impl AppConfig {
    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::get_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| SpeedLimitError::Other(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| SpeedLimitError::Other(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SpeedLimitError::Other(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|e| SpeedLimitError::Other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// `$HOME/.config/speed-limit-display/config.json`
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| SpeedLimitError::Other("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("speed-limit-display")
            .join("config.json"))
    }

    /// Reject intervals that would spin a task or a negative search radius
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("update_interval_ms", self.update_interval_ms),
            ("gps_poll_ms", self.gps_poll_ms),
            ("touch_poll_ms", self.touch_poll_ms),
            ("read_timeout_ms", self.read_timeout_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(SpeedLimitError::Other(format!("{} must be greater than zero", name)));
            }
        }

        if self.max_distance_meters.is_nan() || self.max_distance_meters < 0.0 {
            return Err(SpeedLimitError::Other(format!(
                "max_distance_meters must be non-negative, got {}",
                self.max_distance_meters
            )));
        }

        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn gps_poll_interval(&self) -> Duration {
        Duration::from_millis(self.gps_poll_ms)
    }

    pub fn touch_poll_interval(&self) -> Duration {
        Duration::from_millis(self.touch_poll_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.serial_port = Some(port);
        self.serial_baudrate = baudrate;
    }
}
