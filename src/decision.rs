// src/decision.rs
//! Per-cycle decision: fix + zone table + unit mode -> render command

use crate::{gps::FixTracker, toggle::ToggleState, zones::ZoneIndex};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MPH_TO_KPH: f64 = 1.60934;
pub const DEFAULT_MAX_DISTANCE_METERS: f64 = 150.0;

pub const WAITING_FOR_GPS: &str = "Waiting for GPS...";
pub const NO_LIMIT_FOUND: &str = "No limit found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitMode {
    #[default]
    Mph,
    Kph,
}

impl UnitMode {
    pub fn toggled(self) -> Self {
        match self {
            UnitMode::Mph => UnitMode::Kph,
            UnitMode::Kph => UnitMode::Mph,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitMode::Mph => "MPH",
            UnitMode::Kph => "KPH",
        }
    }
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the display should show; the display owns all drawing decisions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    ShowMessage(String),
    ShowSpeedLimit { value: u32, unit: UnitMode },
}

impl RenderCommand {
    pub fn message(text: &str) -> Self {
        RenderCommand::ShowMessage(text.to_string())
    }
}

/// Convert a posted limit in MPH to the display unit, rounded to the nearest integer
pub fn convert_speed(speed_mph: u32, unit: UnitMode) -> u32 {
    match unit {
        UnitMode::Mph => speed_mph,
        UnitMode::Kph => (speed_mph as f64 * MPH_TO_KPH).round() as u32,
    }
}

/// Owns the display unit and turns shared sensor state into render commands
#[derive(Debug, Clone)]
pub struct DecisionLoop {
    unit: UnitMode,
    max_distance_meters: f64,
}

impl Default for DecisionLoop {
    fn default() -> Self {
        Self::new(UnitMode::default(), DEFAULT_MAX_DISTANCE_METERS)
    }
}

impl DecisionLoop {
    pub fn new(unit: UnitMode, max_distance_meters: f64) -> Self {
        Self {
            unit,
            max_distance_meters,
        }
    }

    pub fn unit(&self) -> UnitMode {
        self.unit
    }

    /// Consume a pending touch toggle, if any
    pub fn handle_toggle(&mut self, toggle: &ToggleState) {
        if toggle.get_toggle_status() {
            self.unit = self.unit.toggled();
            log::info!("Unit toggled to: {}", self.unit);
            toggle.reset_toggle_status();
        }
    }

    /// Run one cycle
    pub fn step(
        &mut self,
        toggle: &ToggleState,
        tracker: &FixTracker,
        zones: &ZoneIndex,
    ) -> RenderCommand {
        self.handle_toggle(toggle);

        let Some(position) = tracker.get_coordinates() else {
            log::debug!("No GPS fix yet.");
            return RenderCommand::message(WAITING_FOR_GPS);
        };

        if let Some(age) = tracker.fix_age(Utc::now()) {
            log::debug!("Fix age: {} ms", age.num_milliseconds());
        }

        match zones.nearest_with_distance(position, self.max_distance_meters) {
            Some((zone, distance)) => {
                log::debug!(
                    "GPS: {}, Nearest limit: {} MPH ({:.2}m)",
                    position,
                    zone.speed_limit_mph,
                    distance
                );
                RenderCommand::ShowSpeedLimit {
                    value: convert_speed(zone.speed_limit_mph, self.unit),
                    unit: self.unit,
                }
            }
            None => {
                log::debug!(
                    "GPS: {}, No speed limit found within {}m.",
                    position,
                    self.max_distance_meters
                );
                RenderCommand::message(NO_LIMIT_FOUND)
            }
        }
    }
}
