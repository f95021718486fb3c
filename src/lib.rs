// src/lib.rs
//! Speed Limit Display Library
//!
//! Reads GPS position fixes, finds the nearest geofenced speed limit zone and
//! decides what the speed limit display should show, in MPH or KPH.

pub mod config;
pub mod decision;
pub mod display;
pub mod error;
pub mod geo;
pub mod gps;
pub mod logging;
pub mod monitor;
pub mod toggle;
pub mod zones;

// Re-export main types for convenience
pub use decision::{DecisionLoop, RenderCommand, UnitMode};
pub use error::{Result, SpeedLimitError};
pub use gps::{Fix, FixTracker, GeoCoordinate};
pub use monitor::{GpsSource, SpeedMonitor};
pub use zones::{SpeedZone, ZoneIndex};
