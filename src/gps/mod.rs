// src/gps/mod.rs
//! GPS sentence parsing and fix tracking

pub mod data;
pub mod nmea;
pub mod tracker;

pub use data::{Fix, GeoCoordinate};
pub use tracker::{FixState, FixTracker};
