// src/zones.rs
//! Speed limit zone table and nearest-zone lookup

use crate::{
    error::{Result, SpeedLimitError},
    geo::haversine_distance_meters,
    gps::GeoCoordinate,
};
use serde::Deserialize;
use std::path::Path;

/// A point zone carrying a posted limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedZone {
    pub center: GeoCoordinate,
    pub speed_limit_mph: u32,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<ZoneFeature>,
}

#[derive(Debug, Deserialize)]
struct ZoneFeature {
    geometry: ZoneGeometry,
    properties: ZoneProperties,
}

#[derive(Debug, Deserialize)]
struct ZoneGeometry {
    // GeoJSON order: [longitude, latitude, (elevation)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ZoneProperties {
    speed_mph: u32,
}

impl ZoneFeature {
    fn into_zone(self, index: usize) -> Result<SpeedZone> {
        let (longitude, latitude) = match self.geometry.coordinates.as_slice() {
            [longitude, latitude, ..] => (*longitude, *latitude),
            _ => {
                return Err(SpeedLimitError::ZoneTableFormat(format!(
                    "feature {} has fewer than two coordinates",
                    index
                )))
            }
        };

        let center = GeoCoordinate::new(latitude, longitude).ok_or_else(|| {
            SpeedLimitError::ZoneTableFormat(format!(
                "feature {} has out-of-range coordinates [{}, {}]",
                index, longitude, latitude
            ))
        })?;

        Ok(SpeedZone {
            center,
            speed_limit_mph: self.properties.speed_mph,
        })
    }
}

/// Immutable in-memory zone table, scanned linearly on each query
#[derive(Debug, Clone, Default)]
pub struct ZoneIndex {
    zones: Vec<SpeedZone>,
}

impl ZoneIndex {
    pub fn new(zones: Vec<SpeedZone>) -> Self {
        Self { zones }
    }

    /// Load the zone table from a GeoJSON-style file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SpeedLimitError::ZoneTableIo(format!("{}: {}", path.display(), e))
        })?;

        let index = Self::from_geojson_str(&contents)?;
        log::info!(
            "Successfully loaded {} speed limit zones from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Parse a feature collection. Any bad feature rejects the whole table.
    pub fn from_geojson_str(contents: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(contents)
            .map_err(|e| SpeedLimitError::ZoneTableFormat(e.to_string()))?;

        let zones = collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| feature.into_zone(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { zones })
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[SpeedZone] {
        &self.zones
    }

    /// Closest zone within `max_radius_meters`, with its distance.
    /// Equidistant zones resolve to the first one in table order.
    pub fn nearest_with_distance(
        &self,
        position: GeoCoordinate,
        max_radius_meters: f64,
    ) -> Option<(SpeedZone, f64)> {
        let mut best: Option<(SpeedZone, f64)> = None;

        for zone in &self.zones {
            let distance = haversine_distance_meters(position, zone.center);
            if distance > max_radius_meters {
                continue;
            }
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((*zone, distance));
            }
        }

        best
    }

    pub fn nearest(&self, position: GeoCoordinate, max_radius_meters: f64) -> Option<SpeedZone> {
        self.nearest_with_distance(position, max_radius_meters)
            .map(|(zone, _)| zone)
    }
}
