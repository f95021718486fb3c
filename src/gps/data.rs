// src/gps/data.rs
//! Position fix data structures

/// A position in decimal degrees. Only constructible through `new`, so the
/// range invariant always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, rejecting values outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if Self::is_valid_latitude(latitude) && Self::is_valid_longitude(longitude) {
            Some(Self { latitude, longitude })
        } else {
            None
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn is_valid_latitude(latitude: f64) -> bool {
        (-90.0..=90.0).contains(&latitude)
    }

    pub fn is_valid_longitude(longitude: f64) -> bool {
        (-180.0..=180.0).contains(&longitude)
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Result of decoding one position sentence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fix {
    pub coordinate: Option<GeoCoordinate>,
    pub valid: bool,
}

impl Fix {
    pub fn valid(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            valid: true,
        }
    }

    pub fn invalid() -> Self {
        Self {
            coordinate: None,
            valid: false,
        }
    }

    /// Coordinate only when the fix is usable
    pub fn position(&self) -> Option<GeoCoordinate> {
        if self.valid {
            self.coordinate
        } else {
            None
        }
    }
}
