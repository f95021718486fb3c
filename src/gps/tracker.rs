// src/gps/tracker.rs
//! Latest-fix state machine

use super::data::{Fix, GeoCoordinate};
use super::nmea;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FixState {
    #[default]
    NoFix,
    HasFix(GeoCoordinate),
}

/// Holds only the most recent fix; older fixes are dropped as soon as a new
/// sentence arrives.
#[derive(Debug, Clone, Default)]
pub struct FixTracker {
    state: FixState,
    last_update: Option<DateTime<Utc>>,
}

impl FixTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FixState {
        self.state
    }

    /// Time of the most recent valid fix
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Time elapsed since the most recent valid fix, as seen from `now`
    pub fn fix_age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_update.map(|ts| now.signed_duration_since(ts))
    }

    /// Apply a parser result. `None` (unrelated sentence) leaves the state alone.
    pub fn apply(&mut self, parsed: Option<Fix>) {
        let Some(fix) = parsed else {
            return;
        };

        match fix.position() {
            Some(coordinate) => {
                self.state = FixState::HasFix(coordinate);
                self.last_update = Some(Utc::now());
            }
            None => {
                if let (FixState::HasFix(coordinate), Some(ts)) = (self.state, self.last_update) {
                    log::debug!(
                        "GPS fix lost (last fix {} at {})",
                        coordinate,
                        ts.format("%H:%M:%S%.3f")
                    );
                }
                self.state = FixState::NoFix;
            }
        }
    }

    /// Parse one raw sentence and apply it
    pub fn update_from_sentence(&mut self, line: &str) {
        self.apply(nmea::parse_nmea_sentence(line));
    }

    /// Current coordinate, only while a fix is held
    pub fn get_coordinates(&self) -> Option<GeoCoordinate> {
        match self.state {
            FixState::HasFix(coordinate) => Some(coordinate),
            FixState::NoFix => None,
        }
    }

    pub fn has_fix(&self) -> bool {
        self.get_coordinates().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GPGGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const GPGGA_NO_FIX: &str = "$GPGGA,123519,,,,,0,00,99.9,,M,,M,,*48";
    const GPGSV: &str = "$GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75";

    #[test]
    fn test_starts_without_fix() {
        let tracker = FixTracker::new();
        assert_eq!(tracker.state(), FixState::NoFix);
        assert!(tracker.get_coordinates().is_none());
        assert!(tracker.last_update().is_none());
    }

    #[test]
    fn test_valid_sentence_acquires_fix() {
        let mut tracker = FixTracker::new();
        tracker.update_from_sentence(GPGGA);

        assert!(tracker.has_fix());
        assert!(tracker.last_update().is_some());
        assert!((tracker.get_coordinates().unwrap().latitude() - 48.1173).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_sentence_drops_fix() {
        let mut tracker = FixTracker::new();
        tracker.update_from_sentence(GPGGA);
        tracker.update_from_sentence(GPGGA_NO_FIX);

        assert_eq!(tracker.state(), FixState::NoFix);
    }

    #[test]
    fn test_unrelated_sentence_keeps_fix() {
        let mut tracker = FixTracker::new();
        tracker.update_from_sentence(GPGGA);
        tracker.update_from_sentence(GPGSV);
        tracker.update_from_sentence("$GPGGA,123519,4807.038,N");

        assert!(tracker.has_fix());
    }

    #[test]
    fn test_new_fix_replaces_old() {
        let mut tracker = FixTracker::new();
        tracker.update_from_sentence(GPGGA);
        tracker.update_from_sentence(
            "$GPRMC,123520,A,4000.000,N,07500.000,W,022.4,084.4,230394,003.1,W*6A",
        );

        let coordinate = tracker.get_coordinates().unwrap();
        assert!((coordinate.latitude() - 40.0).abs() < 1e-9);
        assert!((coordinate.longitude() + 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_fix_age_tracks_last_valid_fix() {
        let mut tracker = FixTracker::new();
        assert!(tracker.fix_age(Utc::now()).is_none());

        tracker.update_from_sentence(GPGGA);
        let fixed_at = tracker.last_update().unwrap();
        let later = fixed_at + Duration::seconds(5);
        assert_eq!(tracker.fix_age(later), Some(Duration::seconds(5)));

        // Losing the fix keeps the timestamp of the last good one
        tracker.update_from_sentence(GPGGA_NO_FIX);
        assert_eq!(tracker.last_update(), Some(fixed_at));
        assert_eq!(tracker.fix_age(later), Some(Duration::seconds(5)));
    }
}
