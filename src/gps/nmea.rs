// src/gps/nmea.rs
//! NMEA sentence parsing

use super::data::{Fix, GeoCoordinate};

/// Position sentences shorter than this are ignored outright
const MIN_POSITION_FIELDS: usize = 10;

/// Parse a single NMEA sentence into a fix.
///
/// Returns `None` for sentences that carry no position information (unknown
/// types, truncated lines) so the caller keeps its previous state. A
/// recognised sentence always yields a fix, invalid when the receiver reports
/// no fix or a field fails to decode.
pub fn parse_nmea_sentence(line: &str) -> Option<Fix> {
    let line = line.trim();
    let parts: Vec<&str> = line.split(',').collect();

    match parts[0] {
        "$GPGGA" if parts.len() >= MIN_POSITION_FIELDS => Some(parse_gpgga(&parts)),
        "$GPRMC" if parts.len() >= MIN_POSITION_FIELDS => Some(parse_gprmc(&parts)),
        _ => None,
    }
}

/// Parse GPGGA (Global Positioning System Fix Data) sentence
fn parse_gpgga(parts: &[&str]) -> Fix {
    // Fix quality (field 6): 0 = no fix, 1 = GPS, 2 = DGPS, ...
    let quality = match parts[6].trim().parse::<u8>() {
        Ok(quality) => quality,
        Err(_) => return Fix::invalid(),
    };

    if quality == 0 {
        return Fix::invalid();
    }

    // Latitude (fields 2 and 3), longitude (fields 4 and 5)
    decode_position(parts[2], parts[3], parts[4], parts[5])
}

/// Parse GPRMC (Recommended Minimum Course) sentence
fn parse_gprmc(parts: &[&str]) -> Fix {
    // Status (field 2): A = active, V = void
    if parts[2] != "A" {
        return Fix::invalid();
    }

    // Latitude (fields 3 and 4), longitude (fields 5 and 6)
    decode_position(parts[3], parts[4], parts[5], parts[6])
}

fn decode_position(lat: &str, lat_dir: &str, lon: &str, lon_dir: &str) -> Fix {
    if lat.is_empty() || lon.is_empty() {
        return Fix::invalid();
    }

    let coordinate = parse_latitude(lat, lat_dir)
        .zip(parse_longitude(lon, lon_dir))
        .and_then(|(latitude, longitude)| GeoCoordinate::new(latitude, longitude));

    match coordinate {
        Some(coordinate) => Fix::valid(coordinate),
        None => Fix::invalid(),
    }
}

/// Convert NMEA latitude (DDMM.MMMM) to decimal degrees
pub fn parse_latitude(value: &str, direction: &str) -> Option<f64> {
    let degrees = decode_degrees_minutes(value, 2)?;
    if !GeoCoordinate::is_valid_latitude(degrees) {
        return None;
    }
    Some(if direction == "S" { -degrees } else { degrees })
}

/// Convert NMEA longitude (DDDMM.MMMM) to decimal degrees
pub fn parse_longitude(value: &str, direction: &str) -> Option<f64> {
    let degrees = decode_degrees_minutes(value, 3)?;
    if !GeoCoordinate::is_valid_longitude(degrees) {
        return None;
    }
    Some(if direction == "W" { -degrees } else { degrees })
}

fn decode_degrees_minutes(value: &str, degree_digits: usize) -> Option<f64> {
    let degrees = value.get(..degree_digits)?.parse::<u16>().ok()?;
    let minutes = value.get(degree_digits..)?.parse::<f64>().ok()?;

    // Also rejects NaN
    if !(0.0..60.0).contains(&minutes) {
        return None;
    }

    Some(degrees as f64 + minutes / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GPGGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const GPRMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_gpgga_parsing() {
        let fix = parse_nmea_sentence(GPGGA).unwrap();

        assert!(fix.valid);
        let coordinate = fix.coordinate.unwrap();
        assert_close(coordinate.latitude(), 48.1173);
        assert_close(coordinate.longitude(), 11.516667);
    }

    #[test]
    fn test_gpgga_no_fix_quality() {
        let line = "$GPGGA,123519,4807.038,N,01131.000,E,0,08,0.9,545.4,M,46.9,M,,*47";
        let fix = parse_nmea_sentence(line).unwrap();

        assert!(!fix.valid);
        assert!(fix.coordinate.is_none());
    }

    #[test]
    fn test_gpgga_missing_coordinates() {
        let line = "$GPGGA,123519,,,,,1,08,0.9,545.4,M,46.9,M,,*47";
        let fix = parse_nmea_sentence(line).unwrap();
        assert!(!fix.valid);
    }

    #[test]
    fn test_gpgga_non_numeric_quality() {
        let line = "$GPGGA,123519,4807.038,N,01131.000,E,X,08,0.9,545.4,M,46.9,M,,*47";
        let fix = parse_nmea_sentence(line).unwrap();
        assert!(!fix.valid);
    }

    #[test]
    fn test_gpgga_unparseable_coordinate() {
        let line = "$GPGGA,123519,48xx.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        let fix = parse_nmea_sentence(line).unwrap();
        assert!(!fix.valid);
    }

    #[test]
    fn test_southern_western_hemisphere() {
        let line = "$GPGGA,123519,3351.000,S,15112.000,W,2,08,0.9,545.4,M,46.9,M,,*47";
        let coordinate = parse_nmea_sentence(line).unwrap().coordinate.unwrap();

        assert_close(coordinate.latitude(), -33.85);
        assert_close(coordinate.longitude(), -151.2);
    }

    #[test]
    fn test_gprmc_active() {
        let fix = parse_nmea_sentence(GPRMC).unwrap();

        assert!(fix.valid);
        assert_close(fix.coordinate.unwrap().latitude(), 48.1173);
    }

    #[test]
    fn test_gprmc_void() {
        let line = "$GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
        let fix = parse_nmea_sentence(line).unwrap();
        assert!(!fix.valid);
    }

    #[test]
    fn test_trailing_newline_tolerated() {
        let line = format!("{}\r\n", GPGGA);
        assert!(parse_nmea_sentence(&line).unwrap().valid);
    }

    #[test]
    fn test_unrelated_sentence_ignored() {
        let gsv = "$GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75";
        assert!(parse_nmea_sentence(gsv).is_none());
        assert!(parse_nmea_sentence("$INVALID,123,456").is_none());
        assert!(parse_nmea_sentence("").is_none());
    }

    #[test]
    fn test_truncated_sentence_ignored() {
        assert!(parse_nmea_sentence("$GPGGA,123519,4807.038,N").is_none());
        assert!(parse_nmea_sentence("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4").is_none());
    }

    #[test]
    fn test_coordinate_decoding() {
        assert_close(parse_latitude("4807.038", "N").unwrap(), 48.1173);
        assert_close(parse_latitude("4807.038", "S").unwrap(), -48.1173);
        assert_close(parse_longitude("07500.000", "W").unwrap(), -75.0);

        assert!(parse_latitude("", "N").is_none());
        assert!(parse_latitude("4", "N").is_none());
        assert!(parse_latitude("48", "N").is_none());
        assert!(parse_latitude("48ab", "N").is_none());
        assert!(parse_latitude("4875.000", "N").is_none());
        assert!(parse_latitude("9530.000", "N").is_none());
        assert!(parse_longitude("18500.000", "E").is_none());
    }
}
