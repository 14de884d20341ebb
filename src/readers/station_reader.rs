use crate::error::Result;
use crate::models::{StationLocation, StationLocations};
use crate::utils::constants::{
    INVENTORY_ALT_RANGE, INVENTORY_ID_END, INVENTORY_LAT_RANGE, INVENTORY_LON_RANGE,
    INVENTORY_MIN_LINE_LEN, INVENTORY_NAME_START,
};
use crate::utils::coordinates::{parse_coordinate, validate_coordinates};
use crate::utils::text::{decode_text, fixed_field, title_case};
use std::path::Path;
use tracing::{debug, info};
use validator::Validate;

/// Reader for the fixed-width station inventory
pub struct StationReader;

impl StationReader {
    pub fn new() -> Self {
        Self
    }

    /// Read station locations from an inventory file
    pub fn read_stations(&self, path: &Path) -> Result<StationLocations> {
        let bytes = std::fs::read(path)?;
        let content = decode_text(&bytes);

        let mut stations = StationLocations::new();
        let mut skipped = 0usize;

        for line in content.lines() {
            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            match self.parse_station_line(line) {
                Some(station) => {
                    stations.insert(station.id.clone(), station);
                }
                None => {
                    debug!("Skipping malformed inventory line: '{}'", line.trim_end());
                    skipped += 1;
                }
            }
        }

        info!(
            "Loaded {} station locations from {} ({} lines skipped)",
            stations.len(),
            path.display(),
            skipped
        );

        Ok(stations)
    }

    /// Parse a single inventory line, `None` for short or malformed records
    pub fn parse_station_line(&self, line: &str) -> Option<StationLocation> {
        let line = line.trim_end();
        if line.len() < INVENTORY_MIN_LINE_LEN {
            return None;
        }

        let id = fixed_field(line, 0, INVENTORY_ID_END)?.trim().to_string();
        let (lat_start, lat_end) = INVENTORY_LAT_RANGE;
        let (lon_start, lon_end) = INVENTORY_LON_RANGE;
        let latitude = parse_coordinate(fixed_field(line, lat_start, lat_end)?).ok()?;
        let longitude = parse_coordinate(fixed_field(line, lon_start, lon_end)?).ok()?;
        let altitude = fixed_field(line, INVENTORY_ALT_RANGE.0, INVENTORY_ALT_RANGE.1)?
            .trim()
            .parse::<f64>()
            .ok()?;
        let name = fixed_field(line, INVENTORY_NAME_START, line.len())
            .map(|n| title_case(&n.trim().to_lowercase()))
            .unwrap_or_default();

        if let Err(e) = validate_coordinates(latitude, longitude) {
            debug!("Station {}: {}", id, e);
            return None;
        }

        let station = StationLocation::new(id, name, latitude, longitude, altitude);
        station.validate().ok()?;
        Some(station)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Build a fixed-width inventory line
    pub(crate) fn inventory_line(
        id: &str,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        name: &str,
    ) -> String {
        format!(
            "{:<11}{:>9.4}{:>10.4}{:>7.1} {}",
            id, latitude, longitude, altitude, name
        )
    }

    #[test]
    fn test_parse_station_line() {
        let reader = StationReader::new();

        let line = inventory_line("UKM00003772", 51.4780, -0.4610, 25.3, "LONDON/HEATHROW");
        let station = reader.parse_station_line(&line).unwrap();

        assert_eq!(station.id, "UKM00003772");
        assert_eq!(station.name, "London/Heathrow");
        assert!((station.latitude - 51.478).abs() < 0.00001);
        assert!((station.longitude - -0.461).abs() < 0.00001);
        assert!((station.altitude - 25.3).abs() < 0.00001);
        assert_eq!(station.grid_index, None);
    }

    #[test]
    fn test_parse_documented_layout() {
        // 10-character id, latitude in columns 12-19, longitude 21-29
        let line = "ABCDEFGHIJ  12.3456  -45.6789   100.0 SOME PLACE";
        let station = StationReader::new().parse_station_line(line).unwrap();
        assert_eq!(station.id, "ABCDEFGHIJ");
        assert!((station.latitude - 12.3456).abs() < 1e-9);
        assert!((station.longitude - -45.6789).abs() < 1e-9);
        assert!((station.altitude - 100.0).abs() < 1e-9);
        assert_eq!(station.name, "Some Place");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let reader = StationReader::new();
        assert!(reader.parse_station_line("TOO SHORT").is_none());
        assert!(reader
            .parse_station_line(&inventory_line("XX000000001", 95.0, 0.0, 0.0, "NORTH OF NORTH"))
            .is_none());
        assert!(reader
            .parse_station_line("XX000000001   abcdefg  10.0000    12.0 BAD LATITUDE")
            .is_none());
    }

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        let antigua =
            inventory_line("ACW00011604", 17.1167, -61.7833, 10.1, "ST JOHNS COOLIDGE FLD");
        writeln!(temp_file, "{}", antigua)?;
        writeln!(temp_file)?;
        writeln!(temp_file, "short")?;
        let sharjah = inventory_line("AE000041196", 25.333, 55.517, 34.0, "SHARJAH INTER. AIRP");
        writeln!(temp_file, "{}", sharjah)?;

        let stations = StationReader::new().read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations["ACW00011604"].name, "St Johns Coolidge Fld");
        assert_eq!(stations["AE000041196"].name, "Sharjah Inter. Airp");

        Ok(())
    }

    #[test]
    fn test_read_stations_with_legacy_encoding() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        let mut line = inventory_line("FR000007150", 48.7167, 2.3833, 89.0, "ORLY").into_bytes();
        line.extend_from_slice(&[b' ', 0xC9, b'T', b'E', b'\n']);
        temp_file.write_all(&line)?;

        let stations = StationReader::new().read_stations(temp_file.path())?;
        assert_eq!(stations["FR000007150"].name, "Orly Éte");

        Ok(())
    }
}
