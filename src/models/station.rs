use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Station locations keyed by station id, ordered for stable exports
pub type StationLocations = BTreeMap<String, StationLocation>;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationLocation {
    #[validate(length(min = 1))]
    pub id: String,

    pub name: String,

    pub country: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub altitude: f64,

    /// Grid cell the station was assigned to, set during assignment
    pub grid_index: Option<usize>,
}

impl StationLocation {
    pub fn new(id: String, name: String, latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            id,
            name,
            country: None,
            latitude,
            longitude,
            altitude,
            grid_index: None,
        }
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    /// GHCN ids start with a two-letter country code
    pub fn country_code(&self) -> Option<&str> {
        self.id.get(..2)
    }

    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validation() {
        let station = StationLocation::new(
            "UKM00003772".to_string(),
            "London/Heathrow".to_string(),
            51.478,
            -0.461,
            25.0,
        );

        assert!(station.validate().is_ok());
        assert_eq!(station.country_code(), Some("UK"));
        assert!(station.has_finite_coordinates());
        assert_eq!(station.grid_index, None);
    }

    #[test]
    fn test_invalid_coordinates() {
        let station = StationLocation::new(
            "XX000000001".to_string(),
            "Invalid Station".to_string(),
            91.0, // Invalid latitude
            -0.1278,
            0.0,
        );
        assert!(station.validate().is_err());

        let station = StationLocation::new(String::new(), "No Id".to_string(), 0.0, 0.0, 0.0);
        assert!(station.validate().is_err());
    }
}
