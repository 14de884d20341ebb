use crate::error::{ProcessingError, Result};

/// Point on the unit sphere
pub type UnitVector = (f64, f64, f64);

/// Convert latitude and longitude in degrees to a point on the unit sphere
///
/// # Examples
/// ```
/// use ghcn_anomaly::utils::lat_long_to_unit;
///
/// let (x, y, z) = lat_long_to_unit(0.0, 0.0);
/// assert!((x - 1.0).abs() < 1e-12 && y.abs() < 1e-12 && z.abs() < 1e-12);
/// ```
pub fn lat_long_to_unit(latitude: f64, longitude: f64) -> UnitVector {
    let lat = latitude.to_radians();
    let lng = longitude.to_radians();
    (lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin())
}

/// Convert a point on the unit sphere back to (latitude, longitude) in degrees
pub fn unit_to_lat_long(x: f64, y: f64, z: f64) -> (f64, f64) {
    // Rounding can push z a hair outside [-1, 1]
    let latitude = z.clamp(-1.0, 1.0).asin().to_degrees();
    let longitude = y.atan2(x).to_degrees();
    (latitude, longitude)
}

/// Parse a decimal coordinate field, tolerating surrounding padding
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();
    let value = trimmed.parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
    })?;

    if !value.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Coordinate is not finite: '{}'",
            coord_str
        )));
    }

    Ok(value)
}

/// Validate that a coordinate pair lies on the globe
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    Ok(())
}
