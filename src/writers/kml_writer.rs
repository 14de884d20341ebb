use crate::error::Result;
use crate::grid::SphereGrid;
use crate::models::StationLocations;
use crate::utils::text::escape_xml;
use std::fmt::Write as _;
use std::path::Path;

const KML_HEADER: &str = "<?xml version=\"1.0\" encoding='UTF-8'?>\n\
<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n\
<Document>\n";
const KML_FOOTER: &str = "</Document>\n</kml>\n";

/// KML 2.2 placemark export for viewing the grid and stations on a globe
pub struct KmlWriter;

impl KmlWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn grid_to_kml(&self, grid: &SphereGrid) -> String {
        let mut kml = String::from(KML_HEADER);
        for cell in grid.cells() {
            let description = format!("{} {}", cell.latitude, cell.longitude);
            push_placemark(
                &mut kml,
                &cell.index.to_string(),
                &description,
                cell.longitude,
                cell.latitude,
                0.0,
            );
        }
        kml.push_str(KML_FOOTER);
        kml
    }

    pub fn stations_to_kml(&self, locations: &StationLocations) -> String {
        let mut kml = String::from(KML_HEADER);
        for location in locations.values() {
            let mut description = format!("{} {}", location.latitude, location.longitude);
            if let Some(country) = &location.country {
                description.push_str(&format!(" {}", country));
            }
            push_placemark(
                &mut kml,
                &location.name,
                &description,
                location.longitude,
                location.latitude,
                location.altitude,
            );
        }
        kml.push_str(KML_FOOTER);
        kml
    }

    pub fn write_grid(&self, grid: &SphereGrid, path: &Path) -> Result<()> {
        std::fs::write(path, self.grid_to_kml(grid))?;
        Ok(())
    }

    pub fn write_stations(&self, locations: &StationLocations, path: &Path) -> Result<()> {
        std::fs::write(path, self.stations_to_kml(locations))?;
        Ok(())
    }
}

impl Default for KmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_placemark(
    kml: &mut String,
    name: &str,
    description: &str,
    longitude: f64,
    latitude: f64,
    altitude: f64,
) {
    // Writing into a String cannot fail
    let _ = write!(
        kml,
        "  <Placemark>\n\
         \x20   <name>{}</name>\n\
         \x20   <description>{}</description>\n\
         \x20   <Point>\n\
         \x20     <coordinates>{},{},{}</coordinates>\n\
         \x20   </Point>\n\
         \x20 </Placemark>\n",
        escape_xml(name),
        escape_xml(description),
        longitude,
        latitude,
        altitude
    );
}
