use tracing::{debug, info};
use validator::Validate;

use crate::grid::SphereGrid;
use crate::models::StationLocations;

/// Result of binning station locations onto a grid
#[derive(Debug, Clone)]
pub struct Assignment {
    pub grid: SphereGrid,
    pub locations: StationLocations,
    pub assigned: usize,
    pub skipped: usize,
}

/// Assign every station to its nearest grid cell.
///
/// Takes ownership of the grid and the locations and hands both back with the
/// cell station sets and each location's `grid_index` filled in. Locations
/// with unusable coordinates are kept but left unassigned.
pub fn assign_stations(mut grid: SphereGrid, mut locations: StationLocations) -> Assignment {
    let mut assigned = 0;
    let mut skipped = 0;

    for location in locations.values_mut() {
        if !location.has_finite_coordinates() || location.validate().is_err() {
            debug!(
                "Skipping station {}: unusable coordinates ({}, {})",
                location.id, location.latitude, location.longitude
            );
            location.grid_index = None;
            skipped += 1;
            continue;
        }

        let Some(index) = grid.nearest_cell(location.longitude, location.latitude) else {
            location.grid_index = None;
            skipped += 1;
            continue;
        };

        if let Some(cell) = grid.cell_mut(index) {
            cell.add_station(&location.id);
        }
        location.grid_index = Some(index);
        assigned += 1;
    }

    info!(
        "Assigned {} stations to {} of {} grid cells ({} skipped)",
        assigned,
        grid.occupied_cells(),
        grid.len(),
        skipped
    );

    Assignment {
        grid,
        locations,
        assigned,
        skipped,
    }
}
