//! Evenly distributed grid cells on the unit sphere.
//!
//! Cells are laid out on a golden-angle (Fibonacci) spiral running from the
//! `y = 1` pole to the `y = -1` pole. Latitude and longitude are derived with
//! `z` as the polar axis, matching [`lat_long_to_unit`], so that a cell's own
//! coordinates map back onto the cell.

use std::f64::consts::PI;

use crate::error::{ProcessingError, Result};
use crate::models::GridCell;
use crate::utils::constants::MAX_GRID_CELLS;
use crate::utils::coordinates::{lat_long_to_unit, unit_to_lat_long};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereGrid {
    cells: Vec<GridCell>,
}

impl SphereGrid {
    /// Checked [`SphereGrid::generate`]: the cell count must not overflow or
    /// exceed [`MAX_GRID_CELLS`]
    pub fn try_generate(cells_horizontal: usize, cells_vertical: usize) -> Result<Self> {
        grid_cell_count(cells_horizontal, cells_vertical)?;
        Ok(Self::generate(cells_horizontal, cells_vertical))
    }

    /// Generate `cells_horizontal * cells_vertical` cells indexed `0..N`
    pub fn generate(cells_horizontal: usize, cells_vertical: usize) -> Self {
        let count = cells_horizontal.saturating_mul(cells_vertical);
        let golden_angle = PI * (3.0 - 5.0_f64.sqrt());

        let cells = (0..count)
            .map(|i| {
                let y = if count > 1 {
                    1.0 - (i as f64 / (count - 1) as f64) * 2.0
                } else {
                    1.0
                };
                let radius = (1.0 - y * y).max(0.0).sqrt();
                let theta = golden_angle * i as f64;

                let x = theta.cos() * radius;
                let z = theta.sin() * radius;

                let (latitude, longitude) = unit_to_lat_long(x, y, z);
                GridCell::new(i, x, y, z, latitude, longitude)
            })
            .collect();

        Self { cells }
    }

    pub fn from_cells(cells: Vec<GridCell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [GridCell] {
        &mut self.cells
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut GridCell> {
        self.cells.get_mut(index)
    }

    /// Number of cells holding at least one station
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.has_stations()).count()
    }

    /// Index of the cell closest to the given coordinate, `None` for an empty grid.
    ///
    /// Linear scan over squared chord distance, which orders points on the
    /// sphere the same way great-circle distance does. Partial sums are
    /// compared after each axis so most cells are rejected early; ties keep
    /// the lowest index.
    pub fn nearest_cell(&self, longitude: f64, latitude: f64) -> Option<usize> {
        let first = self.cells.first()?;
        let (x, y, z) = lat_long_to_unit(latitude, longitude);

        let mut best_index = 0;
        let mut min_dist_sqr = {
            let (dx, dy, dz) = (x - first.x, y - first.y, z - first.z);
            dx * dx + dy * dy + dz * dz
        };

        for (i, cell) in self.cells.iter().enumerate().skip(1) {
            let dx = x - cell.x;
            let mut dist = dx * dx;
            if dist >= min_dist_sqr {
                continue;
            }
            let dy = y - cell.y;
            dist += dy * dy;
            if dist >= min_dist_sqr {
                continue;
            }
            let dz = z - cell.z;
            dist += dz * dz;
            if dist < min_dist_sqr {
                best_index = i;
                min_dist_sqr = dist;
            }
        }

        Some(best_index)
    }
}

/// Number of cells in a `cells_horizontal` by `cells_vertical` grid
pub fn grid_cell_count(cells_horizontal: usize, cells_vertical: usize) -> Result<usize> {
    cells_horizontal
        .checked_mul(cells_vertical)
        .filter(|&count| count <= MAX_GRID_CELLS)
        .ok_or_else(|| {
            ProcessingError::Config(format!(
                "Grid of {} x {} cells exceeds the limit of {} cells",
                cells_horizontal, cells_vertical, MAX_GRID_CELLS
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn brute_force_nearest(grid: &SphereGrid, longitude: f64, latitude: f64) -> usize {
        let (x, y, z) = lat_long_to_unit(latitude, longitude);
        let mut best = (0, f64::INFINITY);
        for cell in grid.cells() {
            let d = (x - cell.x).powi(2) + (y - cell.y).powi(2) + (z - cell.z).powi(2);
            if d < best.1 {
                best = (cell.index, d);
            }
        }
        best.0
    }

    #[test]
    fn test_generate_cell_count_and_indices() {
        for (h, v) in [(1, 2), (2, 3), (72, 36), (10, 10)] {
            let grid = SphereGrid::generate(h, v);
            assert_eq!(grid.len(), h * v);

            let indices: HashSet<usize> = grid.cells().iter().map(|c| c.index).collect();
            assert_eq!(indices.len(), h * v);
            for (i, cell) in grid.cells().iter().enumerate() {
                assert_eq!(cell.index, i);
            }
        }
    }

    #[test]
    fn test_generate_coordinates_in_range() {
        let grid = SphereGrid::generate(72, 36);
        for cell in grid.cells() {
            assert!((-90.0..=90.0).contains(&cell.latitude), "lat {}", cell.latitude);
            assert!((-180.0..=180.0).contains(&cell.longitude), "lon {}", cell.longitude);
            let norm = cell.x * cell.x + cell.y * cell.y + cell.z * cell.z;
            assert!((norm - 1.0).abs() < 1e-9);
            assert!(cell.station_ids.is_empty());
            assert!(!cell.has_baseline());
            assert!(cell.anomalies.is_empty());
        }
    }

    #[test]
    fn test_generate_spiral_endpoints() {
        let grid = SphereGrid::generate(4, 5);
        let first = &grid.cells()[0];
        let last = &grid.cells()[19];
        assert!((first.y - 1.0).abs() < 1e-12);
        assert!((last.y + 1.0).abs() < 1e-12);
        assert!(first.x.abs() < 1e-12 && first.z.abs() < 1e-12);
    }

    #[test]
    fn test_generate_degenerate_sizes() {
        let single = SphereGrid::generate(1, 1);
        assert_eq!(single.len(), 1);
        let cell = &single.cells()[0];
        assert!(cell.latitude.is_finite());
        assert!(cell.longitude.is_finite());
        assert_eq!(single.nearest_cell(-120.0, 45.0), Some(0));

        let empty = SphereGrid::generate(0, 36);
        assert!(empty.is_empty());
        assert_eq!(empty.nearest_cell(0.0, 0.0), None);
    }

    #[test]
    fn test_try_generate_rejects_oversized_grids() {
        assert!(matches!(
            SphereGrid::try_generate(usize::MAX, 2),
            Err(ProcessingError::Config(_))
        ));
        assert!(SphereGrid::try_generate(MAX_GRID_CELLS, 2).is_err());
        assert_eq!(SphereGrid::try_generate(8, 4).map(|g| g.len()).ok(), Some(32));
        assert_eq!(grid_cell_count(72, 36).ok(), Some(2592));
    }

    #[test]
    fn test_nearest_cell_is_idempotent() {
        let grid = SphereGrid::generate(72, 36);
        for cell in grid.cells().iter().step_by(7) {
            assert_eq!(
                grid.nearest_cell(cell.longitude, cell.latitude),
                Some(cell.index),
                "cell {} at ({}, {})",
                cell.index,
                cell.latitude,
                cell.longitude
            );
        }
    }

    #[test]
    fn test_nearest_cell_matches_brute_force() {
        let grid = SphereGrid::generate(24, 12);
        let queries = [
            (0.0, 0.0),
            (-0.461, 51.478),
            (151.21, -33.86),
            (-179.9, 89.9),
            (179.9, -89.9),
            (45.0, 10.0),
        ];
        for (lon, lat) in queries {
            assert_eq!(grid.nearest_cell(lon, lat), Some(brute_force_nearest(&grid, lon, lat)));
        }
    }

    #[test]
    fn test_nearest_cell_ties_keep_lowest_index() {
        let cells = vec![
            GridCell::new(0, 0.0, 1.0, 0.0, 0.0, 90.0),
            GridCell::new(1, 0.0, -1.0, 0.0, 0.0, -90.0),
        ];
        let grid = SphereGrid::from_cells(cells);
        // (lat 0, lon 0) -> (1, 0, 0), equidistant from both cells
        assert_eq!(grid.nearest_cell(0.0, 0.0), Some(0));
    }
}
