//! Per-cell reference baselines.
//!
//! A station's baseline for a month is its mean usable reading over the
//! baseline years; a cell's baseline is the mean of its stations' baselines.
//! A single-year period (`start == end`) uses that year alone, while a
//! multi-year period covers `start..end` with the end year excluded.

use tracing::info;

use crate::grid::SphereGrid;
use crate::models::{MonthlyValues, StationsData, NO_MONTHLY_VALUES};
use crate::processors::accumulator::MonthlyAccumulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineEngine {
    start_year: i32,
    end_year: i32,
}

impl BaselineEngine {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Baseline of one station, absent for months without usable readings
    pub fn compute_station_baseline(
        &self,
        station_id: &str,
        stations: &StationsData,
    ) -> MonthlyValues {
        let Some(record) = stations.get(station_id) else {
            return NO_MONTHLY_VALUES;
        };

        if self.start_year == self.end_year {
            return match record.year(self.start_year) {
                Some(year) => year.months.map(|reading| reading.usable_value()),
                None => NO_MONTHLY_VALUES,
            };
        }

        let mut acc = MonthlyAccumulator::new();
        for year in self.start_year..self.end_year {
            let Some(readings) = record.year(year) else {
                continue;
            };
            for (month, reading) in readings.months.iter().enumerate() {
                if let Some(value) = reading.usable_value() {
                    acc.add(month, value);
                }
            }
        }
        acc.means()
    }

    /// Baseline of a set of stations and whether there was any station to try.
    ///
    /// The flag is true for any non-empty set, even if every month ends up
    /// absent.
    pub fn compute_cell_baseline<I, S>(
        &self,
        stations: &StationsData,
        station_ids: I,
    ) -> (MonthlyValues, bool)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut acc = MonthlyAccumulator::new();
        let mut has_data = false;

        for id in station_ids {
            has_data = true;
            acc.add_values(&self.compute_station_baseline(id.as_ref(), stations));
        }

        if !has_data {
            return (NO_MONTHLY_VALUES, false);
        }
        (acc.means(), true)
    }

    /// Compute and store the baseline of every occupied cell.
    ///
    /// Returns the enriched grid and the number of cells that had stations.
    /// Every cell's previous baseline is discarded first.
    pub fn update_grid_baselines(
        &self,
        mut grid: SphereGrid,
        stations: &StationsData,
    ) -> (SphereGrid, usize) {
        let mut cells_with_data = 0;

        for cell in grid.cells_mut() {
            cell.baseline = NO_MONTHLY_VALUES;
            if !cell.has_stations() {
                continue;
            }
            let (baseline, has_data) = self.compute_cell_baseline(stations, &cell.station_ids);
            cell.baseline = baseline;
            if has_data {
                cells_with_data += 1;
            }
        }

        info!(
            "Computed baselines {}-{} for {} grid cells",
            self.start_year, self.end_year, cells_with_data
        );

        (grid, cells_with_data)
    }
}
