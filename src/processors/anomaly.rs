//! Cell anomalies relative to the cell baseline and their global reductions.
//!
//! Anomaly years are inclusive at both ends. Absence is always `None`; a
//! computed anomaly of exactly zero is a real value and takes part in every
//! reduction.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ProcessingError, Result};
use crate::grid::SphereGrid;
use crate::models::{GlobalSeries, MonthlySeries, MonthlyValues, StationLocations, StationsData};
use crate::processors::accumulator::{MeanAccumulator, MonthlyAccumulator};

/// Inclusive latitude band used to restrict which stations contribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatitudeBand {
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl LatitudeBand {
    pub fn new(min_latitude: f64, max_latitude: f64) -> Result<Self> {
        if !(min_latitude <= max_latitude) {
            return Err(ProcessingError::Config(format!(
                "Latitude band minimum {} exceeds maximum {}",
                min_latitude, max_latitude
            )));
        }
        Ok(Self {
            min_latitude,
            max_latitude,
        })
    }

    pub fn contains(&self, latitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
    }
}

/// A latitude band together with the locations needed to apply it
#[derive(Debug, Clone, Copy)]
pub struct LatitudeFilter<'a> {
    pub band: LatitudeBand,
    pub locations: &'a StationLocations,
}

impl LatitudeFilter<'_> {
    /// Stations without a known location never pass a band
    pub fn accepts(&self, station_id: &str) -> bool {
        self.locations
            .get(station_id)
            .is_some_and(|loc| self.band.contains(loc.latitude))
    }
}

/// Sum the `reading - baseline` contributions of a set of stations for one
/// year, both over the whole year and per month.
fn accumulate_year<I, S>(
    year: i32,
    stations: &StationsData,
    baseline: &MonthlyValues,
    station_ids: I,
    filter: Option<&LatitudeFilter<'_>>,
) -> (MeanAccumulator, MonthlyAccumulator)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut yearly = MeanAccumulator::new();
    let mut monthly = MonthlyAccumulator::new();

    for id in station_ids {
        let id = id.as_ref();
        let Some(readings) = stations.get(id).and_then(|record| record.year(year)) else {
            continue;
        };
        if filter.is_some_and(|f| !f.accepts(id)) {
            continue;
        }

        for (month, reading) in readings.months.iter().enumerate() {
            let Some(reference) = baseline[month] else {
                continue;
            };
            if let Some(value) = reading.in_range_value() {
                let delta = value - reference;
                yearly.add(delta);
                monthly.add(month, delta);
            }
        }
    }

    (yearly, monthly)
}

/// Mean anomaly of a set of stations for one year.
///
/// With `month` set only that calendar month (0-11) contributes, otherwise
/// all twelve do. Months without a baseline and readings outside the usable
/// band are skipped; the result is absent when nothing contributed.
pub fn compute_stations_anomaly<I, S>(
    year: i32,
    stations: &StationsData,
    baseline: &MonthlyValues,
    station_ids: I,
    filter: Option<&LatitudeFilter<'_>>,
    month: Option<usize>,
) -> Option<f64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (yearly, monthly) = accumulate_year(year, stations, baseline, station_ids, filter);
    match month {
        None => yearly.mean(),
        Some(m) => monthly.means().get(m).copied().flatten(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyEngine {
    start_year: i32,
    end_year: i32,
    latitude_band: Option<LatitudeBand>,
}

impl AnomalyEngine {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
            latitude_band: None,
        }
    }

    pub fn with_latitude_band(mut self, band: Option<LatitudeBand>) -> Self {
        self.latitude_band = band;
        self
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Compute yearly and monthly anomalies for every occupied cell.
    ///
    /// Returns the enriched grid and the percentage (floored) of attempted
    /// cell-years that produced a yearly anomaly. Cells without stations are
    /// not attempted. The latitude band only applies when locations are given.
    pub fn update_grid_anomalies(
        &self,
        mut grid: SphereGrid,
        stations: &StationsData,
        locations: Option<&StationLocations>,
    ) -> (SphereGrid, u32) {
        let filter = match (self.latitude_band, locations) {
            (Some(band), Some(locations)) => Some(LatitudeFilter { band, locations }),
            (Some(band), None) => {
                warn!(
                    "Latitude band [{}, {}] ignored: no station locations supplied",
                    band.min_latitude, band.max_latitude
                );
                None
            }
            _ => None,
        };

        let mut attempts: u64 = 0;
        let mut hits: u64 = 0;

        for cell in grid.cells_mut() {
            cell.clear_anomalies();
            if !cell.has_stations() {
                continue;
            }

            for year in self.start_year..=self.end_year {
                let (yearly, monthly) = accumulate_year(
                    year,
                    stations,
                    &cell.baseline,
                    &cell.station_ids,
                    filter.as_ref(),
                );
                let anomaly = yearly.mean();
                if anomaly.is_some() {
                    hits += 1;
                }
                attempts += 1;
                cell.anomalies.insert(year, anomaly);
                cell.anomalies_monthly.insert(year, monthly.means());
            }
        }

        let percent = if attempts > 0 {
            (hits * 100 / attempts) as u32
        } else {
            0
        };

        info!(
            "Computed anomalies {}-{}: {} of {} cell-years covered ({}%)",
            self.start_year, self.end_year, hits, attempts, percent
        );

        (grid, percent)
    }
}

/// Mean of the cells' yearly anomalies for each year in `start_year..=end_year`
pub fn global_anomalies(grid: &SphereGrid, start_year: i32, end_year: i32) -> GlobalSeries {
    (start_year..=end_year)
        .map(|year| {
            let mut acc = MeanAccumulator::new();
            for cell in grid.cells() {
                acc.add_option(cell.anomaly(year));
            }
            (year, acc.mean())
        })
        .collect()
}

/// Mean of the cells' monthly anomalies for each year and calendar month
pub fn monthly_anomalies(grid: &SphereGrid, start_year: i32, end_year: i32) -> MonthlySeries {
    (start_year..=end_year)
        .map(|year| {
            let mut acc = MonthlyAccumulator::new();
            for cell in grid.cells() {
                if let Some(months) = cell.anomalies_monthly.get(&year) {
                    acc.add_values(months);
                }
            }
            (year, acc.means())
        })
        .collect()
}

/// Number of calendar months with a value in a monthly series entry
pub fn present_months(values: &MonthlyValues) -> usize {
    values.iter().filter(|v| v.is_some()).count()
}
