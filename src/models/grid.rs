use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::utils::constants::MONTHS_PER_YEAR;

/// One optional value per calendar month
pub type MonthlyValues = [Option<f64>; MONTHS_PER_YEAR];

/// Global anomaly per year
pub type GlobalSeries = BTreeMap<i32, Option<f64>>;

/// Per-month global anomaly per year
pub type MonthlySeries = BTreeMap<i32, MonthlyValues>;

pub const NO_MONTHLY_VALUES: MonthlyValues = [None; MONTHS_PER_YEAR];

/// A point of the spherical grid together with everything computed for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub station_ids: BTreeSet<String>,
    pub baseline: MonthlyValues,
    pub anomalies: BTreeMap<i32, Option<f64>>,
    pub anomalies_monthly: BTreeMap<i32, MonthlyValues>,
}

impl GridCell {
    pub fn new(index: usize, x: f64, y: f64, z: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            index,
            x,
            y,
            z,
            latitude,
            longitude,
            station_ids: BTreeSet::new(),
            baseline: NO_MONTHLY_VALUES,
            anomalies: BTreeMap::new(),
            anomalies_monthly: BTreeMap::new(),
        }
    }

    pub fn has_stations(&self) -> bool {
        !self.station_ids.is_empty()
    }

    /// Returns true if the station was not already assigned to this cell
    pub fn add_station(&mut self, station_id: &str) -> bool {
        self.station_ids.insert(station_id.to_string())
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.iter().any(Option::is_some)
    }

    pub fn anomaly(&self, year: i32) -> Option<f64> {
        self.anomalies.get(&year).copied().flatten()
    }

    pub fn monthly_anomaly(&self, year: i32, month: usize) -> Option<f64> {
        self.anomalies_monthly
            .get(&year)
            .and_then(|months| months.get(month).copied().flatten())
    }

    /// Drop computed anomalies ahead of a new anomaly pass
    pub fn clear_anomalies(&mut self) {
        self.anomalies.clear();
        self.anomalies_monthly.clear();
    }
}
