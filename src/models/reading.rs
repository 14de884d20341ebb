use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::utils::constants::{MAX_VALID_TEMP, MIN_VALID_TEMP, MONTHS_PER_YEAR, QC_FLAG_ERROR};

/// Station readings keyed by station id
pub type StationsData = HashMap<String, StationRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    Valid,
    FlaggedError,
}

/// One station's monthly mean for one month of one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: Option<f64>,
    pub dm_flag: Option<char>,
    pub qc_flag: Option<char>,
    pub ds_flag: Option<char>,
}

/// True when a temperature lies strictly inside the usable band
pub fn is_within_valid_range(value: f64) -> bool {
    value > MIN_VALID_TEMP && value < MAX_VALID_TEMP
}

impl Reading {
    pub fn new(value: Option<f64>) -> Self {
        Self {
            value,
            dm_flag: None,
            qc_flag: None,
            ds_flag: None,
        }
    }

    pub fn missing() -> Self {
        Self::new(None)
    }

    pub fn with_flags(
        mut self,
        dm_flag: Option<char>,
        qc_flag: Option<char>,
        ds_flag: Option<char>,
    ) -> Self {
        self.dm_flag = dm_flag;
        self.qc_flag = qc_flag;
        self.ds_flag = ds_flag;
        self
    }

    pub fn with_qc_flag(mut self, qc_flag: char) -> Self {
        self.qc_flag = Some(qc_flag);
        self
    }

    pub fn validity(&self) -> Validity {
        match self.qc_flag {
            Some(QC_FLAG_ERROR) => Validity::FlaggedError,
            _ => Validity::Valid,
        }
    }

    /// Value if it lies inside the usable band, regardless of the QC flag
    pub fn in_range_value(&self) -> Option<f64> {
        self.value.filter(|v| is_within_valid_range(*v))
    }

    /// Value if it is in range and not flagged as an error
    pub fn usable_value(&self) -> Option<f64> {
        match self.validity() {
            Validity::Valid => self.in_range_value(),
            Validity::FlaggedError => None,
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::missing()
    }
}

/// The twelve monthly readings a station reported for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationYear {
    pub element: String,
    pub months: [Reading; MONTHS_PER_YEAR],
}

impl StationYear {
    pub fn new(element: String, months: [Reading; MONTHS_PER_YEAR]) -> Self {
        Self { element, months }
    }

    pub fn from_values(element: &str, values: [Option<f64>; MONTHS_PER_YEAR]) -> Self {
        Self {
            element: element.to_string(),
            months: values.map(Reading::new),
        }
    }
}

/// All years of readings for one station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: String,
    years: BTreeMap<i32, StationYear>,
}

impl StationRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            years: BTreeMap::new(),
        }
    }

    /// Insert or replace the readings for a year
    pub fn insert_year(&mut self, year: i32, readings: StationYear) {
        self.years.insert(year, readings);
    }

    pub fn with_year(mut self, year: i32, readings: StationYear) -> Self {
        self.insert_year(year, readings);
        self
    }

    pub fn year(&self, year: i32) -> Option<&StationYear> {
        self.years.get(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = (&i32, &StationYear)> {
        self.years.iter()
    }

    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.keys().next_back().copied()
    }
}
