pub mod grid;
pub mod reading;
pub mod station;

pub use grid::{GlobalSeries, GridCell, MonthlySeries, MonthlyValues, NO_MONTHLY_VALUES};
pub use reading::{
    is_within_valid_range, Reading, StationRecord, StationYear, StationsData, Validity,
};
pub use station::{StationLocation, StationLocations};
