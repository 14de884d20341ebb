//! Analysis configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `GHCN_ANOMALY_*` environment variables. Command-line flags are applied on
//! top by the CLI layer.

use crate::error::{ProcessingError, Result};
use crate::grid::grid_cell_count;
use crate::processors::LatitudeBand;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_BASELINE_END, DEFAULT_BASELINE_START, DEFAULT_CELLS_HORIZONTAL,
    DEFAULT_CELLS_VERTICAL, DEFAULT_COUNTRIES_FILE, DEFAULT_END_YEAR, DEFAULT_READINGS_FILE,
    DEFAULT_START_YEAR, DEFAULT_STATIONS_FILE, ENV_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalysisConfig {
    pub readings_file: PathBuf,
    /// Optional; stations keep no country name when the file is absent
    pub countries_file: Option<PathBuf>,
    pub stations_file: PathBuf,
    /// Defaults to a dated directory under `output/`
    pub output_dir: Option<PathBuf>,

    /// First anomaly year, inclusive
    pub start_year: i32,
    /// Last anomaly year, inclusive
    pub end_year: i32,
    pub baseline_start: i32,
    /// Exclusive unless equal to `baseline_start`
    pub baseline_end: i32,

    #[validate(range(min = 1))]
    pub cells_horizontal: usize,
    #[validate(range(min = 1))]
    pub cells_vertical: usize,

    #[validate(range(min = -90.0, max = 90.0))]
    pub min_latitude: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub max_latitude: Option<f64>,

    pub compression: String,
    pub use_mmap: bool,
    pub plot: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            readings_file: PathBuf::from(DEFAULT_READINGS_FILE),
            countries_file: Some(PathBuf::from(DEFAULT_COUNTRIES_FILE)),
            stations_file: PathBuf::from(DEFAULT_STATIONS_FILE),
            output_dir: None,
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            baseline_start: DEFAULT_BASELINE_START,
            baseline_end: DEFAULT_BASELINE_END,
            cells_horizontal: DEFAULT_CELLS_HORIZONTAL,
            cells_vertical: DEFAULT_CELLS_VERTICAL,
            min_latitude: None,
            max_latitude: None,
            compression: COMPRESSION_SNAPPY.to_string(),
            use_mmap: false,
            plot: true,
        }
    }
}

impl AnalysisConfig {
    /// Load defaults, then the TOML file if given, then the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AnalysisConfig::default())?);

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ProcessingError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Total number of grid cells, rejecting grids that overflow or are too large
    pub fn cell_count(&self) -> Result<usize> {
        grid_cell_count(self.cells_horizontal, self.cells_vertical)
    }

    pub fn validate_config(&self) -> Result<()> {
        self.validate()?;
        self.cell_count()?;

        if self.end_year < self.start_year {
            return Err(ProcessingError::Config(format!(
                "End year {} is before start year {}",
                self.end_year, self.start_year
            )));
        }
        if self.baseline_end < self.baseline_start {
            return Err(ProcessingError::Config(format!(
                "Baseline end {} is before baseline start {}",
                self.baseline_end, self.baseline_start
            )));
        }
        if self.min_latitude.is_some() != self.max_latitude.is_some() {
            return Err(ProcessingError::Config(
                "Latitude band needs both a minimum and a maximum".to_string(),
            ));
        }
        self.latitude_band()?;

        Ok(())
    }

    pub fn latitude_band(&self) -> Result<Option<LatitudeBand>> {
        match (self.min_latitude, self.max_latitude) {
            (Some(min), Some(max)) => Ok(Some(LatitudeBand::new(min, max)?)),
            _ => Ok(None),
        }
    }
}
