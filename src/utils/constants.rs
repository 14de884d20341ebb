/// Default input file names
pub const DEFAULT_READINGS_FILE: &str = "data/v4.mean";
pub const DEFAULT_COUNTRIES_FILE: &str = "data/v4.country.codes";
pub const DEFAULT_STATIONS_FILE: &str = "data/wmo.txt";

/// Output file names
pub const GRID_KML_FILE: &str = "grid.kml";
pub const STATIONS_KML_FILE: &str = "stations.kml";
pub const GLOBAL_PLOT_NAME: &str = "global_anomalies";
pub const MONTHLY_PLOT_NAME: &str = "monthly_anomalies";
pub const SUMMARY_FILE: &str = "anomaly_summary.json";

/// Readings are only usable strictly inside this band (degrees Celsius)
pub const MIN_VALID_TEMP: f64 = -80.0;
pub const MAX_VALID_TEMP: f64 = 80.0;

/// Quality-control marker for readings flagged as erroneous
pub const QC_FLAG_ERROR: char = 'M';

/// Accepted year span in the readings file
pub const MIN_DATA_YEAR: i32 = 1800;
pub const MAX_DATA_YEAR: i32 = 2099;

pub const MONTHS_PER_YEAR: usize = 12;

/// Fixed-width layout of the readings file (0-based byte offsets)
pub const READING_MIN_LINE_LEN: usize = 20;
pub const READING_ID_END: usize = 11;
pub const READING_YEAR_RANGE: (usize, usize) = (11, 15);
pub const READING_ELEMENT_RANGE: (usize, usize) = (15, 19);
pub const READING_FIRST_GROUP: usize = 19;
pub const READING_GROUP_WIDTH: usize = 8;
pub const READING_VALUE_WIDTH: usize = 5;
pub const READING_VALUE_SCALE: f64 = 100.0;

/// Fixed-width layout of the station inventory file (0-based byte offsets)
pub const INVENTORY_MIN_LINE_LEN: usize = 38;
pub const INVENTORY_ID_END: usize = 11;
pub const INVENTORY_LAT_RANGE: (usize, usize) = (11, 20);
pub const INVENTORY_LON_RANGE: (usize, usize) = (20, 30);
pub const INVENTORY_ALT_RANGE: (usize, usize) = (30, 37);
pub const INVENTORY_NAME_START: usize = 38;

/// Country code file layout
pub const COUNTRY_MIN_LINE_LEN: usize = 5;
pub const COUNTRY_CODE_LEN: usize = 2;
pub const COUNTRY_NAME_START: usize = 3;

/// Analysis defaults
pub const DEFAULT_START_YEAR: i32 = 1900;
pub const DEFAULT_END_YEAR: i32 = 2020;
pub const DEFAULT_BASELINE_START: i32 = 1961;
pub const DEFAULT_BASELINE_END: i32 = 1990;
pub const DEFAULT_CELLS_HORIZONTAL: usize = 72;
pub const DEFAULT_CELLS_VERTICAL: usize = 36;
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Plot rendering
pub const PLOT_IMAGE_WIDTH: u32 = 1000;
pub const PLOT_IMAGE_HEIGHT: u32 = 1000;
pub const PLOT_SUBTITLE: &str = "Source https://www.ncei.noaa.gov/pub/data/ghcn/v4";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "GHCN_ANOMALY";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
