use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghcn-anomaly")]
#[command(about = "GHCN station temperature anomalies on a spherical grid")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

/// Overrides for the grid size, shared by `process` and `grid`
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    #[arg(long, help = "Grid cells around the equator [default: 72]")]
    pub cells_horizontal: Option<usize>,

    #[arg(long, help = "Grid cells pole to pole [default: 36]")]
    pub cells_vertical: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute baselines and anomalies and write every output
    Process {
        #[arg(short, long, help = "GHCN monthly readings file [default: data/v4.mean]")]
        readings_file: Option<PathBuf>,

        #[arg(short, long, help = "Station inventory file [default: data/wmo.txt]")]
        stations_file: Option<PathBuf>,

        #[arg(long, help = "Country codes file [default: data/v4.country.codes]")]
        countries_file: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output directory [default: output/ghcn-anomaly-{YYMMDD}]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "First anomaly year [default: 1900]")]
        start_year: Option<i32>,

        #[arg(long, help = "Last anomaly year, inclusive [default: 2020]")]
        end_year: Option<i32>,

        #[arg(long, help = "First baseline year [default: 1961]")]
        baseline_start: Option<i32>,

        #[arg(long, help = "Baseline end year, exclusive [default: 1990]")]
        baseline_end: Option<i32>,

        #[command(flatten)]
        grid: GridArgs,

        #[arg(
            long,
            allow_hyphen_values = true,
            help = "Only use stations at or above this latitude"
        )]
        min_latitude: Option<f64>,

        #[arg(
            long,
            allow_hyphen_values = true,
            help = "Only use stations at or below this latitude"
        )]
        max_latitude: Option<f64>,

        #[arg(short, long, help = "Parquet compression [default: snappy]")]
        compression: Option<String>,

        #[arg(long, help = "Memory-map the readings file")]
        mmap: bool,

        #[arg(long, help = "Skip running gnuplot")]
        no_plot: bool,
    },

    /// Generate the grid and export it as KML
    Grid {
        #[arg(short, long, help = "Output KML file [default: grid.kml in the output directory]")]
        output_file: Option<PathBuf>,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Display information about an anomaly Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
