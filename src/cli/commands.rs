use crate::cli::args::{Cli, Commands, GridArgs};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::grid::SphereGrid;
use crate::processors::AnomalyPipeline;
use crate::utils::constants::GRID_KML_FILE;
use crate::utils::filename::generate_default_output_dir;
use crate::utils::progress::ProgressReporter;
use crate::writers::{KmlWriter, ParquetWriter};
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose);

    let mut config = AnalysisConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            readings_file,
            stations_file,
            countries_file,
            output_dir,
            start_year,
            end_year,
            baseline_start,
            baseline_end,
            grid,
            min_latitude,
            max_latitude,
            compression,
            mmap,
            no_plot,
        } => {
            if let Some(path) = readings_file {
                config.readings_file = path;
            }
            if let Some(path) = stations_file {
                config.stations_file = path;
            }
            if countries_file.is_some() {
                config.countries_file = countries_file;
            }
            if output_dir.is_some() {
                config.output_dir = output_dir;
            }
            config.start_year = start_year.unwrap_or(config.start_year);
            config.end_year = end_year.unwrap_or(config.end_year);
            config.baseline_start = baseline_start.unwrap_or(config.baseline_start);
            config.baseline_end = baseline_end.unwrap_or(config.baseline_end);
            apply_grid_args(&mut config, &grid);
            if min_latitude.is_some() {
                config.min_latitude = min_latitude;
            }
            if max_latitude.is_some() {
                config.max_latitude = max_latitude;
            }
            if let Some(compression) = compression {
                config.compression = compression;
            }
            config.use_mmap |= mmap;
            if no_plot {
                config.plot = false;
            }

            println!("Processing GHCN readings...");
            println!("Readings file: {}", config.readings_file.display());
            println!("Stations file: {}", config.stations_file.display());
            println!(
                "Grid: {} x {} cells, anomalies {}-{}, baseline {}-{}",
                config.cells_horizontal,
                config.cells_vertical,
                config.start_year,
                config.end_year,
                config.baseline_start,
                config.baseline_end
            );

            let pipeline = AnomalyPipeline::new(config)?;
            let progress = ProgressReporter::new_spinner("Processing data...", false);
            let report = pipeline.run(Some(&progress)).await?;

            println!("\n{}", report.summary());
            println!("Processing complete!");
        }

        Commands::Grid { output_file, grid } => {
            apply_grid_args(&mut config, &grid);
            config.validate_config()?;

            let output_file = match output_file {
                Some(path) => path,
                None => config
                    .output_dir
                    .clone()
                    .unwrap_or_else(generate_default_output_dir)
                    .join(GRID_KML_FILE),
            };
            if let Some(parent) = output_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let sphere = SphereGrid::try_generate(config.cells_horizontal, config.cells_vertical)?;
            KmlWriter::new().write_grid(&sphere, &output_file)?;

            info!("Wrote {} grid cells", sphere.len());
            println!("Wrote {} grid cells to {}", sphere.len(), output_file.display());
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            let rows = writer.read_series(&file)?;
            let present: Vec<f64> = rows.iter().filter_map(|r| r.anomaly).collect();
            if let (Some(first), Some(last)) = (
                rows.iter().map(|r| r.year).min(),
                rows.iter().map(|r| r.year).max(),
            ) {
                println!("\nYears: {}-{}", first, last);
            }
            println!(
                "Rows with an anomaly: {} ({} absent)",
                present.len(),
                rows.len() - present.len()
            );
            if !present.is_empty() {
                let mean = present.iter().sum::<f64>() / present.len() as f64;
                println!("Mean anomaly: {:+.3}°C", mean);
            }

            if sample > 0 {
                println!("\nSample Rows (showing up to {}):", sample);
                for (i, row) in rows.iter().take(sample).enumerate() {
                    let anomaly = row
                        .anomaly
                        .map(|a| format!("{:+.3}°C", a))
                        .unwrap_or_else(|| "no data".to_string());
                    match row.month {
                        Some(month) => {
                            println!("{}. {}-{:02}: {}", i + 1, row.year, month, anomaly)
                        }
                        None => println!("{}. {}: {}", i + 1, row.year, anomaly),
                    }
                }
            }
        }
    }

    Ok(())
}

fn apply_grid_args(config: &mut AnalysisConfig, grid: &GridArgs) {
    if let Some(cells) = grid.cells_horizontal {
        config.cells_horizontal = cells;
    }
    if let Some(cells) = grid.cells_vertical {
        config.cells_vertical = cells;
    }
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ghcn_anomaly={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
