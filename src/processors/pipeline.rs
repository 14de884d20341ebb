use crate::config::AnalysisConfig;
use crate::error::{ProcessingError, Result};
use crate::grid::{assign_stations, SphereGrid};
use crate::models::{GlobalSeries, MonthlySeries, StationLocations, StationsData};
use crate::processors::anomaly::{
    global_anomalies, monthly_anomalies, present_months, AnomalyEngine,
};
use crate::processors::baseline::BaselineEngine;
use crate::readers::{attach_countries, read_countries, ReadingsReader, StationReader};
use crate::utils::constants::{
    GLOBAL_PLOT_NAME, GRID_KML_FILE, MONTHLY_PLOT_NAME, MONTHS_PER_YEAR, STATIONS_KML_FILE,
    SUMMARY_FILE,
};
use crate::utils::filename::{generate_default_output_dir, output_file};
use crate::utils::progress::ProgressReporter;
use crate::writers::{KmlWriter, ParquetWriter, PlotFiles, PlotWriter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything the analysis produced, before anything is written
#[derive(Debug, Clone)]
pub struct Analysis {
    pub grid: SphereGrid,
    pub locations: StationLocations,
    pub global: GlobalSeries,
    pub monthly: MonthlySeries,
    pub stations_assigned: usize,
    pub stations_skipped: usize,
    pub cells_with_baseline: usize,
    pub coverage_percent: u32,
}

/// Summary written next to the other outputs as JSON
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub start_year: i32,
    pub end_year: i32,
    pub baseline_start: i32,
    pub baseline_end: i32,
    pub cells: usize,
    pub occupied_cells: usize,
    pub cells_with_baseline: usize,
    pub station_locations: usize,
    pub stations_assigned: usize,
    pub stations_skipped: usize,
    pub station_records: usize,
    pub coverage_percent: u32,
    pub years_with_anomaly: usize,
    pub global: GlobalSeries,
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "Anomaly Summary:\n\
            - Years: {}-{} (baseline {}-{})\n\
            - Grid cells: {} ({} with stations, {} with a baseline)\n\
            - Stations: {} located, {} assigned, {} skipped, {} with readings\n\
            - Cell coverage: {}%\n\
            - Years with a global anomaly: {}\n\
            - Output directory: {}",
            self.start_year,
            self.end_year,
            self.baseline_start,
            self.baseline_end,
            self.cells,
            self.occupied_cells,
            self.cells_with_baseline,
            self.station_locations,
            self.stations_assigned,
            self.stations_skipped,
            self.station_records,
            self.coverage_percent,
            self.years_with_anomaly,
            self.output_dir.display(),
        )
    }
}

/// Grid, baseline and anomaly stages run in sequence over one configuration
pub struct AnomalyPipeline {
    config: AnalysisConfig,
}

impl AnomalyPipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate_config()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config
            .output_dir
            .clone()
            .unwrap_or_else(generate_default_output_dir)
    }

    /// Read station locations, attaching country names when a codes file exists
    pub fn load_locations(&self) -> Result<StationLocations> {
        let mut locations = StationReader::new().read_stations(&self.config.stations_file)?;
        if locations.is_empty() {
            return Err(ProcessingError::MissingData(format!(
                "No station locations in {}",
                self.config.stations_file.display()
            )));
        }

        match &self.config.countries_file {
            Some(path) if path.exists() => {
                let countries = read_countries(path)?;
                attach_countries(&mut locations, &countries);
            }
            Some(path) => warn!(
                "Country codes file {} not found; stations keep no country",
                path.display()
            ),
            None => {}
        }

        Ok(locations)
    }

    pub fn load_readings(&self) -> Result<StationsData> {
        let stations = ReadingsReader::with_mmap(self.config.use_mmap)
            .read_readings(&self.config.readings_file)?;
        if stations.is_empty() {
            return Err(ProcessingError::MissingData(format!(
                "No station readings in {}",
                self.config.readings_file.display()
            )));
        }
        Ok(stations)
    }

    /// Run assignment, baselines, anomalies and the global reductions
    pub fn analyse(
        &self,
        locations: StationLocations,
        stations: &StationsData,
    ) -> Result<Analysis> {
        let config = &self.config;

        let grid = SphereGrid::try_generate(config.cells_horizontal, config.cells_vertical)?;
        let assignment = assign_stations(grid, locations);

        let baseline = BaselineEngine::new(config.baseline_start, config.baseline_end);
        let (grid, cells_with_baseline) = baseline.update_grid_baselines(assignment.grid, stations);

        let anomaly = AnomalyEngine::new(config.start_year, config.end_year)
            .with_latitude_band(config.latitude_band()?);
        let (grid, coverage_percent) =
            anomaly.update_grid_anomalies(grid, stations, Some(&assignment.locations));

        let global = global_anomalies(&grid, config.start_year, config.end_year);
        let monthly = monthly_anomalies(&grid, config.start_year, config.end_year);
        info!(
            "Global series: {} of {} years, {} of {} months with an anomaly",
            global.values().filter(|v| v.is_some()).count(),
            global.len(),
            monthly.values().map(present_months).sum::<usize>(),
            monthly.len() * MONTHS_PER_YEAR
        );

        Ok(Analysis {
            grid,
            locations: assignment.locations,
            global,
            monthly,
            stations_assigned: assignment.assigned,
            stations_skipped: assignment.skipped,
            cells_with_baseline,
            coverage_percent,
        })
    }

    /// Write KML, gnuplot data, Parquet series; returns the files written
    pub fn write_outputs(&self, analysis: &Analysis, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let config = &self.config;
        std::fs::create_dir_all(output_dir)?;
        let mut files = Vec::new();

        let kml = KmlWriter::new();
        let grid_path = output_dir.join(GRID_KML_FILE);
        kml.write_grid(&analysis.grid, &grid_path)?;
        files.push(grid_path);
        let stations_path = output_dir.join(STATIONS_KML_FILE);
        kml.write_stations(&analysis.locations, &stations_path)?;
        files.push(stations_path);

        let plot = PlotWriter::new();
        let plot_files = plot.write_global_plot(
            &analysis.global,
            config.start_year,
            config.end_year,
            output_dir,
            GLOBAL_PLOT_NAME,
        )?;
        files.push(plot_files.data);
        files.push(plot_files.script);
        files.push(plot.write_monthly_data(&analysis.monthly, output_dir, MONTHLY_PLOT_NAME)?);

        let parquet = ParquetWriter::new().with_compression(&config.compression)?;
        let global_path = output_file(output_dir, GLOBAL_PLOT_NAME, "parquet");
        parquet.write_global_series(&analysis.global, &global_path)?;
        files.push(global_path);
        let monthly_path = output_file(output_dir, MONTHLY_PLOT_NAME, "parquet");
        parquet.write_monthly_series(&analysis.monthly, &monthly_path)?;
        files.push(monthly_path);

        Ok(files)
    }

    /// Full run: read inputs, analyse, write outputs and optionally render the plot
    pub async fn run(&self, progress: Option<&ProgressReporter>) -> Result<PipelineReport> {
        if let Some(p) = progress {
            p.set_message("Reading station locations...");
        }
        let locations = self.load_locations()?;
        let station_locations = locations.len();

        if let Some(p) = progress {
            p.set_message("Reading station readings...");
        }
        let stations = self.load_readings()?;

        if let Some(p) = progress {
            p.set_message("Computing baselines and anomalies...");
        }
        let analysis = self.analyse(locations, &stations)?;

        if let Some(p) = progress {
            p.set_message("Writing outputs...");
        }
        let output_dir = self.output_dir();
        let mut files = self.write_outputs(&analysis, &output_dir)?;

        if self.config.plot {
            if let Some(p) = progress {
                p.set_message("Rendering plot...");
            }
            let plot_files = PlotFiles {
                data: output_file(&output_dir, GLOBAL_PLOT_NAME, "data"),
                script: output_file(&output_dir, GLOBAL_PLOT_NAME, "gnuplot"),
                image: output_file(&output_dir, GLOBAL_PLOT_NAME, "jpg"),
            };
            // A missing gnuplot leaves the data and script usable
            match PlotWriter::new().render(&plot_files).await {
                Ok(()) => files.push(plot_files.image),
                Err(e) => warn!("{}", e),
            }
        }

        let summary_path = output_dir.join(SUMMARY_FILE);
        files.push(summary_path.clone());

        let report = PipelineReport {
            start_year: self.config.start_year,
            end_year: self.config.end_year,
            baseline_start: self.config.baseline_start,
            baseline_end: self.config.baseline_end,
            cells: analysis.grid.len(),
            occupied_cells: analysis.grid.occupied_cells(),
            cells_with_baseline: analysis.cells_with_baseline,
            station_locations,
            stations_assigned: analysis.stations_assigned,
            stations_skipped: analysis.stations_skipped,
            station_records: stations.len(),
            coverage_percent: analysis.coverage_percent,
            years_with_anomaly: analysis.global.values().filter(|v| v.is_some()).count(),
            global: analysis.global,
            output_dir: output_dir.clone(),
            files,
        };
        std::fs::write(&summary_path, serde_json::to_string_pretty(&report)?)?;

        info!(
            "Wrote {} output files to {}",
            report.files.len(),
            output_dir.display()
        );

        if let Some(p) = progress {
            p.finish_with_message("Processing complete");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StationLocation, StationRecord, StationYear};
    use crate::readers::readings_reader::tests::readings_line;
    use crate::readers::station_reader::tests::inventory_line;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn single_year_config() -> AnalysisConfig {
        AnalysisConfig {
            start_year: 2000,
            end_year: 2000,
            baseline_start: 2000,
            baseline_end: 2000,
            plot: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_station_has_zero_anomaly() -> Result<()> {
        let pipeline = AnomalyPipeline::new(single_year_config())?;

        let mut locations = StationLocations::new();
        locations.insert(
            "ST1".to_string(),
            StationLocation::new("ST1".into(), "Equator".into(), 0.0, 0.0, 0.0),
        );
        let mut stations = StationsData::new();
        stations.insert(
            "ST1".to_string(),
            StationRecord::new("ST1")
                .with_year(2000, StationYear::from_values("TAVG", [Some(10.0); 12])),
        );

        let analysis = pipeline.analyse(locations, &stations)?;

        let cell_index = analysis.locations["ST1"].grid_index.ok_or_else(|| {
            ProcessingError::MissingData("station not assigned".into())
        })?;
        let cell = &analysis.grid.cells()[cell_index];
        assert_eq!(cell.baseline, [Some(10.0); 12]);
        assert_eq!(cell.anomaly(2000), Some(0.0));
        assert_eq!(analysis.global.get(&2000), Some(&Some(0.0)));
        assert_eq!(analysis.monthly[&2000], [Some(0.0); 12]);
        assert_eq!(analysis.coverage_percent, 100);
        assert_eq!(analysis.cells_with_baseline, 1);
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalysisConfig {
            cells_horizontal: 0,
            ..Default::default()
        };
        assert!(AnomalyPipeline::new(config).is_err());
    }

    #[tokio::test]
    async fn test_run_writes_outputs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let readings_file = temp_dir.path().join("v4.mean");
        let stations_file = temp_dir.path().join("wmo.txt");
        let output_dir = temp_dir.path().join("out");

        let mut readings = String::new();
        readings.push_str(&readings_line("ST000000001", 1999, [1000; 12], [' '; 12]));
        readings.push('\n');
        readings.push_str(&readings_line("ST000000001", 2000, [1100; 12], [' '; 12]));
        readings.push('\n');
        std::fs::write(&readings_file, readings)?;
        std::fs::write(
            &stations_file,
            inventory_line("ST000000001", 51.5, -0.1, 10.0, "LONDON CITY") + "\n",
        )?;

        let config = AnalysisConfig {
            readings_file,
            stations_file,
            countries_file: None,
            output_dir: Some(output_dir.clone()),
            start_year: 1999,
            end_year: 2000,
            baseline_start: 1999,
            baseline_end: 1999,
            cells_horizontal: 8,
            cells_vertical: 4,
            plot: false,
            ..Default::default()
        };

        let report = AnomalyPipeline::new(config)?.run(None).await?;
        assert_eq!(report.stations_assigned, 1);
        assert_eq!(report.station_records, 1);
        assert_eq!(report.coverage_percent, 100);
        assert_eq!(report.global.get(&1999), Some(&Some(0.0)));
        let anomaly_2000 = report.global[&2000].unwrap_or(f64::NAN);
        assert!((anomaly_2000 - 1.0).abs() < 1e-9);

        for name in [GRID_KML_FILE, STATIONS_KML_FILE, SUMMARY_FILE] {
            assert!(output_dir.join(name).exists(), "missing {}", name);
        }
        assert!(output_dir.join("global_anomalies.gnuplot").exists());
        assert!(output_dir.join("monthly_anomalies.parquet").exists());

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output_dir.join(SUMMARY_FILE))?)?;
        assert_eq!(summary["coverage_percent"], 100);
        assert!(report.summary().contains("Cell coverage: 100%"));
        Ok(())
    }

    fn write_inputs(dir: &Path, readings: &str, stations: &str) -> Result<AnalysisConfig> {
        let readings_file = dir.join("v4.mean");
        let stations_file = dir.join("wmo.txt");
        std::fs::write(&readings_file, readings)?;
        std::fs::write(&stations_file, stations)?;

        Ok(AnalysisConfig {
            readings_file,
            stations_file,
            countries_file: None,
            output_dir: Some(dir.join("out")),
            plot: false,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_run_without_readings_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let stations = inventory_line("ST000000001", 51.5, -0.1, 10.0, "LONDON CITY") + "\n";
        let config = write_inputs(temp_dir.path(), "short\n", &stations)?;

        let result = AnomalyPipeline::new(config)?.run(None).await;
        assert!(matches!(
            result,
            Err(ProcessingError::MissingData(ref m)) if m.contains("readings")
        ));
        assert!(!temp_dir.path().join("out").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_without_station_locations_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let readings = readings_line("ST000000001", 2000, [1000; 12], [' '; 12]) + "\n";
        let config = write_inputs(temp_dir.path(), &readings, "")?;

        let result = AnomalyPipeline::new(config)?.run(None).await;
        assert!(matches!(
            result,
            Err(ProcessingError::MissingData(ref m)) if m.contains("locations")
        ));
        assert!(!temp_dir.path().join("out").exists());
        Ok(())
    }
}
