//! gnuplot export of the anomaly series.
//!
//! Data and script files are written next to each other and gnuplot is run
//! with the output directory as its working directory, so the script refers
//! to bare file names.

use crate::error::{ProcessingError, Result};
use crate::models::{GlobalSeries, MonthlySeries};
use crate::utils::constants::{PLOT_IMAGE_HEIGHT, PLOT_IMAGE_WIDTH, PLOT_SUBTITLE};
use crate::utils::filename::output_file;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files produced for one plot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotFiles {
    pub data: PathBuf,
    pub script: PathBuf,
    pub image: PathBuf,
}

pub struct PlotWriter {
    image_width: u32,
    image_height: u32,
    subtitle: String,
    gnuplot_command: String,
}

impl PlotWriter {
    pub fn new() -> Self {
        Self {
            image_width: PLOT_IMAGE_WIDTH,
            image_height: PLOT_IMAGE_HEIGHT,
            subtitle: PLOT_SUBTITLE.to_string(),
            gnuplot_command: "gnuplot".to_string(),
        }
    }

    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    pub fn with_gnuplot_command(mut self, command: &str) -> Self {
        self.gnuplot_command = command.to_string();
        self
    }

    /// `year    anomaly` lines; years without an anomaly are left out
    pub fn global_data(&self, series: &GlobalSeries) -> String {
        let mut data = String::new();
        for (year, anomaly) in series {
            if let Some(value) = anomaly {
                let _ = writeln!(data, "{}    {}", year, value);
            }
        }
        data
    }

    /// `year` followed by twelve monthly columns, `?` marking absent months
    pub fn monthly_data(&self, series: &MonthlySeries) -> String {
        let mut data = String::new();
        for (year, months) in series {
            let _ = write!(data, "{}", year);
            for value in months {
                match value {
                    Some(v) => {
                        let _ = write!(data, "    {}", v);
                    }
                    None => data.push_str("    ?"),
                }
            }
            data.push('\n');
        }
        data
    }

    /// gnuplot script rendering the global series as a line chart
    pub fn global_script(
        &self,
        series: &GlobalSeries,
        start_year: i32,
        end_year: i32,
        data_file: &str,
        image_file: &str,
    ) -> String {
        let title = format!("Global Temperature Anomalies {} - {}", start_year, end_year);

        let mut script = String::new();
        script.push_str("reset\n");
        let _ = writeln!(script, "set title \"{}\"", title);
        let _ = writeln!(script, "set label \"{}\" at screen 0.34, screen 0.94", self.subtitle);
        if let Some((min, max)) = value_range(series) {
            let _ = writeln!(script, "set yrange [{}:{}]", min, max);
        }
        let _ = writeln!(script, "set xrange [{}:{}]", start_year, end_year);
        script.push_str("set lmargin 9\n");
        script.push_str("set rmargin 2\n");
        script.push_str("set xlabel \"Year\"\n");
        script.push_str("set ylabel \"Average Temperature Anomaly (Celsius)\"\n");
        script.push_str("set grid\n");
        script.push_str("set key right bottom\n");
        let _ = writeln!(
            script,
            "set terminal jpeg size {},{}",
            self.image_width, self.image_height
        );
        let _ = writeln!(script, "set output \"{}\"", image_file);
        let _ = writeln!(script, "plot \"{}\" using 1:2 notitle with lines", data_file);
        script
    }

    /// Write the global data file and script into `output_dir`
    pub fn write_global_plot(
        &self,
        series: &GlobalSeries,
        start_year: i32,
        end_year: i32,
        output_dir: &Path,
        plot_name: &str,
    ) -> Result<PlotFiles> {
        let files = PlotFiles {
            data: output_file(output_dir, plot_name, "data"),
            script: output_file(output_dir, plot_name, "gnuplot"),
            image: output_file(output_dir, plot_name, "jpg"),
        };

        let data_name = format!("{}.data", plot_name);
        let image_name = format!("{}.jpg", plot_name);

        std::fs::write(&files.data, self.global_data(series))?;
        std::fs::write(
            &files.script,
            self.global_script(series, start_year, end_year, &data_name, &image_name),
        )?;

        debug!("Wrote plot script {}", files.script.display());
        Ok(files)
    }

    /// Write the monthly data file into `output_dir`
    pub fn write_monthly_data(
        &self,
        series: &MonthlySeries,
        output_dir: &Path,
        plot_name: &str,
    ) -> Result<PathBuf> {
        let path = output_file(output_dir, plot_name, "data");
        std::fs::write(&path, self.monthly_data(series))?;
        Ok(path)
    }

    /// Run gnuplot on a written script and wait for it to finish
    pub async fn render(&self, files: &PlotFiles) -> Result<()> {
        let working_dir = files.script.parent().unwrap_or_else(|| Path::new("."));
        let script_name = files.script.file_name().ok_or_else(|| {
            ProcessingError::PlotFailed("Plot script has no file name".to_string())
        })?;

        let status = tokio::process::Command::new(&self.gnuplot_command)
            .arg(script_name)
            .current_dir(working_dir)
            .status()
            .await
            .map_err(|e| {
                ProcessingError::PlotFailed(format!(
                    "Could not run {}: {}",
                    self.gnuplot_command, e
                ))
            })?;

        if !status.success() {
            return Err(ProcessingError::PlotFailed(format!(
                "{} exited with {}",
                self.gnuplot_command, status
            )));
        }

        info!("Rendered {}", files.image.display());
        Ok(())
    }
}

impl Default for PlotWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest and largest present value, widened when they coincide so that
/// gnuplot gets a non-empty range
fn value_range(series: &GlobalSeries) -> Option<(f64, f64)> {
    let mut values = series.values().flatten().copied();
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == max {
        Some((min - 0.5, max + 0.5))
    } else {
        Some((min, max))
    }
}
