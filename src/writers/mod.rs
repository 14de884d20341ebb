pub mod kml_writer;
pub mod parquet_writer;
pub mod plot_writer;

pub use kml_writer::KmlWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter, SeriesRow};
pub use plot_writer::{PlotFiles, PlotWriter};
