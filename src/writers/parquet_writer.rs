use crate::error::{ProcessingError, Result};
use crate::models::{GlobalSeries, MonthlySeries};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// One row of an anomaly series file; `month` is 1-12 for monthly series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRow {
    pub year: i32,
    pub month: Option<u8>,
    pub anomaly: Option<f64>,
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write the yearly global series as `year, anomaly`
    pub fn write_global_series(&self, series: &GlobalSeries, path: &Path) -> Result<()> {
        if series.is_empty() {
            return Ok(());
        }

        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("anomaly", DataType::Float64, true),
        ]));

        let years: Vec<i32> = series.keys().copied().collect();
        let anomalies: Vec<Option<f64>> = series.values().copied().collect();

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(years)),
                Arc::new(Float64Array::from(anomalies)),
            ],
        )?;

        self.write_batch(schema, &batch, path)
    }

    /// Write the monthly series as one `year, month, anomaly` row per month
    pub fn write_monthly_series(&self, series: &MonthlySeries, path: &Path) -> Result<()> {
        if series.is_empty() {
            return Ok(());
        }

        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("month", DataType::UInt8, false),
            Field::new("anomaly", DataType::Float64, true),
        ]));

        let mut years = Vec::with_capacity(series.len() * 12);
        let mut months = Vec::with_capacity(series.len() * 12);
        let mut anomalies = Vec::with_capacity(series.len() * 12);
        for (year, values) in series {
            for (month, value) in values.iter().enumerate() {
                years.push(*year);
                months.push(month as u8 + 1);
                anomalies.push(*value);
            }
        }

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(years)),
                Arc::new(UInt8Array::from(months)),
                Arc::new(Float64Array::from(anomalies)),
            ],
        )?;

        self.write_batch(schema, &batch, path)
    }

    fn write_batch(&self, schema: Arc<Schema>, batch: &RecordBatch, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(batch)?;
        writer.close()?;

        Ok(())
    }

    /// Read every row of a global or monthly series file
    pub fn read_series(&self, path: &Path) -> Result<Vec<SeriesRow>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut rows = Vec::new();
        for batch_result in parquet_reader {
            let batch = batch_result?;
            let schema = batch.schema();

            let years = batch
                .column(schema.index_of("year")?)
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat("Invalid year column type".to_string())
                })?;
            let anomalies = batch
                .column(schema.index_of("anomaly")?)
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat("Invalid anomaly column type".to_string())
                })?;
            let months = match schema.index_of("month") {
                Ok(index) => Some(
                    batch
                        .column(index)
                        .as_any()
                        .downcast_ref::<UInt8Array>()
                        .ok_or_else(|| {
                            ProcessingError::InvalidFormat("Invalid month column type".to_string())
                        })?,
                ),
                Err(_) => None,
            };

            for i in 0..batch.num_rows() {
                rows.push(SeriesRow {
                    year: years.value(i),
                    month: months.map(|m| m.value(i)),
                    anomaly: (!anomalies.is_null(i)).then(|| anomalies.value(i)),
                });
            }
        }

        Ok(rows)
    }

    /// Get file information
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            row_group_sizes.push(metadata.row_group(i).num_rows());
        }

        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            Compression::UNCOMPRESSED
        };

        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
    pub columns: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.columns.join(", "),
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}
