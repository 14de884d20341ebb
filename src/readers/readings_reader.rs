use crate::error::{ProcessingError, Result};
use crate::models::{Reading, StationRecord, StationYear, StationsData};
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, MAX_DATA_YEAR, MIN_DATA_YEAR, MONTHS_PER_YEAR, READING_ELEMENT_RANGE,
    READING_FIRST_GROUP, READING_GROUP_WIDTH, READING_ID_END, READING_MIN_LINE_LEN,
    READING_VALUE_SCALE, READING_VALUE_WIDTH, READING_YEAR_RANGE,
};
use crate::utils::text::fixed_field;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// One parsed line of the readings file
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingLine {
    pub station_id: String,
    pub year: i32,
    pub readings: StationYear,
}

/// Reader for GHCN-M style monthly readings: one station-year per line with
/// twelve fixed-width value/flag groups.
pub struct ReadingsReader {
    use_mmap: bool,
}

impl ReadingsReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read every station-year in the file
    pub fn read_readings(&self, path: &Path) -> Result<StationsData> {
        let mut stations = StationsData::new();
        let mut parsed = 0usize;
        let mut skipped = 0usize;

        let mut handle_line = |line: &str| {
            if line.trim().is_empty() {
                return;
            }
            match self.parse_reading_line(line) {
                Some(entry) => {
                    stations
                        .entry(entry.station_id.clone())
                        .or_insert_with(|| StationRecord::new(&entry.station_id))
                        .insert_year(entry.year, entry.readings);
                    parsed += 1;
                }
                None => {
                    debug!("Skipping malformed readings line: '{}'", line.trim_end());
                    skipped += 1;
                }
            }
        };

        if self.use_mmap {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            let content = std::str::from_utf8(&mmap)
                .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;
            for line in content.lines() {
                handle_line(line);
            }
        } else {
            let file = File::open(path)?;
            let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            for line_result in reader.lines() {
                let line = line_result?;
                handle_line(&line);
            }
        }

        info!(
            "Loaded {} station-years for {} stations from {} ({} lines skipped)",
            parsed,
            stations.len(),
            path.display(),
            skipped
        );

        Ok(stations)
    }

    /// Parse a single readings line, `None` if the line must be skipped
    pub fn parse_reading_line(&self, line: &str) -> Option<ReadingLine> {
        let line = line.trim_end();
        if line.len() < READING_MIN_LINE_LEN {
            return None;
        }

        let station_id = fixed_field(line, 0, READING_ID_END)?.trim();
        if station_id.is_empty() {
            return None;
        }

        let year = fixed_field(line, READING_YEAR_RANGE.0, READING_YEAR_RANGE.1)?
            .trim()
            .parse::<i32>()
            .ok()?;
        if !(MIN_DATA_YEAR..=MAX_DATA_YEAR).contains(&year) {
            return None;
        }

        let element = fixed_field(line, READING_ELEMENT_RANGE.0, READING_ELEMENT_RANGE.1)?
            .trim()
            .to_string();

        let mut months = [Reading::missing(); MONTHS_PER_YEAR];
        for (month, slot) in months.iter_mut().enumerate() {
            let start = READING_FIRST_GROUP + month * READING_GROUP_WIDTH;
            *slot = Self::parse_group(line, start);
        }

        Some(ReadingLine {
            station_id: station_id.to_string(),
            year,
            readings: StationYear::new(element, months),
        })
    }

    /// Parse one value/dmflag/qcflag/dsflag group; unreadable groups are missing
    fn parse_group(line: &str, start: usize) -> Reading {
        let value = fixed_field(line, start, start + READING_VALUE_WIDTH)
            .and_then(|field| field.trim().parse::<i32>().ok())
            .map(|hundredths| hundredths as f64 / READING_VALUE_SCALE);

        let flag_at = |offset: usize| {
            fixed_field(line, start + offset, start + offset + 1)
                .and_then(|f| f.chars().next())
                .filter(|c| !c.is_whitespace())
        };

        Reading::new(value).with_flags(
            flag_at(READING_VALUE_WIDTH),
            flag_at(READING_VALUE_WIDTH + 1),
            flag_at(READING_VALUE_WIDTH + 2),
        )
    }
}

impl Default for ReadingsReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Build a fixed-width readings line from hundredths and QC flags
    pub(crate) fn readings_line(id: &str, year: i32, values: [i32; 12], qc: [char; 12]) -> String {
        let mut line = format!("{:<11}{:04}TAVG", id, year);
        for (value, flag) in values.iter().zip(qc.iter()) {
            line.push_str(&format!("{:>5} {}{}", value, flag, 'G'));
        }
        line
    }

    #[test]
    fn test_parse_reading_line() {
        let reader = ReadingsReader::new();
        let mut values = [1234; 12];
        values[1] = -1523;
        values[2] = -9999;
        let mut qc = [' '; 12];
        qc[3] = 'M';

        let line = readings_line("ACW00011604", 1961, values, qc);
        let entry = reader.parse_reading_line(&line).unwrap();

        assert_eq!(entry.station_id, "ACW00011604");
        assert_eq!(entry.year, 1961);
        assert_eq!(entry.readings.element, "TAVG");
        assert_eq!(entry.readings.months[0].value, Some(12.34));
        assert_eq!(entry.readings.months[1].value, Some(-15.23));
        assert_eq!(entry.readings.months[2].value, Some(-99.99));
        assert_eq!(entry.readings.months[2].in_range_value(), None);
        assert_eq!(entry.readings.months[0].qc_flag, None);
        assert_eq!(entry.readings.months[0].ds_flag, Some('G'));
        assert_eq!(entry.readings.months[3].qc_flag, Some('M'));
        assert_eq!(entry.readings.months[3].usable_value(), None);
    }

    #[test]
    fn test_ten_character_ids_parse_the_same() {
        let reader = ReadingsReader::new();
        let line = readings_line("ABCDEFGHIJ", 2000, [1000; 12], [' '; 12]);
        let entry = reader.parse_reading_line(&line).unwrap();
        assert_eq!(entry.station_id, "ABCDEFGHIJ");
        assert_eq!(entry.year, 2000);
        assert_eq!(entry.readings.months[11].value, Some(10.0));
    }

    #[test]
    fn test_skipped_lines() {
        let reader = ReadingsReader::new();
        assert!(reader.parse_reading_line("SHORT LINE").is_none());
        assert!(reader
            .parse_reading_line(&readings_line("ACW00011604", 1799, [0; 12], [' '; 12]))
            .is_none());
        assert!(reader
            .parse_reading_line(&readings_line("ACW00011604", 2100, [0; 12], [' '; 12]))
            .is_none());
        assert!(reader.parse_reading_line("ACW00011604 19XXTAVG  1234").is_none());
    }

    #[test]
    fn test_truncated_line_leaves_missing_months() {
        let reader = ReadingsReader::new();
        let full = readings_line("ACW00011604", 1990, [500; 12], [' '; 12]);
        // Keep the first two groups only
        let truncated = &full[..READING_FIRST_GROUP + 2 * READING_GROUP_WIDTH];
        let entry = reader.parse_reading_line(truncated).unwrap();
        assert_eq!(entry.readings.months[1].value, Some(5.0));
        assert_eq!(entry.readings.months[2].value, None);
        assert_eq!(entry.readings.months[11].value, None);
    }

    #[test]
    fn test_read_readings_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", readings_line("ACW00011604", 1961, [100; 12], [' '; 12]))?;
        writeln!(temp_file, "{}", readings_line("ACW00011604", 1962, [200; 12], [' '; 12]))?;
        writeln!(temp_file)?;
        writeln!(temp_file, "garbage")?;
        writeln!(temp_file, "{}", readings_line("AE000041196", 1961, [2500; 12], [' '; 12]))?;

        for reader in [ReadingsReader::new(), ReadingsReader::with_mmap(true)] {
            let stations = reader.read_readings(temp_file.path())?;
            assert_eq!(stations.len(), 2);
            let record = &stations["ACW00011604"];
            assert_eq!(record.year_count(), 2);
            assert_eq!(record.year(1962).unwrap().months[0].value, Some(2.0));
            assert_eq!(stations["AE000041196"].year(1961).unwrap().months[5].value, Some(25.0));
        }

        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let reader = ReadingsReader::new();
        let result = reader.read_readings(Path::new("/nonexistent/v4.mean"));
        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }
}
