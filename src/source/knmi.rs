//! KNMI daily station data export parsing.
//!
//! The export starts with a `#` commented header describing stations and
//! variables, followed by comma separated rows of station id, `YYYYMMDD` date
//! and the requested variable. Values are right aligned with spaces and a
//! blank value means the station did not report that day.

use super::ObservationSource;
use crate::constants::COMPACT_DATE_FORMAT;
use crate::error::{RankingError, Result};
use crate::models::{DateRange, Reading};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parse the text of a KNMI daily data export
pub fn parse_daily_export(content: &str) -> Result<Vec<Reading>> {
    let mut readings = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        readings.push(parse_row(trimmed, line_number)?);
    }

    debug!("Parsed {} readings from KNMI export", readings.len());
    Ok(readings)
}

fn parse_row(line: &str, line_number: usize) -> Result<Reading> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 {
        return Err(RankingError::source_format(
            line_number,
            format!("expected station,date,value but found '{}'", line),
        ));
    }

    let station_id = fields[0];
    if station_id.is_empty() {
        return Err(RankingError::source_format(line_number, "empty station id"));
    }

    let date = NaiveDate::parse_from_str(fields[1], COMPACT_DATE_FORMAT).map_err(|e| {
        RankingError::source_format(line_number, format!("invalid date '{}': {}", fields[1], e))
    })?;

    let value = match fields[2] {
        "" => None,
        raw => Some(raw.parse::<i64>().map_err(|e| {
            RankingError::source_format(line_number, format!("invalid value '{}': {}", raw, e))
        })?),
    };

    Ok(Reading::new(station_id, date, value))
}

/// Reads readings from a KNMI export saved on disk
#[derive(Debug, Clone)]
pub struct KnmiFileSource {
    path: PathBuf,
}

impl KnmiFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ObservationSource for KnmiFileSource {
    fn fetch(&self, range: &DateRange) -> Result<Vec<Reading>> {
        info!("Reading KNMI export {}", self.path.display());
        let content = fs::read_to_string(&self.path)
            .map_err(|e| RankingError::source_read(&self.path, e))?;

        let readings: Vec<Reading> = parse_daily_export(&content)?
            .into_iter()
            .filter(|reading| range.contains(reading.date))
            .collect();

        debug!("{} readings fall inside {}", readings.len(), range.label());
        Ok(readings)
    }
}
