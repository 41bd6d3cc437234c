//! Manual score entry as `name,value` lines

use crate::error::{RankingError, Result};
use crate::models::ScoringEvent;
use std::io::BufRead;

/// Largest magnitude accepted for a single entry, in points
pub const MAX_MANUAL_POINTS: f64 = 1_000_000.0;

/// Parse `name,value` lines until end of input
///
/// Values are given in points (`1.5`) and stored in tenths, truncated toward
/// zero. Blank lines are ignored; any other malformed line aborts the entry.
pub fn parse_manual_entries<R: BufRead>(reader: R) -> Result<Vec<ScoringEvent>> {
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        events.push(parse_entry(&line, line_number)?);
    }

    Ok(events)
}

fn parse_entry(line: &str, line_number: usize) -> Result<ScoringEvent> {
    let (name, value) = line.split_once(',').ok_or_else(|| {
        RankingError::invalid_input(format!(
            "line {}: enter name,value (got '{}')",
            line_number,
            line.trim()
        ))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(RankingError::invalid_input(format!(
            "line {}: station name is empty",
            line_number
        )));
    }

    let points: f64 = value.trim().parse().map_err(|_| {
        RankingError::invalid_input(format!(
            "line {}: '{}' should be a number",
            line_number,
            value.trim()
        ))
    })?;
    if !points.is_finite() {
        return Err(RankingError::invalid_input(format!(
            "line {}: '{}' should be a finite number",
            line_number,
            value.trim()
        )));
    }
    if points.abs() > MAX_MANUAL_POINTS {
        return Err(RankingError::invalid_input(format!(
            "line {}: '{}' is outside -{MAX_MANUAL_POINTS}..{MAX_MANUAL_POINTS}",
            line_number,
            value.trim()
        )));
    }

    Ok(ScoringEvent::new(name, (points * 10.0).trunc() as i64))
}
