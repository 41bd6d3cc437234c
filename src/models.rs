//! Core data structures for the frost ranking.
//!
//! Defines leaderboard entries, scoring events, raw readings and the date
//! ranges used to request them.

use crate::constants::{COMPACT_DATE_FORMAT, ISO_DATE_FORMAT};
use crate::error::{RankingError, Result};
use chrono::NaiveDate;

/// One leaderboard entry
///
/// Scores and gains are fixed point values in tenths of a degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    pub score: i64,
    /// Rank in the previous persisted snapshot, 0 for a station not yet ranked
    pub rank: u32,
    /// Rank after the latest recomputation
    pub new_rank: u32,
    /// Points added by the most recent batch
    pub gain: i64,
}

impl Station {
    /// Create a station that has never been ranked
    pub fn unranked(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
            rank: 0,
            new_rank: 0,
            gain: 0,
        }
    }

    /// Create a station restored from a persisted snapshot
    pub fn restored(name: impl Into<String>, rank: u32, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
            rank,
            new_rank: rank,
            gain: 0,
        }
    }

    /// True when the station has no previous rank
    pub fn is_new(&self) -> bool {
        self.rank == 0
    }

    /// Positions climbed since the previous snapshot (negative when dropping)
    pub fn rank_delta(&self) -> i64 {
        i64::from(self.rank) - i64::from(self.new_rank)
    }
}

/// Points for one station within a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringEvent {
    pub station: String,
    pub value: i64,
}

impl ScoringEvent {
    pub fn new(station: impl Into<String>, value: i64) -> Self {
        Self {
            station: station.into(),
            value,
        }
    }
}

/// A daily reading as delivered by an observation source
///
/// `value` is the daily mean temperature in tenths of a degree, `None` when
/// the source has no measurement for that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub station_id: String,
    pub date: NaiveDate,
    pub value: Option<i64>,
}

impl Reading {
    pub fn new(station_id: impl Into<String>, date: NaiveDate, value: Option<i64>) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            value,
        }
    }
}

/// Inclusive range of observation dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end before the start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(RankingError::invalid_input(format!(
                "date range ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Label used in notification subjects
    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.format(ISO_DATE_FORMAT).to_string()
        } else {
            format!(
                "{} - {}",
                self.start.format(ISO_DATE_FORMAT),
                self.end.format(ISO_DATE_FORMAT)
            )
        }
    }
}

/// Parse a date given as `YYYYMMDD` or `YYYY-MM-DD`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let format = if trimmed.contains('-') {
        ISO_DATE_FORMAT
    } else {
        COMPACT_DATE_FORMAT
    };

    NaiveDate::parse_from_str(trimmed, format).map_err(|source| RankingError::InvalidDate {
        input: input.to_string(),
        source,
    })
}
