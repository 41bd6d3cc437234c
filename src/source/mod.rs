//! Observation sources feeding the ranking
//!
//! The network client for the KNMI open data service lives outside this
//! crate; sources here read what it produced or what a user typed.

pub mod knmi;
pub mod manual;

use crate::error::Result;
use crate::models::{DateRange, Reading};

pub use knmi::{KnmiFileSource, parse_daily_export};
pub use manual::parse_manual_entries;

/// Anything that can deliver daily readings for a range of dates
pub trait ObservationSource {
    /// Readings whose date falls inside `range`
    fn fetch(&self, range: &DateRange) -> Result<Vec<Reading>>;
}

/// Readings held in memory, mainly for tests and replays
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    readings: Vec<Reading>,
}

impl StaticSource {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }
}

impl ObservationSource for StaticSource {
    fn fetch(&self, range: &DateRange) -> Result<Vec<Reading>> {
        Ok(self
            .readings
            .iter()
            .filter(|reading| range.contains(reading.date))
            .cloned()
            .collect())
    }
}
