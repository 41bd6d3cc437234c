//! Conversion of raw readings into scoring events.
//!
//! Only frost counts: a reading scores the negated temperature when it is
//! below zero. Missing values and unknown stations are reported as warnings
//! and skipped so a single bad record never aborts a run.

use crate::models::{Reading, ScoringEvent};
use crate::registry::StationRegistry;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Why a reading was left out of the update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingValue,
    UnknownStation,
}

/// A reading that could not be scored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionWarning {
    /// Display name, or the raw id when the station is unknown
    pub station: String,
    pub date: NaiveDate,
    pub reason: SkipReason,
}

/// Scoring events grouped by observation date
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Chronologically ordered date groups; dates without events are absent
    pub events_by_date: BTreeMap<NaiveDate, Vec<ScoringEvent>>,
    pub warnings: Vec<ExtractionWarning>,
}

impl Extraction {
    /// Total number of events across all dates
    pub fn event_count(&self) -> usize {
        self.events_by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events_by_date.is_empty()
    }

    /// Events for a single date
    pub fn events_on(&self, date: NaiveDate) -> &[ScoringEvent] {
        self.events_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Derive the score for a raw reading, `None` when it does not score
pub fn derive_score(raw: i64) -> Option<i64> {
    raw.checked_neg().filter(|&score| score > 0)
}

/// Extract scoring events for every date present in `readings`
pub fn extract_events(readings: &[Reading], registry: &StationRegistry) -> Extraction {
    let mut extraction = Extraction::default();

    for reading in readings {
        let Some(name) = registry.name_of(&reading.station_id) else {
            warn!(
                "Skipping reading for unknown station id {} on {}",
                reading.station_id, reading.date
            );
            extraction.warnings.push(ExtractionWarning {
                station: reading.station_id.clone(),
                date: reading.date,
                reason: SkipReason::UnknownStation,
            });
            continue;
        };

        let Some(raw) = reading.value else {
            warn!("No value for {} on {}", name, reading.date);
            extraction.warnings.push(ExtractionWarning {
                station: name.to_string(),
                date: reading.date,
                reason: SkipReason::MissingValue,
            });
            continue;
        };

        if let Some(score) = derive_score(raw) {
            extraction
                .events_by_date
                .entry(reading.date)
                .or_default()
                .push(ScoringEvent::new(name, score));
        }
    }

    debug!(
        "Extracted {} events over {} dates ({} warnings)",
        extraction.event_count(),
        extraction.events_by_date.len(),
        extraction.warnings.len()
    );

    extraction
}

/// Extract scoring events for one target date, ignoring other dates
pub fn extract_for_date(
    readings: &[Reading],
    date: NaiveDate,
    registry: &StationRegistry,
) -> Extraction {
    let on_date: Vec<Reading> = readings
        .iter()
        .filter(|reading| reading.date == date)
        .cloned()
        .collect();
    extract_events(&on_date, registry)
}
