//! Board rendering for the leaderboard display and notifications.
//!
//! Lines use forum style markup: new stations are highlighted orange, gains
//! are shown in grey italics and rank changes show the previous rank in green
//! (moved up) or red (moved down). Fixed point values are printed with a
//! comma as decimal separator.

use crate::constants::markup::{
    COLOR_CLOSE, GREEN_OPEN, GREY_OPEN, ITALIC_CLOSE, ITALIC_OPEN, ORANGE_OPEN,
    PADDED_PREVIOUS_RANK, RED_OPEN,
};
use crate::models::{ScoringEvent, Station};
use crate::ranking::Ranking;

/// Format tenths as a decimal with a comma separator (`-15` becomes `-1,5`)
pub fn format_tenths(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    format!("{}{},{}", sign, magnitude / 10, magnitude % 10)
}

/// Format tenths with an explicit sign (`15` becomes `+1,5`)
pub fn format_signed_tenths(value: i64) -> String {
    if value < 0 {
        format_tenths(value)
    } else {
        format!("+{}", format_tenths(value))
    }
}

/// Render one board line for a ranked station
pub fn render_line(station: &Station) -> String {
    let base = format!(
        "{}. {} {}",
        station.new_rank,
        station.name,
        format_tenths(station.score)
    );

    if station.is_new() {
        return format!("{}{}{}", ORANGE_OPEN, base, COLOR_CLOSE);
    }

    let mut line = base;

    if station.gain != 0 {
        line.push_str(&format!(
            " {}{}{}{}{}",
            GREY_OPEN,
            ITALIC_OPEN,
            format_signed_tenths(station.gain),
            ITALIC_CLOSE,
            COLOR_CLOSE
        ));
    }

    let delta = station.rank_delta();
    if delta != 0 {
        let color = if delta > 0 { GREEN_OPEN } else { RED_OPEN };
        let padding = if station.rank == PADDED_PREVIOUS_RANK {
            " "
        } else {
            ""
        };
        line.push_str(&format!(
            " {}({}{}){}",
            color, station.rank, padding, COLOR_CLOSE
        ));
    }

    line
}

/// Render the full board, one newline terminated line per station
pub fn render_board(ranking: &Ranking) -> String {
    ranking
        .stations()
        .iter()
        .map(|station| format!("{}\n", render_line(station)))
        .collect()
}

/// Plain text body listing every event of an update
pub fn render_update_summary(events: &[ScoringEvent]) -> String {
    events
        .iter()
        .map(|event| format!("{}: {}\n", event.station, format_tenths(event.value)))
        .collect()
}

/// Aggregate figures for one update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSummary {
    /// Number of scoring events
    pub stations: usize,
    /// Average event value in points
    pub average: f64,
}

impl UpdateSummary {
    /// Summarise a batch, `None` for an empty batch
    pub fn from_events(events: &[ScoringEvent]) -> Option<Self> {
        if events.is_empty() {
            return None;
        }
        let total: i64 = events.iter().map(|event| event.value).sum();
        Some(Self {
            stations: events.len(),
            average: total as f64 / events.len() as f64 / 10.0,
        })
    }
}

impl std::fmt::Display for UpdateSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} stations scored an average of {:.2} points",
            self.stations, self.average
        )
    }
}
