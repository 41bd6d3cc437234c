//! Standings order for ranked stations

use crate::models::Station;
use std::cmp::Ordering;

/// Total order used to rank stations
///
/// Higher scores come first. Equal scores fall back to the station name in
/// descending order so the sorted sequence is reproducible between runs; the
/// name does not influence the rank number itself.
pub fn standings_order(a: &Station, b: &Station) -> Ordering {
    b.score.cmp(&a.score).then_with(|| b.name.cmp(&a.name))
}
