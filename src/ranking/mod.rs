//! Ranking engine for the cumulative frost leaderboard
//!
//! The ranking owns every station for the duration of a run. Batches of
//! scoring events are merged into it, after which ranks are recomputed from
//! the scores. Previous ranks and gains are kept so the board can show what
//! changed since the last persisted snapshot.

use crate::board::render_board;
use crate::error::{RankingError, Result};
use crate::models::{ScoringEvent, Station};
use crate::persistence::RankingStore;
use std::collections::HashMap;
use tracing::debug;

pub mod order;


pub use order::standings_order;

/// Leaderboard of stations keyed by name
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Stations in standings order after the last recomputation
    stations: Vec<Station>,

    /// Position of each station in `stations`
    index: HashMap<String, usize>,
}

impl Ranking {
    /// Create an empty ranking
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ranking from stations restored from persisted state
    ///
    /// Stations keep the order they are given in; later duplicates of a name
    /// are dropped.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut ranking = Self::new();
        for station in stations {
            if ranking.index.contains_key(&station.name) {
                debug!("Dropping duplicate station {}", station.name);
                continue;
            }
            ranking.index.insert(station.name.clone(), ranking.stations.len());
            ranking.stations.push(station);
        }
        ranking
    }

    /// Stations in their current order
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by exact name
    pub fn get(&self, name: &str) -> Option<&Station> {
        self.index.get(name).map(|&position| &self.stations[position])
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Merge a batch of events and recompute ranks
    ///
    /// Known stations take the event value as their gain and add it to their
    /// score. Unknown stations are inserted unranked with the value as their
    /// score and no gain. With `reset_gains` the recomputed state becomes the
    /// baseline for the next batch, which hides intermediate backfill steps
    /// from the board.
    ///
    /// A score that would leave the `i64` range fails with
    /// [`RankingError::ScoreOverflow`]; the ranking is then partially merged
    /// and must not be persisted.
    pub fn apply_batch(&mut self, events: &[ScoringEvent], reset_gains: bool) -> Result<()> {
        let mut inserted = 0;

        for event in events {
            match self.index.get(&event.station).copied() {
                Some(position) => {
                    let station = &mut self.stations[position];
                    station.score = station.score.checked_add(event.value).ok_or_else(|| {
                        RankingError::ScoreOverflow {
                            station: station.name.clone(),
                        }
                    })?;
                    station.gain = event.value;
                }
                None => {
                    self.index
                        .insert(event.station.clone(), self.stations.len());
                    self.stations
                        .push(Station::unranked(event.station.clone(), event.value));
                    inserted += 1;
                }
            }
        }

        debug!(
            "Applied {} events ({} new stations), reset_gains={}",
            events.len(),
            inserted,
            reset_gains
        );

        self.recompute_ranks();

        if reset_gains {
            self.snapshot_baseline();
        }
        Ok(())
    }

    /// Sort stations into standings order and assign dense ranks
    ///
    /// A station tied on score with the station directly above it shares
    /// that station's rank, so scores 50, 50, 40 rank 1, 1, 3.
    pub fn recompute_ranks(&mut self) {
        self.stations.sort_by(standings_order);

        for position in 0..self.stations.len() {
            let mut new_rank = position as u32 + 1;
            if position > 0 {
                let above = &self.stations[position - 1];
                if above.score == self.stations[position].score {
                    new_rank = above.new_rank;
                }
            }
            self.stations[position].new_rank = new_rank;
        }

        self.rebuild_index();
    }

    /// Make the current ranks the previous ranks and clear all gains
    pub fn snapshot_baseline(&mut self) {
        for station in &mut self.stations {
            station.rank = station.new_rank;
            station.gain = 0;
        }
    }

    /// Apply the final batch of a run and write ranking and board files
    ///
    /// Both files are produced before either is written, and the board is
    /// written first: when the board cannot be written the ranking file still
    /// holds the previous state and the run can be repeated.
    pub fn finalize_and_persist(
        &mut self,
        events: &[ScoringEvent],
        store: &RankingStore,
    ) -> Result<()> {
        self.apply_batch(events, false)?;
        store.save(self, &render_board(self))
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, station) in self.stations.iter().enumerate() {
            self.index.insert(station.name.clone(), position);
        }
    }
}
