//! Update run orchestration.
//!
//! A run loads the persisted ranking, replays date groups in chronological
//! order and persists once after the final group. Every group except the
//! last becomes the new baseline, so the board only shows what changed on
//! the final date. Nothing is written when there is no scoring event at all.

use crate::board::{UpdateSummary, render_board, render_update_summary};
use crate::error::Result;
use crate::extraction::Extraction;
use crate::models::ScoringEvent;
use crate::notify::{Notification, NotificationSink};
use crate::persistence::RankingStore;
use tracing::{debug, error, info};

/// One batch of events with the label shown in notifications
#[derive(Debug, Clone)]
pub struct Batch {
    pub label: String,
    pub events: Vec<ScoringEvent>,
}

impl Batch {
    pub fn new(label: impl Into<String>, events: Vec<ScoringEvent>) -> Self {
        Self {
            label: label.into(),
            events,
        }
    }
}

/// Batches in chronological order from an extraction
pub fn batches_from_extraction(extraction: Extraction) -> Vec<Batch> {
    extraction
        .events_by_date
        .into_iter()
        .map(|(date, events)| Batch::new(date.to_string(), events))
        .collect()
}

/// What a completed run did
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Labels of the batches applied, oldest first
    pub applied: Vec<String>,
    /// Summary of the final, visible batch
    pub summary: UpdateSummary,
    pub stations_ranked: usize,
    pub board: String,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
}

/// Result of a run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No scoring events; persisted state was left untouched
    NoUpdate,
    Updated(RunReport),
}

/// Applies batches to the persisted ranking and announces the result
pub struct UpdatePipeline<'a> {
    store: &'a RankingStore,
    sinks: Vec<Box<dyn NotificationSink + 'a>>,
    subject_prefix: String,
}

impl<'a> UpdatePipeline<'a> {
    pub fn new(store: &'a RankingStore, subject_prefix: impl Into<String>) -> Self {
        Self {
            store,
            sinks: Vec::new(),
            subject_prefix: subject_prefix.into(),
        }
    }

    /// Add a notification sink
    pub fn with_sink(mut self, sink: impl NotificationSink + 'a) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Run over `batches`, skipping empty ones
    pub fn run(&self, batches: Vec<Batch>) -> Result<RunOutcome> {
        let mut batches: Vec<Batch> = batches
            .into_iter()
            .filter(|batch| !batch.events.is_empty())
            .collect();

        let Some(last) = batches.pop() else {
            info!("No update received");
            return Ok(RunOutcome::NoUpdate);
        };

        let mut ranking = self.store.load()?;
        info!("Loaded ranking with {} stations", ranking.len());

        let mut applied = Vec::with_capacity(batches.len() + 1);
        for batch in batches {
            debug!("Backfilling {} ({} events)", batch.label, batch.events.len());
            ranking.apply_batch(&batch.events, true)?;
            applied.push(batch.label);
        }

        let summary = UpdateSummary::from_events(&last.events)
            .unwrap_or(UpdateSummary {
                stations: 0,
                average: 0.0,
            });
        info!("{}: {}", last.label, summary);

        ranking.finalize_and_persist(&last.events, self.store)?;
        applied.push(last.label.clone());

        let board = render_board(&ranking);
        let notifications = [
            Notification::new(
                format!("{} update {}", self.subject_prefix, last.label),
                render_update_summary(&last.events),
            ),
            Notification::new(
                format!("{} board {}", self.subject_prefix, last.label),
                board.clone(),
            ),
        ];
        let (notifications_sent, notifications_failed) = self.notify(&notifications);

        Ok(RunOutcome::Updated(RunReport {
            applied,
            summary,
            stations_ranked: ranking.len(),
            board,
            notifications_sent,
            notifications_failed,
        }))
    }

    fn notify(&self, notifications: &[Notification]) -> (usize, usize) {
        let mut sent = 0;
        let mut failed = 0;
        for sink in &self.sinks {
            for notification in notifications {
                match sink.send(notification) {
                    Ok(()) => sent += 1,
                    Err(e) => {
                        error!("Failed to send '{}': {}", notification.subject, e);
                        failed += 1;
                    }
                }
            }
        }
        (sent, failed)
    }
}
