//! Frost Ranking Library
//!
//! Keeps a cumulative leaderboard of KNMI weather stations scored by frost:
//! every day a station's mean temperature is below zero it earns the
//! negated temperature in points.
//!
//! This library provides tools for:
//! - Reading daily readings from KNMI exports or manual entry
//! - Turning readings into date-grouped scoring events
//! - Merging events into the leaderboard and recomputing dense ranks
//! - Rendering the board with gains and rank changes
//! - Persisting ranking state between runs and sending notifications

pub mod board;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod models;
pub mod notify;
pub mod persistence;
pub mod pipeline;
pub mod ranking;
pub mod registry;
pub mod source;

// Re-export commonly used types
pub use config::RankingConfig;
pub use error::{RankingError, Result};
pub use models::{Reading, ScoringEvent, Station};
pub use persistence::RankingStore;
pub use ranking::Ranking;
