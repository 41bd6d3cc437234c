//! Ranking state and board file persistence.
//!
//! The ranking file stores one station per line as `<rank>,<name>,<score>`
//! in standings order, where `rank` is the rank computed by the run that
//! wrote it and `score` is in tenths. It doubles as a human editable file,
//! so loading reports the line number of anything it cannot read.
//!
//! Both files are replaced through a temporary file in the same directory,
//! so an interrupted write leaves the previous state in place.

use crate::constants::{DEFAULT_BOARD_FILE, DEFAULT_RANKING_FILE};
use crate::error::{RankingError, Result};
use crate::models::Station;
use crate::ranking::Ranking;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Serialize stations in their current order
pub fn encode_ranking(ranking: &Ranking) -> Result<String> {
    let mut content = String::new();
    for station in ranking.stations() {
        if station.name.contains([',', '\n', '\r']) || station.name.trim().is_empty() {
            return Err(RankingError::InvalidStationName {
                name: station.name.clone(),
            });
        }
        content.push_str(&format!(
            "{},{},{}\n",
            station.new_rank, station.name, station.score
        ));
    }
    Ok(content)
}

/// Parse ranking file content
///
/// `path` is only used for error messages.
pub fn decode_ranking(content: &str, path: &Path) -> Result<Vec<Station>> {
    let mut stations = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        let [rank, name, score] = fields.as_slice() else {
            return Err(RankingError::malformed_ranking(
                path,
                line_number,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        };

        let rank = rank.trim().parse::<u32>().map_err(|e| {
            RankingError::malformed_ranking(path, line_number, format!("invalid rank '{}': {}", rank, e))
        })?;
        let score = score.trim().parse::<i64>().map_err(|e| {
            RankingError::malformed_ranking(
                path,
                line_number,
                format!("invalid score '{}': {}", score, e),
            )
        })?;
        if name.trim().is_empty() {
            return Err(RankingError::malformed_ranking(
                path,
                line_number,
                "empty station name",
            ));
        }

        stations.push(Station::restored(*name, rank, score));
    }

    Ok(stations)
}

/// Location of the ranking state and board files
#[derive(Debug, Clone)]
pub struct RankingStore {
    ranking_path: PathBuf,
    board_path: PathBuf,
}

impl RankingStore {
    pub fn new(ranking_path: impl Into<PathBuf>, board_path: impl Into<PathBuf>) -> Self {
        Self {
            ranking_path: ranking_path.into(),
            board_path: board_path.into(),
        }
    }

    /// Store using the default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DEFAULT_RANKING_FILE), dir.join(DEFAULT_BOARD_FILE))
    }

    pub fn ranking_path(&self) -> &Path {
        &self.ranking_path
    }

    pub fn board_path(&self) -> &Path {
        &self.board_path
    }

    /// Load the persisted ranking, empty when no ranking file exists yet
    pub fn load(&self) -> Result<Ranking> {
        let content = match fs::read_to_string(&self.ranking_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No ranking file at {}, starting empty",
                    self.ranking_path.display()
                );
                return Ok(Ranking::new());
            }
            Err(e) => return Err(RankingError::persistence(&self.ranking_path, e)),
        };

        let stations = decode_ranking(&content, &self.ranking_path)?;
        debug!(
            "Loaded {} stations from {}",
            stations.len(),
            self.ranking_path.display()
        );
        Ok(Ranking::from_stations(stations))
    }

    /// Write the ranking state file
    pub fn save_ranking(&self, ranking: &Ranking) -> Result<()> {
        let content = encode_ranking(ranking)?;
        write_replacing(&self.ranking_path, &content)?;
        info!(
            "Saved {} stations to {}",
            ranking.len(),
            self.ranking_path.display()
        );
        Ok(())
    }

    /// Write the board and then the ranking state for a finished run
    ///
    /// The ranking is encoded up front, so an unstorable station name fails
    /// before either file is touched.
    pub fn save(&self, ranking: &Ranking, board: &str) -> Result<()> {
        let content = encode_ranking(ranking)?;
        self.save_board(board)?;
        write_replacing(&self.ranking_path, &content)?;
        info!(
            "Saved {} stations to {}",
            ranking.len(),
            self.ranking_path.display()
        );
        Ok(())
    }

    /// Write the rendered board file
    pub fn save_board(&self, board: &str) -> Result<()> {
        write_replacing(&self.board_path, board)?;
        debug!("Wrote board to {}", self.board_path.display());
        Ok(())
    }

    /// Read the rendered board file, `None` if it does not exist
    pub fn read_board(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.board_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RankingError::persistence(&self.board_path, e)),
        }
    }
}

/// Replace `path` with `content` through a temporary sibling file
fn write_replacing(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| RankingError::persistence(dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| RankingError::persistence(dir, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.flush())
        .map_err(|e| RankingError::persistence(path, e))?;
    temp.persist(path)
        .map_err(|e| RankingError::persistence(path, e.error))?;
    Ok(())
}
