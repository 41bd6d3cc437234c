//! Notification sinks for update summaries and boards
//!
//! Delivery (addressing, authentication, transport) belongs to the sink. The
//! ranking only decides what is sent.

use crate::error::{RankingError, Result};
use chrono::Local;
use colored::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// A subject line with a plain text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Destination for notifications
pub trait NotificationSink {
    fn send(&self, notification: &Notification) -> Result<()>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn send(&self, notification: &Notification) -> Result<()> {
        (**self).send(notification)
    }
}

/// Prints notifications to stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn send(&self, notification: &Notification) -> Result<()> {
        println!("{}", notification.subject.bold());
        println!("{}", notification.body);
        Ok(())
    }
}

/// Drops each notification as a text file into a directory
///
/// A mail agent or forum poster can pick the files up from there. Files are
/// named by local timestamp, a sequence number and the subject.
#[derive(Debug, Clone)]
pub struct OutboxSink {
    dir: PathBuf,
}

impl OutboxSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_name(&self, subject: &str, sequence: usize) -> String {
        let slug: String = subject
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug
            .split('-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        format!(
            "{}-{:02}-{}.txt",
            Local::now().format("%Y%m%dT%H%M%S"),
            sequence,
            slug
        )
    }
}

impl NotificationSink for OutboxSink {
    fn send(&self, notification: &Notification) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            RankingError::notification(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let existing = fs::read_dir(&self.dir)
            .map(|entries| entries.count())
            .unwrap_or(0);
        let path = self
            .dir
            .join(self.file_name(&notification.subject, existing + 1));

        let content = format!("Subject: {}\n\n{}", notification.subject, notification.body);
        fs::write(&path, content).map_err(|e| {
            RankingError::notification(format!("cannot write {}: {}", path.display(), e))
        })?;

        info!("Queued notification '{}' in {}", notification.subject, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_outbox_writes_one_file_per_notification() {
        let temp_dir = TempDir::new().unwrap();
        let outbox = temp_dir.path().join("outbox");
        let sink = OutboxSink::new(&outbox);

        sink.send(&Notification::new("Frost ranking update 2021-01-10", "De Bilt: 1,5\n"))
            .unwrap();
        sink.send(&Notification::new("Frost ranking board 2021-01-10", "1. De Bilt 1,5\n"))
            .unwrap();

        let mut names: Vec<String> = fs::read_dir(&outbox)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("-01-frost-ranking-update-2021-01-10.txt"));
        assert!(names[1].ends_with("-02-frost-ranking-board-2021-01-10.txt"));

        let content = fs::read_to_string(outbox.join(&names[0])).unwrap();
        assert_eq!(content, "Subject: Frost ranking update 2021-01-10\n\nDe Bilt: 1,5\n");
    }
}
