//! Integration tests for complete update runs
//!
//! These tests drive the pipeline the way the CLI does: readings from a KNMI
//! export, extraction through the station registry, ranking persisted in a
//! temporary data directory and notifications captured by a recording sink.

use chrono::NaiveDate;
use frost_ranking::error::{RankingError, Result};
use frost_ranking::extraction::{extract_events, extract_for_date};
use frost_ranking::models::{DateRange, Reading, ScoringEvent};
use frost_ranking::notify::{Notification, NotificationSink};
use frost_ranking::pipeline::{Batch, RunOutcome, UpdatePipeline, batches_from_extraction};
use frost_ranking::registry::StationRegistry;
use frost_ranking::source::{KnmiFileSource, ObservationSource, StaticSource};
use frost_ranking::{RankingConfig, RankingStore};
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

const EXPORT: &str = "\
# BRON: KONINKLIJK NEDERLANDS METEOROLOGISCH INSTITUUT (KNMI)
# TG        = Etmaalgemiddelde temperatuur (in 0.1 graden Celsius)
#
# STN,YYYYMMDD,   TG

  260,20210208,  -20
  280,20210208,  -35
  310,20210208,    4
  260,20210209,  -10
  280,20210209,
  380,20210209,  -50
  260,20210210,  -15
  280,20210210,   -5
  380,20210210,    2
";

#[derive(Default)]
struct RecordingSink {
    sent: RefCell<Vec<Notification>>,
}

impl NotificationSink for RecordingSink {
    fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.borrow_mut().push(notification.clone());
        Ok(())
    }
}

struct FailingSink;

impl NotificationSink for FailingSink {
    fn send(&self, _notification: &Notification) -> Result<()> {
        Err(RankingError::notification("smtp unavailable"))
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 2, day).unwrap()
}

fn write_export(temp_dir: &TempDir) -> KnmiFileSource {
    let path = temp_dir.path().join("etmgeg.txt");
    fs::write(&path, EXPORT).unwrap();
    KnmiFileSource::new(path)
}

#[test]
fn test_single_date_update_from_export() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_export(&temp_dir);
    let store = RankingStore::in_dir(temp_dir.path().join("data"));
    let registry = StationRegistry::knmi();
    let sink = RecordingSink::default();

    let readings = source.fetch(&DateRange::single(date(8))).unwrap();
    let extraction = extract_for_date(&readings, date(8), &registry);

    let outcome = UpdatePipeline::new(&store, "Frost ranking")
        .with_sink(&sink)
        .run(batches_from_extraction(extraction))
        .unwrap();

    let RunOutcome::Updated(report) = outcome else {
        panic!("expected an update");
    };
    assert_eq!(report.applied, vec!["2021-02-08".to_string()]);
    assert_eq!(report.summary.stations, 2);
    assert_eq!(report.stations_ranked, 2);
    assert_eq!(report.notifications_sent, 2);

    assert_eq!(
        fs::read_to_string(store.ranking_path()).unwrap(),
        "1,Eelde,35\n2,De Bilt,20\n"
    );
    assert_eq!(
        fs::read_to_string(store.board_path()).unwrap(),
        "[color=orange]1. Eelde 3,5[/color]\n[color=orange]2. De Bilt 2,0[/color]\n"
    );

    let sent = sink.sent.borrow();
    assert_eq!(sent[0].subject, "Frost ranking update 2021-02-08");
    assert_eq!(sent[0].body, "De Bilt: 2,0\nEelde: 3,5\n");
    assert_eq!(sent[1].subject, "Frost ranking board 2021-02-08");
    assert_eq!(sent[1].body, report.board);
}

#[test]
fn test_consecutive_runs_show_gains_and_rank_changes() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_export(&temp_dir);
    let store = RankingStore::in_dir(temp_dir.path());
    let registry = StationRegistry::knmi();
    let pipeline = UpdatePipeline::new(&store, "Frost ranking");

    for day in [8, 9] {
        let readings = source.fetch(&DateRange::single(date(day))).unwrap();
        let extraction = extract_for_date(&readings, date(day), &registry);
        pipeline.run(batches_from_extraction(extraction)).unwrap();
    }

    // Day 8: Eelde 35, De Bilt 20. Day 9: De Bilt +10, Maastricht new with 50.
    assert_eq!(
        fs::read_to_string(store.ranking_path()).unwrap(),
        "1,Maastricht,50\n2,Eelde,35\n3,De Bilt,30\n"
    );
    assert_eq!(
        fs::read_to_string(store.board_path()).unwrap(),
        "[color=orange]1. Maastricht 5,0[/color]\n\
         2. Eelde 3,5 [color=red](1)[/color]\n\
         3. De Bilt 3,0 [color=grey][i]+1,0[/i][/color] [color=red](2)[/color]\n"
    );
}

#[test]
fn test_backfill_only_shows_final_date() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_export(&temp_dir);
    let store = RankingStore::in_dir(temp_dir.path());
    let registry = StationRegistry::knmi();

    let range = DateRange::new(date(8), date(10)).unwrap();
    let readings = source.fetch(&range).unwrap();
    let extraction = extract_events(&readings, &registry);
    assert_eq!(extraction.warnings.len(), 1);

    let outcome = UpdatePipeline::new(&store, "Frost ranking")
        .run(batches_from_extraction(extraction))
        .unwrap();

    let RunOutcome::Updated(report) = outcome else {
        panic!("expected an update");
    };
    assert_eq!(report.applied, vec!["2021-02-08", "2021-02-09", "2021-02-10"]);

    // After day 9 the baseline is Maastricht 50 (1), Eelde 35 (2), De Bilt 30 (3).
    // Day 10: De Bilt +15 = 45, Eelde +5 = 40.
    assert_eq!(
        fs::read_to_string(store.ranking_path()).unwrap(),
        "1,Maastricht,50\n2,De Bilt,45\n3,Eelde,40\n"
    );
    assert_eq!(
        report.board,
        "1. Maastricht 5,0\n\
         2. De Bilt 4,5 [color=grey][i]+1,5[/i][/color] [color=green](3)[/color]\n\
         3. Eelde 4,0 [color=grey][i]+0,5[/i][/color] [color=red](2)[/color]\n"
    );
}

#[test]
fn test_in_memory_source_limits_run_to_range() {
    let temp_dir = TempDir::new().unwrap();
    let store = RankingStore::in_dir(temp_dir.path());
    let source = StaticSource::new(vec![
        Reading::new("260", date(7), Some(-90)),
        Reading::new("260", date(8), Some(-20)),
        Reading::new("280", date(8), Some(i64::MIN)),
        Reading::new("280", date(9), Some(-30)),
        Reading::new("380", date(10), Some(-70)),
    ]);

    let readings = source
        .fetch(&DateRange::new(date(8), date(9)).unwrap())
        .unwrap();
    assert_eq!(readings.len(), 3);

    let extraction = extract_events(&readings, &StationRegistry::knmi());
    let outcome = UpdatePipeline::new(&store, "Frost ranking")
        .run(batches_from_extraction(extraction))
        .unwrap();

    let RunOutcome::Updated(report) = outcome else {
        panic!("expected an update");
    };
    assert_eq!(report.applied, vec!["2021-02-08", "2021-02-09"]);

    // Readings outside the range never reach the ranking
    assert_eq!(
        fs::read_to_string(store.ranking_path()).unwrap(),
        "1,Eelde,30\n2,De Bilt,20\n"
    );
    assert_eq!(
        report.board,
        "[color=orange]1. Eelde 3,0[/color]\n2. De Bilt 2,0 [color=red](1)[/color]\n"
    );
}

#[test]
fn test_empty_update_leaves_state_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let store = RankingStore::in_dir(temp_dir.path());
    fs::write(store.ranking_path(), "1,Eelde,35\n").unwrap();
    let sink = RecordingSink::default();

    let outcome = UpdatePipeline::new(&store, "Frost ranking")
        .with_sink(&sink)
        .run(vec![Batch::new("2021-02-11", Vec::new())])
        .unwrap();

    assert!(matches!(outcome, RunOutcome::NoUpdate));
    assert_eq!(fs::read_to_string(store.ranking_path()).unwrap(), "1,Eelde,35\n");
    assert!(!store.board_path().exists());
    assert!(sink.sent.borrow().is_empty());

    let outcome = UpdatePipeline::new(&store, "Frost ranking").run(Vec::new()).unwrap();
    assert!(matches!(outcome, RunOutcome::NoUpdate));
}

#[test]
fn test_malformed_state_aborts_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let store = RankingStore::in_dir(temp_dir.path());
    fs::write(store.ranking_path(), "1,Eelde\n").unwrap();

    let err = UpdatePipeline::new(&store, "Frost ranking")
        .run(vec![Batch::new("manual", vec![ScoringEvent::new("Eelde", 10)])])
        .unwrap_err();

    assert!(matches!(err, RankingError::MalformedRanking { line_number: 1, .. }));
    assert_eq!(fs::read_to_string(store.ranking_path()).unwrap(), "1,Eelde\n");
    assert!(!store.board_path().exists());
}

#[test]
fn test_failed_notification_does_not_fail_run() {
    let temp_dir = TempDir::new().unwrap();
    let config = RankingConfig::default().with_data_dir(temp_dir.path());
    let store = config.store();
    let sink = RecordingSink::default();

    let outcome = UpdatePipeline::new(&store, &config.subject_prefix)
        .with_sink(FailingSink)
        .with_sink(&sink)
        .run(vec![Batch::new("manual", vec![ScoringEvent::new("Eelde", 10)])])
        .unwrap();

    let RunOutcome::Updated(report) = outcome else {
        panic!("expected an update");
    };
    assert_eq!(report.notifications_failed, 2);
    assert_eq!(report.notifications_sent, 2);
    assert_eq!(sink.sent.borrow().len(), 2);
    assert!(store.ranking_path().exists());
}
