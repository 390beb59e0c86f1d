use super::validate_document;
use crate::error::RecordError;
use crate::records::{
    CompletedEntry, DifficultyEntry, Entry, EntryDate, Game, RecordData, RecordKind, RecordType,
    RunTime, ScoredEntry, ScreenshotRef, TimedEntry,
};
use chrono::NaiveDate;
use std::path::Path;
use std::time::Duration;

fn date() -> EntryDate {
    EntryDate::Date(NaiveDate::from_ymd_opt(2023, 6, 1).expect("valid date"))
}

fn completed(screenshot: Option<&str>) -> Entry {
    Entry::Completed(CompletedEntry {
        date: date(),
        description: None,
        screenshot: screenshot.map(ScreenshotRef::new),
    })
}

fn at_difficulty(difficulty: &str) -> Entry {
    Entry::CompletedAtDifficulty(DifficultyEntry {
        date: date(),
        description: None,
        screenshot: None,
        difficulty: difficulty.to_string(),
    })
}

fn timed(secs: u64) -> Entry {
    Entry::Timed(TimedEntry {
        date: date(),
        description: None,
        screenshot: None,
        time: RunTime(Duration::from_secs(secs)),
    })
}

fn scored(score: f64) -> Entry {
    Entry::Scored(ScoredEntry {
        date: date(),
        description: None,
        screenshot: None,
        score,
    })
}

fn record_type(name: &str, kind: RecordKind, records: Vec<Entry>) -> RecordType {
    RecordType {
        records: Some(records),
        ..RecordType::new(name, kind)
    }
}

fn document(game: Game) -> RecordData {
    RecordData { games: vec![game] }
}

fn hades(records: Vec<Entry>) -> Game {
    Game {
        name: "Hades".to_string(),
        difficulties: Some(vec!["Normal".to_string(), "Hard".to_string()]),
        record_types: Some(vec![record_type(
            "Runs",
            RecordKind::CompletedAtDifficulty,
            records,
        )]),
    }
}

#[test]
fn accepts_matching_variants_for_every_kind() {
    let mut game = hades(vec![at_difficulty("Normal"), at_difficulty("Hard")]);
    game.record_types.get_or_insert_with(Vec::new).extend([
        record_type("Clears", RecordKind::Completed, vec![completed(None)]),
        record_type("Any%", RecordKind::FastestTime, vec![timed(1_800)]),
        record_type("Marathon", RecordKind::LongestTime, vec![timed(36_000)]),
        record_type("Score", RecordKind::HighScore, vec![scored(9_001.5)]),
        record_type("Golf", RecordKind::LowScore, vec![scored(-4.0)]),
        RecordType::new("Unplayed", RecordKind::Completed),
    ]);
    validate_document(&document(game), Path::new(".")).expect("valid document");
}

#[test]
fn rejects_timed_or_scored_entries_in_completed_record_type() {
    for wrong in [timed(60), scored(10.0)] {
        let mut game = Game::new("Celeste");
        game.record_types = Some(vec![record_type(
            "Clears",
            RecordKind::Completed,
            vec![completed(None), wrong],
        )]);
        let err = validate_document(&document(game), Path::new(".")).expect_err("mismatch");
        assert!(matches!(err, RecordError::CrossField { .. }), "{err:?}");
        let message = err.to_string();
        assert!(message.contains("records[1]"), "{message}");
        assert!(message.contains("\"completed\""), "{message}");
    }
}

#[test]
fn rejects_undeclared_difficulty() {
    let game = hades(vec![at_difficulty("Normal"), at_difficulty("Nightmare")]);
    let err = validate_document(&document(game), Path::new(".")).expect_err("undeclared");
    let RecordError::CrossField { location, message } = err else {
        panic!("expected a cross-field error");
    };
    assert!(location.contains("\"Hades\""));
    assert!(location.contains("\"Runs\""));
    assert!(message.contains("\"Nightmare\""));
}

#[test]
fn difficulty_record_types_need_declared_difficulties() {
    let mut game = hades(Vec::new());
    game.difficulties = None;
    let err = validate_document(&document(game), Path::new(".")).expect_err("no difficulties");
    assert!(matches!(err, RecordError::CrossField { .. }));
}

#[test]
fn rejects_duplicate_difficulties() {
    let mut game = hades(Vec::new());
    game.difficulties = Some(vec!["Hard".to_string(), "Hard".to_string()]);
    let err = validate_document(&document(game), Path::new(".")).expect_err("duplicate");
    assert!(matches!(err, RecordError::FieldConstraint { .. }));
}

#[test]
fn screenshots_resolve_against_the_base_directory() {
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::create_dir_all(dir.path().join("shots")).expect("create shots dir");
    std::fs::write(dir.path().join("shots/clear.png"), b"png").expect("write screenshot");

    let mut game = Game::new("Celeste");
    game.record_types = Some(vec![record_type(
        "Clears",
        RecordKind::Completed,
        vec![completed(Some("shots\\clear.png"))],
    )]);
    let doc = document(game);
    validate_document(&doc, dir.path()).expect("screenshot exists under base dir");

    let elsewhere = tempfile::tempdir().expect("create second temp dir");
    let err = validate_document(&doc, elsewhere.path()).expect_err("screenshot missing");
    let RecordError::Reference { reference, .. } = err else {
        panic!("expected a reference error");
    };
    assert_eq!(reference, "shots/clear.png");
}

#[test]
fn screenshot_must_be_a_regular_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::create_dir_all(dir.path().join("shots")).expect("create shots dir");
    let mut game = Game::new("Celeste");
    game.record_types = Some(vec![record_type(
        "Clears",
        RecordKind::Completed,
        vec![completed(Some("shots"))],
    )]);
    let err = validate_document(&document(game), dir.path()).expect_err("directory");
    assert_eq!(err.kind(), "reference");
}
