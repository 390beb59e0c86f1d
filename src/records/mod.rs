//! Schema types for the game records ledger.
//!
//! A ledger is one JSON document: games, their optional difficulty levels,
//! and named record types holding tagged entries. Everything is loaded,
//! validated and written as a whole (see `store`).

mod entry;
pub mod store;
pub mod summary;
pub mod validate;

pub use entry::{
    CompletedEntry, DifficultyEntry, Entry, EntryDate, EntryVariant, RunTime, ScoredEntry,
    ScreenshotRef, TimedEntry,
};
pub use store::{load, load_or_default, save};
pub use validate::validate_document;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root document: the ordered list of games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordData {
    pub games: Vec<Game>,
}

impl RecordData {
    pub fn game(&self, name: &str) -> Option<&Game> {
        self.games.iter().find(|game| game.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Game {
    pub name: String,
    #[serde(default)]
    pub difficulties: Option<Vec<String>>,
    #[serde(default)]
    pub record_types: Option<Vec<RecordType>>,
}

impl Game {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            difficulties: None,
            record_types: None,
        }
    }

    pub fn record_types(&self) -> &[RecordType] {
        self.record_types.as_deref().unwrap_or_default()
    }

    pub fn difficulties(&self) -> &[String] {
        self.difficulties.as_deref().unwrap_or_default()
    }
}

/// A named category of entries that all share one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default)]
    pub records: Option<Vec<Entry>>,
}

impl RecordType {
    pub fn new(name: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            records: None,
        }
    }

    pub fn records(&self) -> &[Entry] {
        self.records.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Completed,
    CompletedAtDifficulty,
    FastestTime,
    LongestTime,
    HighScore,
    LowScore,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Completed,
        RecordKind::CompletedAtDifficulty,
        RecordKind::FastestTime,
        RecordKind::LongestTime,
        RecordKind::HighScore,
        RecordKind::LowScore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::CompletedAtDifficulty => "completed_at_difficulty",
            Self::FastestTime => "fastest_time",
            Self::LongestTime => "longest_time",
            Self::HighScore => "high_score",
            Self::LowScore => "low_score",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// The only entry variant a record type of this kind may hold.
    pub fn entry_variant(self) -> EntryVariant {
        match self {
            Self::Completed => EntryVariant::Completed,
            Self::CompletedAtDifficulty => EntryVariant::CompletedAtDifficulty,
            Self::FastestTime | Self::LongestTime => EntryVariant::Timed,
            Self::HighScore | Self::LowScore => EntryVariant::Scored,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable position of an object inside the document, used in errors.
pub(crate) fn game_location(index: usize, game: &str) -> String {
    format!("games[{index}] {game:?}")
}

pub(crate) fn record_type_location(game_location: &str, index: usize, name: &str) -> String {
    format!("{game_location} > record_types[{index}] {name:?}")
}
