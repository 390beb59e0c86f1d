//! Record entries: the four tagged variants and their field types.
use crate::parse::{format_iso_duration, parse_duration, parse_iso_duration, DATE_FORMAT};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// One achievement, tagged by `entry_type` in the ledger file.
///
/// The tag duplicates the parent record type's `type`, but keeps each entry
/// readable on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", rename_all = "snake_case")]
pub enum Entry {
    Completed(CompletedEntry),
    CompletedAtDifficulty(DifficultyEntry),
    #[serde(rename = "time")]
    Timed(TimedEntry),
    #[serde(rename = "score")]
    Scored(ScoredEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletedEntry {
    pub date: EntryDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub screenshot: Option<ScreenshotRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifficultyEntry {
    pub date: EntryDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub screenshot: Option<ScreenshotRef>,
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimedEntry {
    pub date: EntryDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub screenshot: Option<ScreenshotRef>,
    pub time: RunTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoredEntry {
    pub date: EntryDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub screenshot: Option<ScreenshotRef>,
    pub score: f64,
}

/// The variant names as they appear in the `entry_type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryVariant {
    Completed,
    CompletedAtDifficulty,
    Timed,
    Scored,
}

impl EntryVariant {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::CompletedAtDifficulty => "completed_at_difficulty",
            Self::Timed => "time",
            Self::Scored => "score",
        }
    }
}

impl fmt::Display for EntryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Entry {
    pub fn variant(&self) -> EntryVariant {
        match self {
            Self::Completed(_) => EntryVariant::Completed,
            Self::CompletedAtDifficulty(_) => EntryVariant::CompletedAtDifficulty,
            Self::Timed(_) => EntryVariant::Timed,
            Self::Scored(_) => EntryVariant::Scored,
        }
    }

    pub fn date(&self) -> &EntryDate {
        match self {
            Self::Completed(entry) => &entry.date,
            Self::CompletedAtDifficulty(entry) => &entry.date,
            Self::Timed(entry) => &entry.date,
            Self::Scored(entry) => &entry.date,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Completed(entry) => entry.description.as_deref(),
            Self::CompletedAtDifficulty(entry) => entry.description.as_deref(),
            Self::Timed(entry) => entry.description.as_deref(),
            Self::Scored(entry) => entry.description.as_deref(),
        }
    }

    pub fn screenshot(&self) -> Option<&ScreenshotRef> {
        match self {
            Self::Completed(entry) => entry.screenshot.as_ref(),
            Self::CompletedAtDifficulty(entry) => entry.screenshot.as_ref(),
            Self::Timed(entry) => entry.screenshot.as_ref(),
            Self::Scored(entry) => entry.screenshot.as_ref(),
        }
    }
}

/// When an entry happened: a plain calendar date or a date-time.
///
/// The kind read from the file is kept; saving writes it in canonical text
/// (`T` separator with seconds, numeric offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl EntryDate {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            return Some(Self::Date(date));
        }
        if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Zoned(zoned));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(Self::DateTime)
    }

    /// Local wall-clock moment used for ordering; plain dates sort at midnight.
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN),
            Self::DateTime(moment) => *moment,
            Self::Zoned(moment) => moment.naive_local(),
        }
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::DateTime(moment) => write!(f, "{}", moment.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Zoned(moment) => f.write_str(&moment.to_rfc3339()),
        }
    }
}

impl From<NaiveDate> for EntryDate {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl Serialize for EntryDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        EntryDate::parse(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid date {raw:?}: expected YYYY-MM-DD or an ISO-8601 date-time"
            ))
        })
    }
}

/// Duration of a timed run, stored as ISO-8601 text (`PT1H2M3S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTime(pub Duration);

impl Serialize for RunTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso_duration(self.0))
    }
}

impl<'de> Deserialize<'de> for RunTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RunTimeVisitor)
    }
}

struct RunTimeVisitor;

impl Visitor<'_> for RunTimeVisitor {
    type Value = RunTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ISO-8601 duration, H:MM:SS text, or a number of seconds")
    }

    fn visit_str<E: de::Error>(self, raw: &str) -> Result<RunTime, E> {
        parse_iso_duration(raw)
            .or_else(|| parse_duration(raw).ok())
            .map(RunTime)
            .ok_or_else(|| E::custom(format!("invalid duration {raw:?}")))
    }

    fn visit_u64<E: de::Error>(self, secs: u64) -> Result<RunTime, E> {
        Ok(RunTime(Duration::from_secs(secs)))
    }

    fn visit_i64<E: de::Error>(self, secs: i64) -> Result<RunTime, E> {
        u64::try_from(secs)
            .map(|secs| RunTime(Duration::from_secs(secs)))
            .map_err(|_| E::custom(format!("duration must not be negative (got {secs})")))
    }

    fn visit_f64<E: de::Error>(self, secs: f64) -> Result<RunTime, E> {
        Duration::try_from_secs_f64(secs)
            .map(RunTime)
            .map_err(|_| E::custom(format!("invalid duration of {secs} seconds")))
    }
}

/// Relative path of a screenshot, always held with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotRef(String);

impl ScreenshotRef {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenshotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ScreenshotRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.replace('\\', "/"))
    }
}

impl<'de> Deserialize<'de> for ScreenshotRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Err(de::Error::custom("screenshot path must not be empty"));
        }
        Ok(ScreenshotRef::new(&raw))
    }
}
