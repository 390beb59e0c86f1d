//! Adding one entry to a ledger file through a [`Prompter`](crate::prompt::Prompter).
use crate::error::{RecordError, RecordResult};
use crate::parse::{parse_date, parse_duration, parse_score, today};
use crate::prompt::{ask_with, select, Field, Prompter, Step};
use crate::records::{
    self, CompletedEntry, DifficultyEntry, Entry, EntryDate, RecordKind, RunTime, ScoredEntry,
    ScreenshotRef, TimedEntry,
};
use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRecordOutcome {
    Added { game: String, record_type: String },
    /// The user cancelled; nothing was written.
    Cancelled,
}

/// Steps of collecting one entry, in order. Selection and parsing steps
/// repeat on bad input; the first three also accept a cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordStep {
    SelectGame,
    SelectRecordType,
    CollectDate,
    CollectDescription,
    CollectScreenshot,
    CollectTypeSpecific,
    BuildEntry,
    ValidateAndSave,
}

#[derive(Debug, Clone, PartialEq)]
enum Detail {
    Nothing,
    Difficulty(String),
    Time(RunTime),
    Score(f64),
}

#[derive(Debug, Default)]
struct Draft {
    game: usize,
    record_type: usize,
    date: Option<NaiveDate>,
    description: Option<String>,
    screenshot: Option<ScreenshotRef>,
    detail: Option<Detail>,
    entry: Option<Entry>,
}

/// Collect one entry through `prompter` and append it to the chosen record
/// type of the ledger at `path`.
pub fn add_record(path: &Path, prompter: &mut dyn Prompter) -> RecordResult<AddRecordOutcome> {
    let mut document = records::load(path)?;
    if document.games.is_empty() {
        return Err(RecordError::NotFound(format!(
            "{} has no games; add one with add-game first",
            path.display()
        )));
    }

    let mut draft = Draft::default();
    let mut step = RecordStep::SelectGame;
    loop {
        tracing::debug!(?step, "add-record step");
        step = match step {
            RecordStep::SelectGame => {
                let names: Vec<&str> = document.games.iter().map(|g| g.name.as_str()).collect();
                match select(prompter, Field::Game, &names, true)? {
                    Step::Answer(index) => draft.game = index,
                    Step::Cancelled => return Ok(cancelled()),
                }
                RecordStep::SelectRecordType
            }
            RecordStep::SelectRecordType => {
                let game = &document.games[draft.game];
                if game.record_types().is_empty() {
                    return Err(RecordError::NotFound(format!(
                        "game {:?} has no record types",
                        game.name
                    )));
                }
                let names: Vec<&str> =
                    game.record_types().iter().map(|rt| rt.name.as_str()).collect();
                match select(prompter, Field::RecordType, &names, true)? {
                    Step::Answer(index) => draft.record_type = index,
                    Step::Cancelled => return Ok(cancelled()),
                }
                RecordStep::CollectDate
            }
            RecordStep::CollectDate => {
                let today = today();
                let question = "Date (YYYY-MM-DD, empty for today, q to cancel)";
                let step = ask_with(prompter, Field::Date, question, true, |raw| {
                    parse_date(raw, today)
                })?;
                match step {
                    Step::Answer(date) => draft.date = Some(date),
                    Step::Cancelled => return Ok(cancelled()),
                }
                RecordStep::CollectDescription
            }
            RecordStep::CollectDescription => {
                draft.description =
                    optional_text(prompter, Field::Description, "Description (optional)")?;
                RecordStep::CollectScreenshot
            }
            RecordStep::CollectScreenshot => {
                draft.screenshot = optional_text(
                    prompter,
                    Field::Screenshot,
                    "Screenshot path relative to the records file (optional)",
                )?
                .map(|raw| ScreenshotRef::new(&raw));
                RecordStep::CollectTypeSpecific
            }
            RecordStep::CollectTypeSpecific => {
                let game = &document.games[draft.game];
                let kind = game.record_types()[draft.record_type].kind;
                draft.detail = Some(match kind {
                    RecordKind::Completed => Detail::Nothing,
                    RecordKind::CompletedAtDifficulty => {
                        let difficulties: Vec<&str> =
                            game.difficulties().iter().map(String::as_str).collect();
                        if difficulties.is_empty() {
                            return Err(RecordError::NotFound(format!(
                                "game {:?} declares no difficulties",
                                game.name
                            )));
                        }
                        let step = select(prompter, Field::Difficulty, &difficulties, false)?;
                        let index = required(step)?;
                        Detail::Difficulty(difficulties[index].to_string())
                    }
                    RecordKind::FastestTime | RecordKind::LongestTime => {
                        let question = "Time (H:MM:SS, M:SS, 1h30m15s or seconds)";
                        let step =
                            ask_with(prompter, Field::Time, question, false, parse_duration)?;
                        Detail::Time(RunTime(required(step)?))
                    }
                    RecordKind::HighScore | RecordKind::LowScore => {
                        let step = ask_with(prompter, Field::Score, "Score", false, parse_score)?;
                        Detail::Score(required(step)?)
                    }
                });
                RecordStep::BuildEntry
            }
            RecordStep::BuildEntry => {
                draft.entry = Some(build_entry(&mut draft)?);
                RecordStep::ValidateAndSave
            }
            RecordStep::ValidateAndSave => {
                let entry = draft
                    .entry
                    .take()
                    .ok_or_else(|| RecordError::Prompt("no entry was built".to_string()))?;
                let game = &mut document.games[draft.game];
                let game_name = game.name.clone();
                let record_type = game
                    .record_types
                    .as_mut()
                    .and_then(|record_types| record_types.get_mut(draft.record_type))
                    .ok_or_else(|| {
                        RecordError::NotFound("selected record type is missing".to_string())
                    })?;
                let record_type_name = record_type.name.clone();
                record_type.records.get_or_insert_with(Vec::new).push(entry);

                records::save(path, &document)?;
                tracing::info!(
                    path = %path.display(),
                    game = %game_name,
                    record_type = %record_type_name,
                    "record added"
                );
                return Ok(AddRecordOutcome::Added {
                    game: game_name,
                    record_type: record_type_name,
                });
            }
        };
    }
}

fn build_entry(draft: &mut Draft) -> RecordResult<Entry> {
    let date = draft
        .date
        .map(EntryDate::from)
        .ok_or_else(|| RecordError::Prompt("no date was collected".to_string()))?;
    let description = draft.description.take();
    let screenshot = draft.screenshot.take();
    let detail = draft
        .detail
        .take()
        .ok_or_else(|| RecordError::Prompt("no record details were collected".to_string()))?;
    Ok(match detail {
        Detail::Nothing => Entry::Completed(CompletedEntry {
            date,
            description,
            screenshot,
        }),
        Detail::Difficulty(difficulty) => Entry::CompletedAtDifficulty(DifficultyEntry {
            date,
            description,
            screenshot,
            difficulty,
        }),
        Detail::Time(time) => Entry::Timed(TimedEntry {
            date,
            description,
            screenshot,
            time,
        }),
        Detail::Score(score) => Entry::Scored(ScoredEntry {
            date,
            description,
            screenshot,
            score,
        }),
    })
}

fn optional_text(
    prompter: &mut dyn Prompter,
    field: Field,
    question: &str,
) -> RecordResult<Option<String>> {
    let step = ask_with(prompter, field, question, false, |raw| {
        let trimmed = raw.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    })?;
    required(step)
}

fn required<T>(step: Step<T>) -> RecordResult<T> {
    match step {
        Step::Answer(value) => Ok(value),
        Step::Cancelled => Err(RecordError::Prompt("this step cannot be cancelled".to_string())),
    }
}

fn cancelled() -> AddRecordOutcome {
    tracing::info!("add-record cancelled; nothing written");
    AddRecordOutcome::Cancelled
}

#[cfg(test)]
#[path = "add_record_tests.rs"]
mod tests;
