//! Adding a game to a ledger file, optionally set up interactively.
use crate::error::{RecordError, RecordResult};
use crate::parse::ParseError;
use crate::prompt::{ask_with, Field, Prompter, Step};
use crate::records::{self, Game, RecordKind, RecordType};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddGameOutcome {
    Added,
    /// A game with exactly this name is already in the file; nothing was written.
    AlreadyExists,
}

/// Append a game named `name` to the ledger at `path`, creating the file if
/// needed.
///
/// With a prompter, difficulties and record types are collected first;
/// without one the game is added bare.
pub fn add_game(
    path: &Path,
    name: &str,
    prompter: Option<&mut dyn Prompter>,
) -> RecordResult<AddGameOutcome> {
    if name.trim().is_empty() {
        return Err(RecordError::field("game", "game name must not be empty"));
    }
    let mut document = records::load_or_default(path)?;
    if document.game(name).is_some() {
        tracing::info!(path = %path.display(), game = name, "game already present");
        return Ok(AddGameOutcome::AlreadyExists);
    }

    let game = match prompter {
        Some(prompter) => collect_game(prompter, name)?,
        None => Game::new(name),
    };
    document.games.push(game);
    records::save(path, &document)?;
    tracing::info!(path = %path.display(), game = name, "game added");
    Ok(AddGameOutcome::Added)
}

fn collect_game(prompter: &mut dyn Prompter, name: &str) -> RecordResult<Game> {
    let mut game = Game::new(name);
    game.difficulties = answer(ask_with(
        prompter,
        Field::Difficulties,
        "Difficulties (comma-separated, empty for none)",
        false,
        parse_difficulties,
    )?)?;

    let mut record_types: Vec<RecordType> = Vec::new();
    loop {
        let taken: BTreeSet<String> = record_types.iter().map(|rt| rt.name.clone()).collect();
        let rt_name = answer(ask_with(
            prompter,
            Field::RecordTypeName,
            "Record type name (empty to finish)",
            false,
            |raw| {
                let raw = raw.trim();
                if taken.contains(raw) {
                    return Err(ParseError::new(format!(
                        "record type {raw:?} was already added to this game"
                    )));
                }
                Ok(raw.to_string())
            },
        )?)?;
        if rt_name.is_empty() {
            break;
        }

        let has_difficulties = game.difficulties.is_some();
        let kind = answer(ask_with(
            prompter,
            Field::RecordTypeKind,
            &kind_question(),
            false,
            |raw| parse_kind(raw, has_difficulties),
        )?)?;
        let description = answer(ask_with(
            prompter,
            Field::RecordTypeDescription,
            "Description (optional)",
            false,
            |raw| Ok(non_empty(raw)),
        )?)?;

        record_types.push(RecordType {
            description,
            ..RecordType::new(rt_name, kind)
        });
    }
    if !record_types.is_empty() {
        game.record_types = Some(record_types);
    }
    Ok(game)
}

fn answer<T>(step: Step<T>) -> RecordResult<T> {
    match step {
        Step::Answer(value) => Ok(value),
        Step::Cancelled => Err(RecordError::Prompt("game setup cancelled".to_string())),
    }
}

fn kind_question() -> String {
    let mut question = String::from("Record type kind:");
    for (index, kind) in RecordKind::ALL.iter().enumerate() {
        question.push_str(&format!("\n  {}) {kind}", index + 1));
    }
    question.push_str("\nKind (number or name)");
    question
}

fn parse_kind(raw: &str, has_difficulties: bool) -> Result<RecordKind, ParseError> {
    let raw = raw.trim();
    let kind = RecordKind::from_name(raw)
        .or_else(|| {
            raw.parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .and_then(|index| RecordKind::ALL.get(index).copied())
        })
        .ok_or_else(|| {
            let names: Vec<&str> = RecordKind::ALL.iter().map(|kind| kind.as_str()).collect();
            ParseError::new(format!(
                "unknown record type kind {raw:?}; choose one of: {}",
                names.join(", ")
            ))
        })?;
    if kind == RecordKind::CompletedAtDifficulty && !has_difficulties {
        return Err(ParseError::new(
            "completed_at_difficulty needs the game to declare difficulties",
        ));
    }
    Ok(kind)
}

fn parse_difficulties(raw: &str) -> Result<Option<Vec<String>>, ParseError> {
    let labels: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Ok(None);
    }
    let mut seen = BTreeSet::new();
    for label in &labels {
        if !seen.insert(label.as_str()) {
            return Err(ParseError::new(format!(
                "difficulty {label:?} is listed more than once"
            )));
        }
    }
    Ok(Some(labels))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "add_game_tests.rs"]
mod tests;
