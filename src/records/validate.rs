//! Whole-document validation.
//!
//! Decoding already enforces per-field shape (required keys, unknown keys,
//! enum members). This pass checks what serde cannot see: entry variants
//! against their record type, difficulties against the game's declared list,
//! and screenshots against the filesystem relative to `base_dir`.
use super::{game_location, record_type_location, Entry, Game, RecordData, RecordKind, RecordType};
use crate::error::{RecordError, RecordResult};
use std::collections::BTreeSet;
use std::path::Path;

/// Validate every game in `document`. Screenshots resolve against `base_dir`,
/// the directory holding the ledger file.
pub fn validate_document(document: &RecordData, base_dir: &Path) -> RecordResult<()> {
    for (index, game) in document.games.iter().enumerate() {
        validate_game(game, &game_location(index, &game.name), base_dir)?;
    }
    Ok(())
}

pub(crate) fn validate_game(game: &Game, location: &str, base_dir: &Path) -> RecordResult<()> {
    if let Some(difficulties) = &game.difficulties {
        let mut seen = BTreeSet::new();
        for label in difficulties {
            if !seen.insert(label.as_str()) {
                return Err(RecordError::field(
                    location,
                    format!("difficulty {label:?} is listed more than once"),
                ));
            }
        }
    }

    for (index, record_type) in game.record_types().iter().enumerate() {
        let rt_location = record_type_location(location, index, &record_type.name);
        validate_record_type(record_type, &rt_location, base_dir)?;
        check_difficulties(game, record_type, &rt_location)?;
    }
    Ok(())
}

/// Every entry must be the variant the record type declares.
pub(crate) fn validate_record_type(
    record_type: &RecordType,
    location: &str,
    base_dir: &Path,
) -> RecordResult<()> {
    let expected = record_type.kind.entry_variant();
    for (index, entry) in record_type.records().iter().enumerate() {
        let entry_location = format!("{location} > records[{index}]");
        if entry.variant() != expected {
            return Err(RecordError::cross(
                entry_location,
                format!(
                    "record type {} expects {expected:?} entries (entry_type {:?}) but found entry_type {:?}",
                    record_type.kind,
                    expected.tag(),
                    entry.variant().tag()
                ),
            ));
        }
        check_screenshot(entry, &entry_location, base_dir)?;
    }
    Ok(())
}

fn check_difficulties(game: &Game, record_type: &RecordType, location: &str) -> RecordResult<()> {
    if record_type.kind != RecordKind::CompletedAtDifficulty {
        return Ok(());
    }
    let Some(difficulties) = &game.difficulties else {
        return Err(RecordError::cross(
            location,
            format!(
                "game {:?} declares no difficulties, so it cannot have a completed_at_difficulty record type",
                game.name
            ),
        ));
    };
    for (index, entry) in record_type.records().iter().enumerate() {
        let Entry::CompletedAtDifficulty(entry) = entry else {
            continue;
        };
        if !difficulties.contains(&entry.difficulty) {
            return Err(RecordError::cross(
                format!("{location} > records[{index}]"),
                format!(
                    "difficulty {:?} is not declared for game {:?} (record type {:?}; declared: {})",
                    entry.difficulty,
                    game.name,
                    record_type.name,
                    difficulties.join(", ")
                ),
            ));
        }
    }
    Ok(())
}

fn check_screenshot(entry: &Entry, location: &str, base_dir: &Path) -> RecordResult<()> {
    let Some(reference) = entry.screenshot() else {
        return Ok(());
    };
    let resolved = base_dir.join(reference.as_str());
    if resolved.is_file() {
        return Ok(());
    }
    Err(RecordError::Reference {
        location: location.to_string(),
        reference: reference.as_str().to_string(),
        resolved,
    })
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
