//! Loading and saving a ledger file.
//!
//! A load is: read bytes, parse JSON, upgrade legacy entries, decode, then
//! validate against the file's own directory. A save validates first and
//! only then replaces the file, so a rejected document never reaches disk.
use super::{
    game_location, record_type_location, validate_document, Entry, Game, RecordData, RecordKind,
};
use crate::error::{RecordError, RecordResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Load and validate the ledger at `path`.
pub fn load(path: &Path) -> RecordResult<RecordData> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => RecordError::NotFound(format!("{} does not exist", path.display())),
        _ => RecordError::io("read", path, err),
    })?;
    let document = decode(path, &bytes)?;
    validate_document(&document, &base_dir(path))?;
    tracing::debug!(path = %path.display(), games = document.games.len(), "loaded ledger");
    Ok(document)
}

/// Load the ledger at `path`, or start an empty one when the file is missing
/// or holds only whitespace.
pub fn load_or_default(path: &Path) -> RecordResult<RecordData> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
            tracing::debug!(path = %path.display(), "ledger file is empty; starting fresh");
            Ok(RecordData::default())
        }
        Ok(_) => load(path),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "ledger file missing; starting fresh");
            Ok(RecordData::default())
        }
        Err(err) => Err(RecordError::io("read", path, err)),
    }
}

/// Validate `document` against `path`'s directory and write it in full.
///
/// The bytes go to a temporary file next to the ledger that is then renamed
/// over it, so readers never observe a half-written ledger. When `path` is a
/// symlink the file it points to is replaced and the link is kept.
pub fn save(path: &Path, document: &RecordData) -> RecordResult<()> {
    validate_document(document, &base_dir(path))?;
    let text = to_json(document)?;

    let target = resolve_target(path)?;
    let dir = base_dir(&target);
    let permissions = match fs::metadata(&target) {
        Ok(existing) => Some(existing.permissions()),
        Err(err) if err.kind() == ErrorKind::NotFound => new_ledger_permissions(),
        Err(err) => return Err(RecordError::io("inspect", &target, err)),
    };

    let mut staged = tempfile::NamedTempFile::new_in(&dir)
        .map_err(|err| RecordError::io("create temporary file in", &dir, err))?;
    let staged_path = staged.path().to_path_buf();
    if let Some(permissions) = permissions {
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(|err| RecordError::io("set permissions on", &staged_path, err))?;
    }
    staged
        .write_all(text.as_bytes())
        .map_err(|err| RecordError::io("write", &staged_path, err))?;
    staged
        .flush()
        .map_err(|err| RecordError::io("write", &staged_path, err))?;
    staged
        .persist(&target)
        .map_err(|err| RecordError::io("replace", &target, err.error))?;
    tracing::info!(
        path = %path.display(),
        target = %target.display(),
        games = document.games.len(),
        "saved ledger"
    );
    Ok(())
}

/// The file a save replaces: `path` with symlinks resolved, or `path` itself
/// when nothing exists there yet.
fn resolve_target(path: &Path) -> RecordResult<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(RecordError::io("resolve", path, err)),
    }
}

/// Mode for a ledger created by a save. Temporary files start owner-only.
#[cfg(unix)]
fn new_ledger_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_ledger_permissions() -> Option<fs::Permissions> {
    None
}

/// Pretty-printed (2-space) JSON with a trailing newline.
pub fn to_json(document: &RecordData) -> RecordResult<String> {
    let mut text = serde_json::to_string_pretty(document)
        .map_err(|err| RecordError::field("document", format!("serialize ledger: {err}")))?;
    text.push('\n');
    Ok(text)
}

/// Parse and decode ledger bytes without touching the filesystem further.
pub(crate) fn decode(path: &Path, bytes: &[u8]) -> RecordResult<RecordData> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| RecordError::Structural {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    match value {
        Value::Object(mut root) => {
            upgrade_document(&mut root);
            decode_document(&mut root)
        }
        other => Err(RecordError::Structural {
            path: path.to_path_buf(),
            message: format!("root must be a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Fill in `entry_type` for entries written before the tag existed, and
/// normalize screenshot separators, so decoding sees the current shape.
fn upgrade_document(root: &mut Map<String, Value>) {
    let Some(Value::Array(games)) = root.get_mut("games") else {
        return;
    };
    for game in games.iter_mut() {
        let Some(Value::Array(record_types)) = game.get_mut("record_types") else {
            continue;
        };
        for record_type in record_types.iter_mut() {
            let tag = record_type
                .get("type")
                .and_then(Value::as_str)
                .and_then(RecordKind::from_name)
                .map(|kind| kind.entry_variant().tag());
            let Some(Value::Array(records)) = record_type.get_mut("records") else {
                continue;
            };
            for record in records.iter_mut() {
                let Some(record) = record.as_object_mut() else {
                    continue;
                };
                let untagged = matches!(record.get("entry_type"), None | Some(Value::Null));
                if let (true, Some(tag)) = (untagged, tag) {
                    record.insert("entry_type".to_string(), Value::String(tag.to_string()));
                }
                if let Some(Value::String(screenshot)) = record.get_mut("screenshot") {
                    *screenshot = screenshot.replace('\\', "/");
                }
            }
        }
    }
}

/// Decode game by game so a schema error names the game it came from.
fn decode_document(root: &mut Map<String, Value>) -> RecordResult<RecordData> {
    if let Some(key) = root.keys().find(|key| key.as_str() != "games") {
        return Err(RecordError::field(
            "document",
            format!("unknown field `{key}`, expected `games`"),
        ));
    }
    let games = match root.remove("games") {
        Some(Value::Array(games)) => games,
        Some(other) => {
            return Err(RecordError::field(
                "document",
                format!("`games` must be an array, found {}", json_kind(&other)),
            ))
        }
        None => return Err(RecordError::field("document", "missing field `games`")),
    };

    let mut decoded = Vec::with_capacity(games.len());
    for (index, value) in games.into_iter().enumerate() {
        let label = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();
        let game = decode_game(value, &game_location(index, &label))?;
        decoded.push(game);
    }
    Ok(RecordData { games: decoded })
}

fn decode_game(value: Value, location: &str) -> RecordResult<Game> {
    // Entries are decoded one at a time first, only to report the position of
    // a bad entry. Record types with an unknown `type` are left to the
    // game-level decode, which names the bad enum member.
    if let Some(Value::Array(record_types)) = value.get("record_types") {
        for (index, record_type) in record_types.iter().enumerate() {
            let known_kind = record_type
                .get("type")
                .and_then(Value::as_str)
                .and_then(RecordKind::from_name)
                .is_some();
            let name = record_type.get("name").and_then(Value::as_str).unwrap_or("?");
            let rt_location = record_type_location(location, index, name);
            if let (true, Some(Value::Array(records))) = (known_kind, record_type.get("records")) {
                for (entry_index, record) in records.iter().enumerate() {
                    if let Err(err) = Entry::deserialize(record) {
                        return Err(RecordError::field(
                            format!("{rt_location} > records[{entry_index}]"),
                            err.to_string(),
                        ));
                    }
                }
            }
        }
    }
    serde_json::from_value(value).map_err(|err| RecordError::field(location, err.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Directory screenshots are resolved against: the ledger's own directory.
pub fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
