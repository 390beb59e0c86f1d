//! Per record type highlights for the `show` report.
use super::{Entry, RecordData, RecordKind, RecordType};
use crate::parse::format_clock;
use std::cmp::Ordering;

/// The entry that represents the record: the fastest or longest run, the
/// highest or lowest score, or the most recent completion. Ties go to the
/// entry listed first.
pub fn best_entry(record_type: &RecordType) -> Option<&Entry> {
    let mut best: Option<&Entry> = None;
    for entry in record_type.records() {
        let better = match best {
            None => true,
            Some(current) => compare(record_type.kind, entry, current) == Ordering::Greater,
        };
        if better {
            best = Some(entry);
        }
    }
    best
}

/// Ordering where `Greater` means "a better record than".
fn compare(kind: RecordKind, candidate: &Entry, current: &Entry) -> Ordering {
    match (kind, candidate, current) {
        (RecordKind::FastestTime, Entry::Timed(a), Entry::Timed(b)) => b.time.cmp(&a.time),
        (RecordKind::LongestTime, Entry::Timed(a), Entry::Timed(b)) => a.time.cmp(&b.time),
        (RecordKind::HighScore, Entry::Scored(a), Entry::Scored(b)) => a.score.total_cmp(&b.score),
        (RecordKind::LowScore, Entry::Scored(a), Entry::Scored(b)) => b.score.total_cmp(&a.score),
        _ => candidate.date().sort_key().cmp(&current.date().sort_key()),
    }
}

/// One-line description of an entry, e.g. `1:02:03 on 2024-05-01`.
pub fn describe_entry(entry: &Entry) -> String {
    let value = match entry {
        Entry::Completed(_) => "completed".to_string(),
        Entry::CompletedAtDifficulty(entry) => format!("completed on {}", entry.difficulty),
        Entry::Timed(entry) => format_clock(entry.time.0),
        Entry::Scored(entry) => format!("{}", entry.score),
    };
    let mut line = format!("{value} on {}", entry.date());
    if let Some(description) = entry.description() {
        line.push_str(&format!(" ({description})"));
    }
    line
}

/// Plain-text overview of every game, used by the `show` command.
pub fn render_summary(document: &RecordData) -> String {
    let mut out = String::new();
    if document.games.is_empty() {
        out.push_str("No games recorded.\n");
        return out;
    }
    for game in &document.games {
        out.push_str(&game.name);
        out.push('\n');
        if let Some(difficulties) = &game.difficulties {
            out.push_str(&format!("  difficulties: {}\n", difficulties.join(", ")));
        }
        if game.record_types().is_empty() {
            out.push_str("  no record types\n");
        }
        for record_type in game.record_types() {
            let count = record_type.records().len();
            let noun = if count == 1 { "entry" } else { "entries" };
            out.push_str(&format!(
                "  {} [{}]: {count} {noun}",
                record_type.name, record_type.kind
            ));
            if let Some(best) = best_entry(record_type) {
                out.push_str(&format!("; best: {}", describe_entry(best)));
            }
            out.push('\n');
        }
    }
    out
}
