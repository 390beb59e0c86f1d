//! Transactional edits of a ledger file.
//!
//! Each edit loads the whole document, changes it in memory, and hands it to
//! `records::save`, which re-validates everything before replacing the file.
//! An edit that fails at any point leaves the file as it was.

mod add_game;
mod add_record;

pub use add_game::{add_game, AddGameOutcome};
pub use add_record::{add_record, AddRecordOutcome};
