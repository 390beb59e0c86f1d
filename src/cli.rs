//! CLI argument parsing.
//!
//! The CLI only maps arguments onto the records core; all schema rules live
//! in `records` and all edits in `edit`.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "miscore",
    version,
    about = "MiScore - Personal gaming leaderboard system",
    after_help = "Examples:\n  miscore validate records.json\n  miscore add-game \"Celeste\" records.json --no-interactive\n  miscore add-record records.json\n  miscore add-record records.json --no-interactive --game Celeste --record-type \"Any%\" --time 29:05\n  miscore show records.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Validate(ValidateArgs),
    AddGame(AddGameArgs),
    AddRecord(AddRecordArgs),
    Show(ShowArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Validate(args) => args.verbose,
            Command::AddGame(args) => args.verbose,
            Command::AddRecord(args) => args.verbose,
            Command::Show(args) => args.verbose,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Validate a records JSON file")]
pub struct ValidateArgs {
    /// Records file to check
    #[arg(value_name = "FILENAME")]
    pub file: PathBuf,

    /// Exit with an error instead of only reporting an invalid file
    #[arg(long, visible_alias = "raise_error")]
    pub raise_error: bool,

    /// Emit debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Add a new game to a records file")]
pub struct AddGameArgs {
    /// Name of the game; must not already exist in the file
    #[arg(value_name = "GAME_NAME")]
    pub name: String,

    /// Records file; created when missing
    #[arg(value_name = "FILENAME")]
    pub file: PathBuf,

    /// Skip interactive difficulty and record type setup
    #[arg(long)]
    pub no_interactive: bool,

    /// Emit debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Add a record entry to a game in a records file")]
pub struct AddRecordArgs {
    /// Records file holding the game
    #[arg(value_name = "FILENAME")]
    pub file: PathBuf,

    /// Take every field from the flags below instead of prompting
    #[arg(long)]
    pub no_interactive: bool,

    /// Game name (or its number in the file)
    #[arg(long, requires = "no_interactive")]
    pub game: Option<String>,

    /// Record type name (or its number within the game)
    #[arg(long, value_name = "NAME", requires = "no_interactive")]
    pub record_type: Option<String>,

    /// Date as YYYY-MM-DD; defaults to today
    #[arg(long, requires = "no_interactive")]
    pub date: Option<String>,

    #[arg(long, requires = "no_interactive")]
    pub description: Option<String>,

    /// Screenshot path relative to the records file
    #[arg(long, value_name = "PATH", requires = "no_interactive")]
    pub screenshot: Option<String>,

    /// Difficulty, for completed_at_difficulty record types
    #[arg(long, requires = "no_interactive")]
    pub difficulty: Option<String>,

    /// Time as H:MM:SS, M:SS, 1h30m15s or seconds, for timed record types
    #[arg(long, requires = "no_interactive")]
    pub time: Option<String>,

    /// Score, for high_score and low_score record types
    #[arg(long, allow_hyphen_values = true, requires = "no_interactive")]
    pub score: Option<String>,

    /// Emit debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Summarize games and their best records")]
pub struct ShowArgs {
    /// Records file to summarize
    #[arg(value_name = "FILENAME")]
    pub file: PathBuf,

    /// Emit debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}
