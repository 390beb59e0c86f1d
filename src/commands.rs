//! Command handlers: run one core operation and report it.
use crate::cli::{AddGameArgs, AddRecordArgs, Command, ShowArgs, ValidateArgs};
use crate::edit::{self, AddGameOutcome, AddRecordOutcome};
use crate::prompt::{Field, FieldAnswers, Prompter, TerminalPrompter};
use crate::records::{self, summary};
use anyhow::{Context, Result};
use std::process::ExitCode;

pub fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Validate(args) => run_validate(&args),
        Command::AddGame(args) => run_add_game(&args),
        Command::AddRecord(args) => run_add_record(&args),
        Command::Show(args) => run_show(&args),
    }
}

/// Report whether the file is valid. Only `--raise-error` turns an invalid
/// file into a failing exit status.
fn run_validate(args: &ValidateArgs) -> Result<ExitCode> {
    let file = args.file.display();
    match records::load(&args.file) {
        Ok(document) => {
            tracing::debug!(games = document.games.len(), "validation passed");
            println!("{file} is valid");
        }
        Err(err) => {
            tracing::warn!(kind = err.kind(), "validation failed");
            println!("{file} is not valid. The following error occurred:");
            println!("{err}");
            if args.raise_error {
                return Err(err).with_context(|| format!("validate {file}"));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_add_game(args: &AddGameArgs) -> Result<ExitCode> {
    let mut terminal = TerminalPrompter::stdio();
    let prompter: Option<&mut dyn Prompter> = if args.no_interactive {
        None
    } else {
        Some(&mut terminal)
    };
    let file = args.file.display();
    match edit::add_game(&args.file, &args.name, prompter) {
        Ok(AddGameOutcome::Added) => println!("Game '{}' added to {file}", args.name),
        Ok(AddGameOutcome::AlreadyExists) => {
            println!("Game '{}' already exists in {file}", args.name)
        }
        Err(err) => {
            tracing::warn!(kind = err.kind(), "add-game failed");
            println!("Error adding game: {err}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_add_record(args: &AddRecordArgs) -> Result<ExitCode> {
    let result = if args.no_interactive {
        let mut answers = field_answers(args);
        edit::add_record(&args.file, &mut answers)
    } else {
        edit::add_record(&args.file, &mut TerminalPrompter::stdio())
    };
    let file = args.file.display();
    match result {
        Ok(AddRecordOutcome::Added { game, record_type }) => {
            println!("Record added to {file} ({game} / {record_type})");
            Ok(ExitCode::SUCCESS)
        }
        Ok(AddRecordOutcome::Cancelled) => {
            println!("Record not added");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::warn!(kind = err.kind(), "add-record failed");
            println!("Error adding record: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn field_answers(args: &AddRecordArgs) -> FieldAnswers {
    let mut answers = FieldAnswers::new();
    answers
        .set(Field::Game, args.game.as_deref())
        .set(Field::RecordType, args.record_type.as_deref())
        .set(Field::Date, args.date.as_deref())
        .set(Field::Description, args.description.as_deref())
        .set(Field::Screenshot, args.screenshot.as_deref())
        .set(Field::Difficulty, args.difficulty.as_deref())
        .set(Field::Time, args.time.as_deref())
        .set(Field::Score, args.score.as_deref());
    answers
}

fn run_show(args: &ShowArgs) -> Result<ExitCode> {
    let document = records::load(&args.file)
        .with_context(|| format!("load {}", args.file.display()))?;
    print!("{}", summary::render_summary(&document));
    Ok(ExitCode::SUCCESS)
}
