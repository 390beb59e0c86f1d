//! The "ask" capability used by interactive edits.
//!
//! Edits never read the terminal directly. They ask a [`Prompter`] for one
//! field at a time, so the same flow runs against a person at a terminal,
//! a fixed set of answers from command-line flags, or a script in tests.
use crate::error::{RecordError, RecordResult};
use crate::parse::ParseError;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};

/// Attempts allowed for one question before the edit gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Answer that abandons an edit at a step that allows cancelling.
pub const CANCEL: &str = "q";

/// Fields an edit may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Game,
    RecordType,
    Date,
    Description,
    Screenshot,
    Difficulty,
    Time,
    Score,
    Difficulties,
    RecordTypeName,
    RecordTypeKind,
    RecordTypeDescription,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Game => "game",
            Self::RecordType => "record type",
            Self::Date => "date",
            Self::Description => "description",
            Self::Screenshot => "screenshot",
            Self::Difficulty => "difficulty",
            Self::Time => "time",
            Self::Score => "score",
            Self::Difficulties => "difficulties",
            Self::RecordTypeName => "record type name",
            Self::RecordTypeKind => "record type kind",
            Self::RecordTypeDescription => "record type description",
        })
    }
}

pub trait Prompter {
    /// Ask for `field`. `Ok(None)` means the input is exhausted.
    fn ask(&mut self, field: Field, question: &str) -> io::Result<Option<String>>;

    /// Tell the user why an answer was refused, before it is asked again.
    fn reject(&mut self, field: Field, message: &str);

    fn max_attempts(&self) -> usize {
        DEFAULT_MAX_ATTEMPTS
    }
}

/// Line-based prompting: questions go to `output`, answers come from `input`.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr so stdout carries only command results.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, _field: Field, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn reject(&mut self, _field: Field, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}

/// Answers supplied up front, keyed by field. Unsupplied fields read as
/// empty, and every question gets exactly one attempt.
#[derive(Debug, Default, Clone)]
pub struct FieldAnswers {
    answers: BTreeMap<Field, String>,
}

impl FieldAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(value) = value {
            self.answers.insert(field, value.into());
        }
        self
    }
}

impl Prompter for FieldAnswers {
    fn ask(&mut self, field: Field, _question: &str) -> io::Result<Option<String>> {
        Ok(Some(self.answers.get(&field).cloned().unwrap_or_default()))
    }

    fn reject(&mut self, field: Field, message: &str) {
        tracing::debug!(%field, message, "answer rejected");
    }

    fn max_attempts(&self) -> usize {
        1
    }
}

/// Outcome of one question.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    Answer(T),
    Cancelled,
}

/// Ask until `parse` accepts an answer, up to the prompter's attempt limit.
///
/// When `cancellable`, the [`CANCEL`] answer or exhausted input cancels.
/// Otherwise exhausted input is parsed once as an empty answer, which lets
/// optional fields default and makes required ones fail.
pub fn ask_with<T, P>(
    prompter: &mut dyn Prompter,
    field: Field,
    question: &str,
    cancellable: bool,
    mut parse: P,
) -> RecordResult<Step<T>>
where
    P: FnMut(&str) -> Result<T, ParseError>,
{
    let attempts = prompter.max_attempts().max(1);
    let mut last_error = None;
    for _ in 0..attempts {
        let answer = prompter
            .ask(field, question)
            .map_err(|err| RecordError::Prompt(format!("reading {field}: {err}")))?;
        let Some(answer) = answer else {
            if cancellable {
                return Ok(Step::Cancelled);
            }
            return parse("").map(Step::Answer).map_err(|err| {
                RecordError::Prompt(format!("no {field} given: {err}"))
            });
        };
        if cancellable && answer.trim().eq_ignore_ascii_case(CANCEL) {
            return Ok(Step::Cancelled);
        }
        match parse(&answer) {
            Ok(value) => return Ok(Step::Answer(value)),
            Err(err) => {
                prompter.reject(field, &err.to_string());
                last_error = Some(err);
            }
        }
    }
    let reason = last_error.map(|err| err.to_string()).unwrap_or_default();
    Err(RecordError::Prompt(format!(
        "invalid {field} after {attempts} attempt(s): {reason}"
    )))
}

/// Ask for one of `options`, by 1-based number or exact name.
pub fn select(
    prompter: &mut dyn Prompter,
    field: Field,
    options: &[&str],
    cancellable: bool,
) -> RecordResult<Step<usize>> {
    let mut question = format!("Select a {field}:");
    for (index, option) in options.iter().enumerate() {
        question.push_str(&format!("\n  {}) {option}", index + 1));
    }
    question.push_str(&format!("\n{field} (number or name"));
    if cancellable {
        question.push_str(&format!(", {CANCEL} to cancel"));
    }
    question.push(')');

    ask_with(prompter, field, &question, cancellable, |raw| {
        let raw = raw.trim();
        if let Some(index) = options.iter().position(|option| *option == raw) {
            return Ok(index);
        }
        match raw.parse::<usize>() {
            Ok(number) if (1..=options.len()).contains(&number) => Ok(number - 1),
            _ => Err(ParseError::new(format!(
                "{raw:?} is not a listed {field}; enter a number from 1 to {} or an exact name",
                options.len()
            ))),
        }
    })
}

/// Answers replayed in order, recording every question and rejection.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<Field>,
    pub rejections: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, field: Field, _question: &str) -> io::Result<Option<String>> {
        self.asked.push(field);
        Ok(self.answers.pop_front())
    }

    fn reject(&mut self, _field: Field, message: &str) {
        self.rejections.push(message.to_string());
    }
}
