//! Error kinds for loading, validating and editing a records ledger.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the records core.
///
/// Each schema failure carries a `location` such as
/// `games[0] "Hades" > record_types[1] "Runs" > records[2]` so the report
/// points at the offending object.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The bytes are not JSON, or the root is not an object.
    #[error("malformed document {}: {message}", path.display())]
    Structural { path: PathBuf, message: String },

    /// A single field broke its own rule (missing, unknown, wrong type or value).
    #[error("{location}: {message}")]
    FieldConstraint { location: String, message: String },

    /// Two objects disagree (entry variant vs record type, undeclared difficulty).
    #[error("{location}: {message}")]
    CrossField { location: String, message: String },

    /// A screenshot does not resolve to an existing regular file.
    #[error("{location}: screenshot {reference:?} does not exist (looked for {})", resolved.display())]
    Reference {
        location: String,
        reference: String,
        resolved: PathBuf,
    },

    /// The file, game or record type being operated on does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input source failed or ran out of retries.
    #[error("{0}")]
    Prompt(String),
}

impl RecordError {
    pub(crate) fn field(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldConstraint {
            location: location.into(),
            message: message.into(),
        }
    }

    pub(crate) fn cross(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CrossField {
            location: location.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Short name of the error kind, used in reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structural { .. } => "structural",
            Self::FieldConstraint { .. } => "field_constraint",
            Self::CrossField { .. } => "cross_field",
            Self::Reference { .. } => "reference",
            Self::NotFound(_) => "not_found",
            Self::Io { .. } => "io",
            Self::Prompt(_) => "prompt",
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;
