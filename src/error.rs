//! Structured error handling and exit codes.
//!
//! Library operations fail with [`DedupError`], a closed taxonomy whose
//! variants carry the path or field involved so callers can branch on the
//! kind instead of parsing messages. The binary maps any failure to
//! [`ExitCode::GeneralError`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::record::Field;

/// Exit codes for the RowDupe application.
///
/// - 0: Success (every requested file was produced)
/// - 1: General error (generation or check failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: all requested steps completed.
    Success = 0,
    /// General error: a step failed and the run was aborted.
    GeneralError = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "RW000",
            Self::GeneralError => "RW001",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "RW001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its cause chain
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}

/// Underlying cause of a failed file read or write.
#[derive(Error, Debug)]
pub enum FileFailure {
    /// The file could not be opened, read, written or renamed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The content could not be encoded or decoded as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while generating or checking records.
#[derive(Error, Debug)]
pub enum DedupError {
    /// Writing the source or report file failed.
    #[error("Failed to save data to file: {path}: {source}")]
    Persistence {
        /// Destination that could not be written
        path: PathBuf,
        /// What went wrong
        #[source]
        source: FileFailure,
    },

    /// Reading the source file failed (missing, unreadable or malformed).
    #[error("Failed to read data from file: {path}: {source}")]
    Read {
        /// Source that could not be read
        path: PathBuf,
        /// What went wrong
        #[source]
        source: FileFailure,
    },

    /// A requested key field is not a record field, or a record lacks it.
    #[error(
        "Unknown record field: '{field}'{}{}",
        record_hint(.record),
        suggestion_hint(.suggestion)
    )]
    Lookup {
        /// The field name as requested
        field: String,
        /// 1-based position of the source record lacking the field; `None`
        /// when the name itself is unknown
        record: Option<usize>,
        /// Closest known field name, if any is similar enough
        suggestion: Option<&'static str>,
    },
}

fn record_hint(record: &Option<usize>) -> String {
    match record {
        Some(position) => format!(" (missing from record {})", position),
        None => String::new(),
    }
}

fn suggestion_hint(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

/// Discriminant of a [`DedupError`], for branching and log descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Persistence,
    Read,
    Lookup,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Persistence => write!(f, "PersistenceError"),
            ErrorKind::Read => write!(f, "ReadError"),
            ErrorKind::Lookup => write!(f, "LookupError"),
        }
    }
}

impl DedupError {
    /// The kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Persistence { .. } => ErrorKind::Persistence,
            Self::Read { .. } => ErrorKind::Read,
            Self::Lookup { .. } => ErrorKind::Lookup,
        }
    }

    /// Normalized `(Kind) message` description used in log lines.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("({}) {}", self.kind(), self)
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: impl Into<FileFailure>) -> Self {
        Self::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<FileFailure>) -> Self {
        Self::Read {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn unknown_field(name: &str) -> Self {
        Self::Lookup {
            field: name.to_string(),
            record: None,
            suggestion: Field::suggest(name),
        }
    }

    pub(crate) fn missing_field(field: Field, record: usize) -> Self {
        Self::Lookup {
            field: field.name().to_string(),
            record: Some(record),
            suggestion: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::GeneralError.code_prefix(), "RW001");
    }

    #[test]
    fn test_describe_includes_kind_and_path() {
        let err = DedupError::persistence(
            "out/source.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::Persistence);
        let text = err.describe();
        assert!(text.starts_with("(PersistenceError) "));
        assert!(text.contains("out/source.json"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_read_error_keeps_source_chain() {
        let err = DedupError::read(
            "missing.json",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.kind(), ErrorKind::Read);
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "no such file");
    }

    #[test]
    fn test_lookup_error_message() {
        let err = DedupError::unknown_field("lang");
        assert_eq!(
            err.describe(),
            "(LookupError) Unknown record field: 'lang' (did you mean 'lang_id'?)"
        );

        let err = DedupError::unknown_field("zzz");
        assert_eq!(err.to_string(), "Unknown record field: 'zzz'");
    }

    #[test]
    fn test_missing_field_names_the_record() {
        let err = DedupError::missing_field(Field::LangId, 3);
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(
            err.to_string(),
            "Unknown record field: 'lang_id' (missing from record 3)"
        );
    }

    #[test]
    fn test_structured_error_serializes() {
        let err = anyhow::anyhow!("boom");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);
        let json = serde_json::to_string(&structured).unwrap();
        assert!(json.contains("\"code\":\"RW001\""));
        assert!(json.contains("\"exit_code\":1"));
        assert!(json.contains("boom"));
    }
}
