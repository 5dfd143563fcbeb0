//! Error types for calform.

use thiserror::Error;

/// Errors that can occur while building, exporting or importing calendar items.
#[derive(Error, Debug)]
pub enum CalFormError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("Unknown time zone '{0}'. Use an IANA name such as 'Europe/Berlin', or 'UTC'")]
    UnknownTimeZone(String),

    #[error("{datetime} does not exist in time zone {tz}")]
    NonexistentLocalTime { datetime: String, tz: String },

    #[error("{kind} '{summary}' needs a start date")]
    MissingStart { kind: String, summary: String },

    #[error("{kind} '{summary}' ends before it starts")]
    EndBeforeStart { kind: String, summary: String },

    #[error("No item at index {0}")]
    NoSuchItem(usize),

    #[error("Importing .ics files is not supported. Upload a CSV file instead")]
    IcsImportUnsupported,

    #[error("Cannot import '{0}': expected a .csv file")]
    UnsupportedImport(String),
}

/// Result type alias for calform operations.
pub type CalFormResult<T> = Result<T, CalFormError>;
