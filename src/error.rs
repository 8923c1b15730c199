//! Error handling for UGS extraction runs.
//!
//! Provides error types with context for export parsing, registry merges,
//! setpoint lookups and report output. Which errors abort a controller, a tag
//! or the whole run is decided by the pipeline, not here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in file '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "Schema mismatch in file '{}': header has {found} columns, at least {expected} required",
        .path.display()
    )]
    SchemaMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error(
        "Malformed row at line {line} of '{}': {found} fields, at least {expected} required",
        .path.display()
    )]
    MalformedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate tag '{tag_name}': already registered from {existing}, rejected from {rejected}")]
    DuplicateTag {
        tag_name: String,
        existing: String,
        rejected: String,
    },

    #[error("Signal references unknown tag '{tag_name}'")]
    UnknownTag { tag_name: String },

    #[error("No tuning-parameter store configured for site '{site_id}'")]
    UnknownSite { site_id: String },

    #[error("Tuning-parameter store for site '{site_id}' unavailable at '{}': {source}", .path.display())]
    StoreUnavailable {
        site_id: String,
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("Setpoint query failed for tag '{tag_name}' at site '{site_id}': {source}")]
    StoreQuery {
        site_id: String,
        tag_name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Report could not be written to '{}': {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV error for a specific file
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a report write error
    pub fn report_write(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ReportWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
