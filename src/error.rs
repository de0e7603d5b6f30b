// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

/// Everything that can stop a document run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration file '{}' not found", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("cannot read configuration file '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV file '{}' not found", path.display())]
    DataFileNotFound { path: PathBuf },

    #[error("CSV file '{}' is empty", path.display())]
    EmptyDataFile { path: PathBuf },

    /// Only raised when `strictColumns` is enabled.
    #[error("CSV line {line} has {found} cells, header has {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("employee {field} is empty, cannot take an initial")]
    IncompleteEmployee { field: &'static str },

    #[error("counter file '{}' is locked by another run", path.display())]
    CounterLocked { path: PathBuf },

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl AppError {
    /// Stable category name, used as a structured log field.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::ConfigNotFound { .. } => "config-not-found",
            AppError::ConfigParse { .. } => "config-parse",
            AppError::DataFileNotFound { .. } => "data-file-not-found",
            AppError::EmptyDataFile { .. } => "empty-data-file",
            AppError::RaggedRow { .. } => "ragged-row",
            AppError::IncompleteEmployee { .. } => "incomplete-employee",
            AppError::CounterLocked { .. } => "counter-locked",
            AppError::Write { .. } => "write",
            AppError::Unexpected(_) => "unexpected",
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AppError::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(e: zip::result::ZipError) -> Self {
        AppError::Unexpected(format!("zip: {}", e))
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(e: quick_xml::Error) -> Self {
        AppError::Unexpected(format!("xml: {}", e))
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Unexpected(format!("io: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
