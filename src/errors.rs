//! Unified error type for waitlens analysis operations.
//!
//! Every stage of the pipeline reports failures through [`AnalysisError`].
//! There is no recovery path: a missing column, an unparseable cell, or a
//! failed plot render halts the run and surfaces here with enough context
//! to name the offending file, column, or row.

use std::path::PathBuf;
use thiserror::Error;

/// Categorized error for configuration, dataset, and rendering failures.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// File system I/O failures (dataset file, plot directory, config file).
    #[error("i/o error{}: {source}", fmt_path(.path))]
    Io {
        #[source]
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    /// Configuration file problems: unreadable, malformed, or invalid values.
    #[error("configuration error{}: {message}", fmt_path(.path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// A configured column is absent from the dataset or has the wrong type.
    #[error("column `{name}`: {message}")]
    Column { name: String, message: String },

    /// A cell failed to parse as its declared type.
    #[error("row {row}, column `{column}`: {message}")]
    Cell {
        row: usize,
        column: String,
        message: String,
    },

    /// Dataset-level shape violations (mismatched column lengths).
    #[error("dataset error: {0}")]
    Data(String),

    /// Degenerate statistical input (empty sample, zero variance).
    #[error("statistics error: {0}")]
    Stats(String),

    /// Plot rendering failures from the drawing backend.
    #[error("plot error for {}: {message}", .path.display())]
    Plot { path: PathBuf, message: String },
}

fn fmt_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" ({})", p.display()),
        None => String::new(),
    }
}

impl AnalysisError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn column(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Column {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn cell(row: usize, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cell {
            row,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn io_at(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }

    pub fn stats(message: impl Into<String>) -> Self {
        Self::Stats(message.into())
    }

    pub fn plot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Plot {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

/// Convenience alias used throughout the library crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
