//! Defines custom error types for the library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error returned when BibTeX text cannot be parsed.
#[error("Failed to parse BibTeX at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Error, Debug)]
/// Error type returned by the split driver.
pub enum SplitError {
    #[error("Missing input file: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SplitError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
