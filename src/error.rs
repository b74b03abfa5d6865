use std::path::PathBuf;
use std::result;

use thiserror::Error;

use crate::Row;

/// An error found somewhere while splitting a file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes in the given file that are not valid in the requested encoding
    #[error("could not decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Mapping file must have 'Find' and 'Replace' columns (found: {found:?})")]
    MappingFormat { found: Vec<String> },

    #[error("CSV file is empty: {0:?}")]
    EmptyInput(PathBuf),

    /// `row` counts data rows starting at 1, the header is not counted
    #[error("data row {row} has no leading field")]
    MalformedRow { row: usize },

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Broad classes of failure as reported to whoever drives a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    MappingFormat,
    EmptyInput,
    MalformedRow,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::MappingFormat { .. } => ErrorKind::MappingFormat,
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::MalformedRow { .. } => ErrorKind::MalformedRow,
            Error::Csv(_)
            | Error::Io(_)
            | Error::Decode { .. }
            | Error::InvalidChunkSize => ErrorKind::Io,
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// What reading a file yields for each line. Either a row or an error.
pub type RowResult = result::Result<Row, Error>;
