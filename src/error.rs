//! Errors for reading Govee csv exports.
//!
//! Only the two skip rules are lenient; anything else that survives them
//! must parse, or the whole read fails with the offending line attached.

use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("could not read csv file {}: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row at line {line} ({content:?}): {source}")]
    MalformedRow {
        line: usize,
        content: String,
        #[source]
        source: RowError,
    },
}

/// What went wrong inside a single data row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("expected at least 3 comma separated fields, found {found}")]
    MissingFields { found: usize },

    #[error("invalid timestamp {field:?}: {source}")]
    Timestamp {
        field: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid temperature {field:?}: {source}")]
    Temperature {
        field: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("invalid humidity {field:?}: {source}")]
    Humidity {
        field: String,
        #[source]
        source: ParseFloatError,
    },
}

pub type Result<T> = std::result::Result<T, ReadError>;
