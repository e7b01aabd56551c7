//! Import/export format errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a JSON array of records
    #[error("Invalid data format: expected an array of records")]
    NotAnArray,

    #[error("Invalid CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("CSV header is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Invalid value {value:?} for '{column}' on CSV line {line}")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl FormatError {
    pub fn invalid_field(line: u64, column: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            line,
            column,
            value: value.into(),
        }
    }
}
