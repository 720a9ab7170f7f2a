//! Error taxonomy for loading, filtering and aggregating trip data.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Malformed record at row {row}, column '{column}': {message}")]
    MalformedRecord {
        row: usize,
        column: String,
        message: String,
    },

    #[error("Source table is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid {axis} filter: '{value}'")]
    InvalidFilter { axis: &'static str, value: String },

    #[error("Cannot compute {statistic} on an empty dataset")]
    EmptyDataset { statistic: &'static str },

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BikeshareError {
    pub(crate) fn malformed(row: usize, column: &str, message: impl Into<String>) -> Self {
        BikeshareError::MalformedRecord {
            row,
            column: column.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn empty(statistic: &'static str) -> Self {
        BikeshareError::EmptyDataset { statistic }
    }
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
