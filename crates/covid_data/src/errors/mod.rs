use chrono::NaiveDate;
use thiserror::Error;

use crate::models::date_utils::TimeFormatError;

/// Centralized error type for the covid_data crate
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON (de)serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Date error: {0}")]
    Time(#[from] TimeFormatError),

    #[error("Binding `{0}` not found in artifact")]
    MissingBinding(String),

    #[error("Daily snapshots are not consecutive: {previous} is followed by {next}")]
    DateGap { previous: NaiveDate, next: NaiveDate },

    #[error("Region {region} missing on {date}")]
    MissingRegion { region: String, date: NaiveDate },

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("No daily snapshots to assemble")]
    NoSnapshots,
}

impl DataError {
    pub fn csv<S: Into<String>>(msg: S) -> Self {
        Self::Csv(msg.into())
    }
}

/// Alias for fallible operations in the covid_data crate
pub type DataResult<T> = Result<T, DataError>;
