use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Transaction source not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Transaction source contains no rows")]
    EmptyDataset,

    #[error("No transaction date column '{0}' found in data")]
    MissingDateColumn(String),

    #[error("No transaction id column '{0}' found in data")]
    MissingIdColumn(String),

    #[error("No transaction amount column '{0}' found in data")]
    MissingAmountColumn(String),

    #[error("Wrong transaction date type in column '{0}': values should be dates")]
    InvalidDateType(String),

    #[error("Wrong transaction id type in column '{0}': values should be textual, not numeric")]
    InvalidIdType(String),

    #[error("Wrong transaction amount type in column '{0}': values should be integers")]
    InvalidAmountType(String),

    #[error("Invalid transaction date '{value}' on row {row}: expected YYYY-MM-DD")]
    InvalidDateFormat { row: usize, value: String },

    #[error("Insufficient history: {months} month(s) of data, at least 2 are needed")]
    InsufficientHistory { months: usize },

    #[error("Partial amount for month ending {month} is zero, factor is undefined")]
    ZeroPartialAmount { month: NaiveDate },

    #[error("Transaction amounts for month ending {month} overflow an integer sum")]
    AmountOverflow { month: NaiveDate },

    #[error("Total and partial series cover different months: {0}")]
    MismatchedSeries(String),

    #[error("Estimate {0} cannot be represented as an integer amount")]
    EstimateOutOfRange(f64),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
