//! Error types for AutoVest

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Profile cannot be scored (zero income/expenses, non-finite values)
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
