//! Error types for MoneyMap

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Statement parse error: {0}")]
    Statement(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No JSON found in LLM reply | Raw: {0}")]
    NoJson(String),

    #[error("LLM backend error: {0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
