//! Unified application error type.
//! Every module (fetch, core, export, cli) returns AppError so that the
//! binary can map failures onto a small set of exit codes.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Fetch (device transfer)
    // ---------------------------
    #[error("Couldn't open socket - check wifi address - {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("No data from device for {0} seconds")]
    FetchTimeout(u64),

    #[error("Transfer cancelled")]
    Cancelled,

    #[error("Transfer error: {0}")]
    Fetch(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid session date '{0}'")]
    DateParse(String),

    #[error("Invalid number in field '{field}': '{value}'")]
    NumberParse { field: &'static str, value: String },

    #[error("Header does not match the expected layout: {0}")]
    SchemaMismatch(String),

    #[error("Qmax {0} is outside the histogram range 0..30")]
    OutOfRangeBin(f32),

    #[error("No sessions found in {0}")]
    NoSessions(String),

    #[error("{0} record(s) could not be parsed (strict mode)")]
    Strict(usize),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Process exit status for this error.
    ///
    /// - 2 → the device could not be reached or the transfer failed
    /// - 3 → the input file did not yield usable sessions
    /// - 1 → everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Connection { .. }
            | AppError::FetchTimeout(_)
            | AppError::Cancelled
            | AppError::Fetch(_) => 2,
            AppError::NoSessions(_) | AppError::Strict(_) | AppError::SchemaMismatch(_) => 3,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
