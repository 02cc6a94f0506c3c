//! Error types for the dashboard engine.
//!
//! None of these are fatal: callers log them and keep the previous value.
use thiserror::Error;

/// A status payload (socket frame or poll body) that failed validation.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("status message is empty")]
    Empty,

    #[error("status JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure fetching or decoding a page or poll response.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} for {path}")]
    Http { status: u16, path: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid status: {0}")]
    Status(#[from] StatusError),

    #[error("no more pages")]
    Exhausted,
}

/// Invalid dashboard configuration override.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
