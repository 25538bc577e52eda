//! Error Types
//!
//! Failures only arise at the dataset and I/O edges; the yield calculation
//! itself is total.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown location '{name}'. Available: {}", .available.join(", "))]
    UnknownLocation { name: String, available: Vec<String> },

    #[error("Invalid irradiation profile for '{name}': {message}")]
    InvalidProfile { name: String, message: String },

    #[error("Invalid location catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
