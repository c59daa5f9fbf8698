// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Only `StallTimeout` is recovered inside the engine (the stalled FOV is
//! excluded from the run and the session continues); every other variant is
//! fatal and propagates out of event handling.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FovWatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not locate runOrder and scanCount keys in {run}.json")]
    MalformedMetadata { run: String },

    #[error("{path:?} does not exist but was just reported created")]
    UnreachableState { path: PathBuf },

    #[error("Found unexpected data file {path:?}")]
    UnexpectedDataFile { path: PathBuf },

    #[error("Timed out waiting for {path:?} to reach non-zero size")]
    StallTimeout { path: PathBuf },

    #[error("Callback '{name}' failed: {source}")]
    Callback {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FovWatchError>;
