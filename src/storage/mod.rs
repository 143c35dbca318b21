//! Dataset storage.
//!
//! The contest history lives in a single JSON document with four sections:
//! `contests`, `regions`, `countries` and `stats`. It is read once at
//! startup and handed to the engine as an immutable [`Dataset`](crate::models::Dataset).

mod json;

pub use json::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid dataset: {0}")]
    InvalidDocument(String),
}
