// ABOUTME: Data layer and persistence for Reqflow
// ABOUTME: JSON file store for release versions and custom platforms

pub mod types;
pub mod versions;

use reqflow_core::ValidationError;
use thiserror::Error;

pub use types::{Version, VersionCreateInput, VersionUpdateInput, DEFAULT_PLATFORMS};
pub use versions::{backup_path, VersionStore};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Duplicate version number: {0}")]
    DuplicateVersion(String),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

pub type StorageResult<T> = Result<T, StorageError>;
