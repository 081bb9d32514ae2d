// ABOUTME: Error type for the reqflow command line tool
// ABOUTME: Wraps document I/O, requirement and storage failures

use reqflow_storage::StorageError;
use reqflow_tasks::RequirementError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid requirement document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Requirement document already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Requirement(#[from] RequirementError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
