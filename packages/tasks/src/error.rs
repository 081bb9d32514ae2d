// ABOUTME: Error types for the tasks package
// ABOUTME: Schedule consistency failures and requirement mutation errors

use reqflow_core::ValidationError;
use thiserror::Error;

use crate::types::RequirementStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Subtask {subtask_id} is completed but has no actual end date")]
    MissingActualEnd { subtask_id: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

#[derive(Error, Debug)]
pub enum RequirementError {
    #[error("Subtask not found: {0}")]
    SubtaskNotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Status {0} is derived from subtasks and cannot be set directly")]
    DerivedStatus(RequirementStatus),

    #[error("Requirement cannot be released while {0}")]
    NotCompleted(RequirementStatus),
}

pub type Result<T> = std::result::Result<T, RequirementError>;
