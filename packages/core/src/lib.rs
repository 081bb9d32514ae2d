// ABOUTME: Core constants, identifiers and input validation for Reqflow
// ABOUTME: Foundational package shared by the task, storage and CLI packages

pub mod constants;
pub mod utils;
pub mod validation;

// Re-export constants
pub use constants::{
    custom_platforms_file, data_dir, versions_file, CUSTOM_PLATFORMS_FILE_NAME, VERSIONS_FILE_NAME,
};

// Re-export utilities
pub use utils::{double_option, generate_id, generate_prefixed_id};

// Re-export validation
pub use validation::{sanitize_html, ValidationError, ValidationOutcome};
