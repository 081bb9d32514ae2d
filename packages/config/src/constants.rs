// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Reqflow

// Storage Configuration
pub const REQFLOW_DATA_DIR: &str = "REQFLOW_DATA_DIR";

// Logging Configuration
pub const REQFLOW_LOG: &str = "REQFLOW_LOG";
pub const RUST_LOG: &str = "RUST_LOG"; // Fallback

// Display Configuration
pub const REQFLOW_DATE_FORMAT: &str = "REQFLOW_DATE_FORMAT";

// System Environment Variables
pub const HOME: &str = "HOME";
pub const USERPROFILE: &str = "USERPROFILE"; // Windows
