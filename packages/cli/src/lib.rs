// ABOUTME: Shared pieces of the reqflow command line tool
// ABOUTME: Requirement document I/O, logging setup, errors and table rendering

pub mod document;
pub mod error;
pub mod logging;
pub mod render;

pub use error::{CliError, CliResult};
