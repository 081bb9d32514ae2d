// ABOUTME: Configuration lookups shared by the Reqflow packages
// ABOUTME: Env var names plus typed accessors with defaults

pub mod constants;

use chrono::format::{Item, StrftimeItems};
use std::env;
use tracing::warn;

/// Default log filter when neither REQFLOW_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default date format used when rendering timestamps in the CLI
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Log filter directive, preferring REQFLOW_LOG over RUST_LOG
pub fn log_filter() -> String {
    env::var(constants::REQFLOW_LOG)
        .or_else(|_| env::var(constants::RUST_LOG))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Date format for table output
pub fn date_format() -> String {
    resolve_date_format(env::var(constants::REQFLOW_DATE_FORMAT).ok())
}

/// Use `value` if it is a strftime pattern chrono can render, else the default
pub fn resolve_date_format(value: Option<String>) -> String {
    match value {
        Some(fmt) if is_valid_date_format(&fmt) => fmt,
        Some(fmt) => {
            warn!(
                "Ignoring {}={:?}: not a valid strftime pattern",
                constants::REQFLOW_DATE_FORMAT,
                fmt
            );
            DEFAULT_DATE_FORMAT.to_string()
        }
        None => DEFAULT_DATE_FORMAT.to_string(),
    }
}

fn is_valid_date_format(fmt: &str) -> bool {
    fmt.contains('%') && StrftimeItems::new(fmt).all(|item| !matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_date_format_defaults() {
        assert_eq!(resolve_date_format(None), DEFAULT_DATE_FORMAT);
        assert_eq!(resolve_date_format(Some("%d/%m/%Y".to_string())), "%d/%m/%Y");
    }

    #[test]
    fn test_resolve_date_format_rejects_bad_patterns() {
        // Unknown specifier
        assert_eq!(resolve_date_format(Some("%Q".to_string())), DEFAULT_DATE_FORMAT);
        // Dangling percent
        assert_eq!(resolve_date_format(Some("%Y-%".to_string())), DEFAULT_DATE_FORMAT);
        // No specifiers at all
        assert_eq!(resolve_date_format(Some("date".to_string())), DEFAULT_DATE_FORMAT);
    }
}
