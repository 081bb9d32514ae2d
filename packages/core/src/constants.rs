use reqflow_config::constants::{HOME, REQFLOW_DATA_DIR, USERPROFILE};
use std::env;
use std::path::PathBuf;

/// File backing the version list (named after the dashboard's storage key)
pub const VERSIONS_FILE_NAME: &str = "version_management_versions.json";

/// File backing the user-defined platform list
pub const CUSTOM_PLATFORMS_FILE_NAME: &str = "version_management_custom_platforms.json";

/// Get the path to the Reqflow data directory
///
/// `REQFLOW_DATA_DIR` wins; otherwise `~/.reqflow`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var(REQFLOW_DATA_DIR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    // HOME first (useful for tests), USERPROFILE on Windows, then the dirs crate
    home_dir(env::var(HOME).ok(), env::var(USERPROFILE).ok()).join(".reqflow")
}

fn home_dir(home: Option<String>, user_profile: Option<String>) -> PathBuf {
    home.into_iter()
        .chain(user_profile)
        .find(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Path to the versions file inside `dir`
pub fn versions_file(dir: &std::path::Path) -> PathBuf {
    dir.join(VERSIONS_FILE_NAME)
}

/// Path to the custom platforms file inside `dir`
pub fn custom_platforms_file(dir: &std::path::Path) -> PathBuf {
    dir.join(CUSTOM_PLATFORMS_FILE_NAME)
}
