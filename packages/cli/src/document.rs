// ABOUTME: Requirement documents stored as pretty-printed JSON files
// ABOUTME: Load, save and create helpers used by the requirement commands

use reqflow_tasks::{Clock, Requirement, RequirementCreateInput};
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{CliError, CliResult};

pub async fn load_requirement(path: &Path) -> CliResult<Requirement> {
    debug!("Reading requirement document: {:?}", path);
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| CliError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn save_requirement(path: &Path, requirement: &Requirement) -> CliResult<()> {
    debug!("Writing requirement document: {:?}", path);
    let json_content = serde_json::to_string_pretty(requirement)?;
    fs::write(path, json_content)
        .await
        .map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Create a new document; refuses to overwrite an existing file
pub async fn create_requirement(
    path: &Path,
    input: RequirementCreateInput,
    clock: &impl Clock,
) -> CliResult<Requirement> {
    if path.exists() {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }

    let requirement = Requirement::new(input, clock)?;
    save_requirement(path, &requirement).await?;
    Ok(requirement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reqflow_tasks::{FixedClock, RequirementStatus};
    use tempfile::TempDir;

    fn input() -> RequirementCreateInput {
        RequirementCreateInput {
            title: "消息中心".to_string(),
            version: "1.4.0".to_string(),
            priority: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_load_save() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("req.json");
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap());

        let created = create_requirement(&path, input(), &clock).await.unwrap();
        let loaded = load_requirement(&path).await.unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.status, RequirementStatus::PendingPrototype);

        let err = create_requirement(&path, input(), &clock).await.unwrap_err();
        assert!(matches!(err, CliError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_load_missing_and_invalid() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");
        assert!(matches!(
            load_requirement(&missing).await,
            Err(CliError::Read { .. })
        ));

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "[1, 2").await.unwrap();
        assert!(matches!(
            load_requirement(&broken).await,
            Err(CliError::InvalidDocument { .. })
        ));
    }
}
