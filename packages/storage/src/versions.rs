// ABOUTME: File-backed store for release versions and custom platforms
// ABOUTME: Each list is a JSON array in its own file under the data directory

use chrono::Utc;
use reqflow_core::validation::{validate_description, validate_platform, validate_version_number};
use reqflow_core::{custom_platforms_file, generate_prefixed_id, versions_file};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::types::{Version, VersionCreateInput, VersionUpdateInput, DEFAULT_PLATFORMS};
use crate::{StorageError, StorageResult};

pub struct VersionStore {
    dir: PathBuf,
}

impl VersionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensures the data directory and both list files exist
    pub async fn ensure_files(&self) -> StorageResult<()> {
        if !self.dir.exists() {
            debug!("Creating data directory: {:?}", self.dir);
            fs::create_dir_all(&self.dir).await?;
        }

        for path in [versions_file(&self.dir), custom_platforms_file(&self.dir)] {
            if !path.exists() {
                debug!("Creating empty list file: {:?}", path);
                fs::write(&path, "[]").await?;
            }
        }

        Ok(())
    }

    pub async fn load_versions(&self) -> StorageResult<Vec<Version>> {
        self.read_list(&versions_file(&self.dir)).await
    }

    pub async fn save_versions(&self, versions: &[Version]) -> StorageResult<()> {
        self.write_list(&versions_file(&self.dir), versions).await
    }

    pub async fn get_version(&self, id: &str) -> StorageResult<Version> {
        self.load_versions()
            .await?
            .into_iter()
            .find(|v| v.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    pub async fn add_version(&self, input: VersionCreateInput) -> StorageResult<Version> {
        let version_number = validate_version_number(&input.version_number)?;
        let platforms = normalize_platforms(&input.platforms)?;
        let description = validate_description(input.description.as_deref())?;

        let mut versions = self.load_versions().await?;
        if versions.iter().any(|v| v.version_number == version_number) {
            return Err(StorageError::DuplicateVersion(version_number));
        }

        let now = Utc::now();
        let version = Version {
            id: generate_prefixed_id("ver"),
            version_number,
            platforms,
            release_date: input.release_date,
            description,
            created_at: now,
            updated_at: now,
        };

        versions.push(version.clone());
        self.save_versions(&versions).await?;

        info!("Added version {} ({})", version.version_number, version.id);
        Ok(version)
    }

    pub async fn update_version(
        &self,
        id: &str,
        input: VersionUpdateInput,
    ) -> StorageResult<Version> {
        let mut versions = self.load_versions().await?;
        let index = versions
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        if let Some(number) = input.version_number.as_deref() {
            let number = validate_version_number(number)?;
            if versions
                .iter()
                .any(|v| v.id != id && v.version_number == number)
            {
                return Err(StorageError::DuplicateVersion(number));
            }
            versions[index].version_number = number;
        }
        if let Some(platforms) = input.platforms.as_deref() {
            versions[index].platforms = normalize_platforms(platforms)?;
        }
        if let Some(release_date) = input.release_date {
            versions[index].release_date = release_date;
        }
        if let Some(description) = input.description {
            versions[index].description = validate_description(description.as_deref())?;
        }
        versions[index].updated_at = Utc::now();

        let updated = versions[index].clone();
        self.save_versions(&versions).await?;

        debug!("Updated version {}", id);
        Ok(updated)
    }

    pub async fn delete_version(&self, id: &str) -> StorageResult<Version> {
        let mut versions = self.load_versions().await?;
        let index = versions
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        let removed = versions.remove(index);
        self.save_versions(&versions).await?;

        info!("Deleted version {} ({})", removed.version_number, removed.id);
        Ok(removed)
    }

    pub async fn load_custom_platforms(&self) -> StorageResult<Vec<String>> {
        self.read_list(&custom_platforms_file(&self.dir)).await
    }

    /// Built-in platforms followed by custom ones
    pub async fn all_platforms(&self) -> StorageResult<Vec<String>> {
        let mut platforms: Vec<String> = DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect();
        for custom in self.load_custom_platforms().await? {
            if !platforms.contains(&custom) {
                platforms.push(custom);
            }
        }
        Ok(platforms)
    }

    /// Add a custom platform. Returns false if it was already known.
    pub async fn add_custom_platform(&self, name: &str) -> StorageResult<bool> {
        let name = validate_platform(name)?;
        let mut platforms = self.load_custom_platforms().await?;

        if DEFAULT_PLATFORMS.contains(&name.as_str()) || platforms.contains(&name) {
            debug!("Platform {} already exists", name);
            return Ok(false);
        }

        platforms.push(name);
        self.write_list(&custom_platforms_file(&self.dir), &platforms)
            .await?;
        Ok(true)
    }

    pub async fn remove_custom_platform(&self, name: &str) -> StorageResult<()> {
        let mut platforms = self.load_custom_platforms().await?;
        let before = platforms.len();
        platforms.retain(|p| p != name.trim());

        if platforms.len() == before {
            return Err(StorageError::NotFound(name.to_string()));
        }

        self.write_list(&custom_platforms_file(&self.dir), &platforms)
            .await
    }

    async fn read_list<T: DeserializeOwned>(&self, path: &Path) -> StorageResult<Vec<T>> {
        self.ensure_files().await?;
        debug!("Reading list from: {:?}", path);

        match fs::read_to_string(path).await {
            Ok(content) => match serde_json::from_str::<Vec<T>>(&content) {
                Ok(items) => {
                    debug!("Loaded {} entries", items.len());
                    Ok(items)
                }
                Err(e) => {
                    error!("Failed to parse {:?}: {}", path, e);
                    // Keep the unreadable content; the next write replaces the file
                    let backup = backup_path(path);
                    fs::copy(path, &backup).await?;
                    warn!("Treating {:?} as empty, original saved to {:?}", path, backup);
                    Ok(Vec::new())
                }
            },
            Err(e) => {
                error!("Failed to read {:?}: {}", path, e);
                warn!("Treating {:?} as empty", path);
                Ok(Vec::new())
            }
        }
    }

    async fn write_list<T: Serialize>(&self, path: &Path, items: &[T]) -> StorageResult<()> {
        self.ensure_files().await?;
        debug!("Writing {} entries to: {:?}", items.len(), path);

        let json_content = serde_json::to_string_pretty(items)?;
        fs::write(path, json_content).await?;
        Ok(())
    }
}

/// Where an unparseable list file is copied before it can be overwritten
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

/// Validate each platform and drop duplicates, keeping first occurrence order
fn normalize_platforms(platforms: &[String]) -> StorageResult<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let platform = validate_platform(platform)?;
        if !normalized.contains(&platform) {
            normalized.push(platform);
        }
    }
    Ok(normalized)
}
