// ABOUTME: Version planning type definitions
// ABOUTME: Release versions with target platforms and their create/update inputs

use chrono::{DateTime, Utc};
use reqflow_core::double_option;
use serde::{Deserialize, Serialize};

/// Platforms offered before any custom ones are added
pub const DEFAULT_PLATFORMS: &[&str] = &["iOS", "Android", "Web", "PC", "小程序"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    pub version_number: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionCreateInput {
    pub version_number: String,
    pub platforms: Vec<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Partial update; `Some(None)` clears the release date or description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionUpdateInput {
    pub version_number: Option<String>,
    pub platforms: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}
