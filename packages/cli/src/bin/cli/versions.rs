// ABOUTME: Version and platform commands
// ABOUTME: CRUD over the JSON version store in the data directory

use clap::Subcommand;
use colored::*;
use reqflow_cli::render::{format_timestamp, version_table};
use reqflow_storage::{VersionCreateInput, VersionStore, VersionUpdateInput};
use reqflow_tasks::parse_timestamp;
use std::path::Path;

#[derive(Subcommand)]
pub enum VersionCommands {
    /// List all versions
    List,
    /// Show version details
    Show {
        /// Version ID
        id: String,
    },
    /// Add a new version
    Add {
        /// Version number, e.g. 2.1.0
        number: String,
        /// Target platforms (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        platforms: Vec<String>,
        /// Planned release date
        #[arg(short, long)]
        release_date: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Update an existing version
    Update {
        /// Version ID
        id: String,
        #[arg(short, long)]
        number: Option<String>,
        #[arg(short, long, value_delimiter = ',')]
        platforms: Option<Vec<String>>,
        /// New release date, or `none` to clear it
        #[arg(short, long)]
        release_date: Option<String>,
        /// New description, or `none` to clear it
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a version
    Delete {
        /// Version ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PlatformCommands {
    /// List built-in and custom platforms
    List,
    /// Add a custom platform
    Add { name: String },
    /// Remove a custom platform
    Remove { name: String },
}

pub async fn handle_versions_command(
    command: VersionCommands,
    data_dir: &Path,
) -> anyhow::Result<()> {
    let store = VersionStore::new(data_dir);
    let date_format = reqflow_config::date_format();

    match command {
        VersionCommands::List => {
            let versions = store.load_versions().await?;
            if versions.is_empty() {
                println!("{}", "No versions found".yellow());
                println!("{}", "Use 'reqflow versions add' to plan one".dimmed());
                return Ok(());
            }
            println!("{}", version_table(&versions, &date_format));
            println!("Total: {} versions", versions.len().to_string().cyan());
        }
        VersionCommands::Show { id } => {
            let version = store.get_version(&id).await?;
            println!("{}", format!("Version {}", version.version_number).blue().bold());
            println!("  {} {}", "ID:".bold(), version.id);
            println!("  {} {}", "Platforms:".bold(), version.platforms.join(", "));
            println!(
                "  {} {}",
                "Release date:".bold(),
                format_timestamp(version.release_date, &date_format)
            );
            if let Some(description) = &version.description {
                println!("  {} {}", "Description:".bold(), description);
            }
            println!(
                "  {} {}",
                "Created:".bold(),
                format_timestamp(Some(version.created_at), &date_format)
            );
        }
        VersionCommands::Add {
            number,
            platforms,
            release_date,
            description,
        } => {
            let input = VersionCreateInput {
                version_number: number,
                platforms,
                release_date: release_date.as_deref().map(parse_timestamp).transpose()?,
                description,
            };
            let version = store.add_version(input).await?;
            println!(
                "{} {} ({})",
                "Added version".green(),
                version.version_number.bold(),
                version.id
            );
        }
        VersionCommands::Update {
            id,
            number,
            platforms,
            release_date,
            description,
        } => {
            let release_date = match release_date.as_deref() {
                Some(v) if is_clear(v) => Some(None),
                Some(v) => Some(Some(parse_timestamp(v)?)),
                None => None,
            };
            let description = description.map(|d| (!is_clear(&d)).then_some(d));
            let input = VersionUpdateInput {
                version_number: number,
                platforms,
                release_date,
                description,
            };
            let version = store.update_version(&id, input).await?;
            println!("{} {}", "Updated version".green(), version.version_number.bold());
        }
        VersionCommands::Delete { id } => {
            let version = store.delete_version(&id).await?;
            println!("{} {}", "Deleted version".green(), version.version_number.bold());
        }
    }

    Ok(())
}

pub async fn handle_platforms_command(
    command: PlatformCommands,
    data_dir: &Path,
) -> anyhow::Result<()> {
    let store = VersionStore::new(data_dir);

    match command {
        PlatformCommands::List => {
            let custom = store.load_custom_platforms().await?;
            for platform in store.all_platforms().await? {
                if custom.contains(&platform) {
                    println!("{} {}", platform, "(custom)".dimmed());
                } else {
                    println!("{}", platform);
                }
            }
        }
        PlatformCommands::Add { name } => {
            if store.add_custom_platform(&name).await? {
                println!("{} {}", "Added platform".green(), name.trim());
            } else {
                println!("{}", format!("Platform {} already exists", name.trim()).yellow());
            }
        }
        PlatformCommands::Remove { name } => {
            store.remove_custom_platform(&name).await?;
            println!("{} {}", "Removed platform".green(), name.trim());
        }
    }

    Ok(())
}

fn is_clear(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("none")
}
