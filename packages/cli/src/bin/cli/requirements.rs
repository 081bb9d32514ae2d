// ABOUTME: Requirement document commands
// ABOUTME: Create documents, recompute status and edit subtasks from the terminal

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use colored::*;
use reqflow_cli::document::{create_requirement, load_requirement, save_requirement};
use reqflow_cli::render::{phase_table, subtask_table};
use reqflow_tasks::{
    parse_timestamp, Phase, Requirement, RequirementCreateInput, RequirementStatus,
    SubtaskCreateInput, SubtaskStatus, SubtaskUpdateInput, SystemClock,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Date argument value that clears the stored date on update
const CLEAR_VALUE: &str = "none";

#[derive(Subcommand)]
pub enum RequirementCommands {
    /// Create a new requirement document
    New {
        /// Path of the JSON document to create
        file: PathBuf,
        #[arg(short, long)]
        title: String,
        /// Version the requirement is planned for
        #[arg(long = "for-version")]
        for_version: String,
        /// Priority (高/中/低)
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Recompute subtask schedules and the requirement status
    Status {
        /// Requirement JSON document
        file: PathBuf,
        /// Save the recomputed document
        #[arg(long)]
        write: bool,
        /// Also show per-phase counts
        #[arg(long)]
        phases: bool,
    },
    /// Edit subtasks of a requirement
    #[command(subcommand)]
    Subtask(SubtaskCommands),
    /// Release, pause or resume a requirement
    Lifecycle {
        file: PathBuf,
        #[arg(value_enum)]
        action: LifecycleAction,
    },
}

#[derive(Subcommand)]
pub enum SubtaskCommands {
    /// Add a subtask
    Add {
        file: PathBuf,
        #[arg(short, long)]
        name: String,
        #[command(flatten)]
        fields: SubtaskFields,
    },
    /// Update fields of a subtask
    Update {
        file: PathBuf,
        /// Subtask ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[command(flatten)]
        fields: SubtaskFields,
    },
    /// Remove a subtask
    Remove {
        file: PathBuf,
        /// Subtask ID
        id: String,
    },
}

// Dates accept `YYYY-MM-DD[ HH:MM]` or RFC 3339; on update `none` clears them
#[derive(Args)]
pub struct SubtaskFields {
    /// Pipeline phase; inferred from the name when omitted
    #[arg(long)]
    phase: Option<Phase>,
    /// not-started, in-progress, completed or paused
    #[arg(short, long)]
    status: Option<SubtaskStatus>,
    #[arg(long)]
    estimated_start: Option<String>,
    #[arg(long)]
    estimated_end: Option<String>,
    #[arg(long)]
    actual_start: Option<String>,
    #[arg(long)]
    actual_end: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LifecycleAction {
    Release,
    Pause,
    Resume,
}

pub async fn handle_requirement_command(command: RequirementCommands) -> anyhow::Result<()> {
    match command {
        RequirementCommands::New {
            file,
            title,
            for_version,
            priority,
            description,
        } => {
            let input = RequirementCreateInput {
                title,
                version: for_version,
                priority,
                description,
            };
            let requirement = create_requirement(&file, input, &SystemClock).await?;
            println!(
                "{} {} ({})",
                "Created requirement".green(),
                requirement.title.bold(),
                requirement.id
            );
            Ok(())
        }
        RequirementCommands::Status {
            file,
            write,
            phases,
        } => show_status(&file, write, phases).await,
        RequirementCommands::Subtask(command) => handle_subtask_command(command).await,
        RequirementCommands::Lifecycle { file, action } => {
            let mut requirement = load_requirement(&file).await?;
            match action {
                LifecycleAction::Release => {
                    requirement.set_lifecycle(RequirementStatus::Released, &SystemClock)?
                }
                LifecycleAction::Pause => {
                    requirement.set_lifecycle(RequirementStatus::Paused, &SystemClock)?
                }
                LifecycleAction::Resume => requirement.resume(&SystemClock),
            }
            save_requirement(&file, &requirement).await?;
            print_status_line(&requirement);
            Ok(())
        }
    }
}

async fn show_status(file: &Path, write: bool, phases: bool) -> anyhow::Result<()> {
    let mut requirement = load_requirement(file).await?;
    let stored = requirement.status;

    requirement
        .recalculate(&SystemClock)
        .with_context(|| format!("Cannot recompute {}", file.display()))?;

    println!(
        "{}",
        format!("📋 {} ({})", requirement.title, requirement.version)
            .blue()
            .bold()
    );
    println!();

    if requirement.subtasks.is_empty() {
        println!("{}", "No subtasks yet".yellow());
    } else {
        println!(
            "{}",
            subtask_table(&requirement, &reqflow_config::date_format())
        );
    }

    if phases {
        println!("{}", phase_table(&requirement.status_breakdown()));
    }

    print_status_line(&requirement);

    if stored != requirement.status {
        println!(
            "{} stored status was {}",
            "Note:".yellow(),
            stored.as_str().dimmed()
        );
    }

    if write {
        save_requirement(file, &requirement).await?;
        info!("Saved recomputed requirement to {:?}", file);
    }

    Ok(())
}

async fn handle_subtask_command(command: SubtaskCommands) -> anyhow::Result<()> {
    match command {
        SubtaskCommands::Add { file, name, fields } => {
            let mut requirement = load_requirement(&file).await?;
            let input = SubtaskCreateInput {
                name,
                phase: fields.phase,
                status: fields.status,
                estimated_start: parse_optional(fields.estimated_start.as_deref())?,
                estimated_end: parse_optional(fields.estimated_end.as_deref())?,
                actual_start: parse_optional(fields.actual_start.as_deref())?,
                actual_end: parse_optional(fields.actual_end.as_deref())?,
            };
            let id = requirement.add_subtask(input, &SystemClock)?;
            save_requirement(&file, &requirement).await?;

            println!("{} {}", "Added subtask".green(), id);
            print_status_line(&requirement);
            Ok(())
        }
        SubtaskCommands::Update {
            file,
            id,
            name,
            fields,
        } => {
            let mut requirement = load_requirement(&file).await?;
            let input = SubtaskUpdateInput {
                name,
                phase: fields.phase,
                status: fields.status,
                estimated_start: parse_update(fields.estimated_start.as_deref())?,
                estimated_end: parse_update(fields.estimated_end.as_deref())?,
                actual_start: parse_update(fields.actual_start.as_deref())?,
                actual_end: parse_update(fields.actual_end.as_deref())?,
            };
            requirement.update_subtask(&id, input, &SystemClock)?;
            save_requirement(&file, &requirement).await?;

            println!("{} {}", "Updated subtask".green(), id);
            print_status_line(&requirement);
            Ok(())
        }
        SubtaskCommands::Remove { file, id } => {
            let mut requirement = load_requirement(&file).await?;
            let removed = requirement.remove_subtask(&id, &SystemClock)?;
            save_requirement(&file, &requirement).await?;

            println!("{} {} ({})", "Removed subtask".green(), removed.name, removed.id);
            print_status_line(&requirement);
            Ok(())
        }
    }
}

fn parse_optional(value: Option<&str>) -> anyhow::Result<Option<chrono::DateTime<chrono::Utc>>> {
    value
        .map(parse_timestamp)
        .transpose()
        .map_err(anyhow::Error::from)
}

/// Like `parse_optional`, but `none` clears the field
fn parse_update(
    value: Option<&str>,
) -> anyhow::Result<Option<Option<chrono::DateTime<chrono::Utc>>>> {
    match value {
        Some(v) if v.trim().eq_ignore_ascii_case(CLEAR_VALUE) => Ok(Some(None)),
        other => Ok(parse_optional(other)?.map(Some)),
    }
}

fn print_status_line(requirement: &Requirement) {
    let status = format!(
        "{} ({})",
        requirement.status.label(),
        requirement.status.as_str()
    );
    let status = match requirement.status {
        RequirementStatus::Completed | RequirementStatus::Released => status.green(),
        RequirementStatus::Paused => status.yellow(),
        _ => status.cyan(),
    };
    println!(
        "Status: {}  Progress: {}%",
        status.bold(),
        requirement.progress_percent()
    );
}
