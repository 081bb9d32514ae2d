use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;

mod cli;

use cli::requirements::{handle_requirement_command, RequirementCommands};
use cli::validate::{handle_validate_command, ValidateField};
use cli::versions::{
    handle_platforms_command, handle_versions_command, PlatformCommands, VersionCommands,
};
use reqflow_cli::logging::init_logging;

#[derive(Parser)]
#[command(name = "reqflow")]
#[command(about = "Reqflow CLI - requirement status tracking and version planning")]
#[command(version)]
struct Cli {
    /// Data directory for the version store (defaults to REQFLOW_DATA_DIR or ~/.reqflow)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with requirement documents and their subtasks
    #[command(flatten)]
    Requirement(RequirementCommands),
    /// Manage release versions
    #[command(subcommand)]
    Versions(VersionCommands),
    /// Manage custom platforms
    #[command(subcommand)]
    Platforms(PlatformCommands),
    /// Validate a field value and print the outcome as JSON
    Validate {
        /// Field class to validate against
        #[arg(value_enum)]
        field: ValidateField,
        /// Value to validate
        value: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = cli.data_dir.unwrap_or_else(reqflow_core::data_dir);

    if let Err(e) = handle_command(cli.command, data_dir).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands, data_dir: PathBuf) -> anyhow::Result<()> {
    match command {
        Commands::Requirement(command) => handle_requirement_command(command).await,
        Commands::Versions(command) => handle_versions_command(command, &data_dir).await,
        Commands::Platforms(command) => handle_platforms_command(command, &data_dir).await,
        Commands::Validate { field, value } => handle_validate_command(field, &value),
    }
}
