//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// dbdeploy - apply numbered SQL change scripts exactly once
#[derive(Parser, Debug)]
#[command(name = "dbdeploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Target from the `targets` section of dbdeploy.yml
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the connection descriptor
    #[arg(long, global = true, env = "DBDEPLOY_CONNECTION")]
    pub connection: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show applied and pending change scripts
    Status(StatusArgs),

    /// Apply pending change scripts directly
    Update(UpdateArgs),

    /// Render pending change scripts into one SQL script
    Render(RenderArgs),

    /// Create the changelog table if it does not exist
    CreateChangelog,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Create the changelog table first if it is missing
    #[arg(long)]
    pub create_changelog: bool,
}

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Write the script to this file instead of stdout
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Include changelog table creation in the script
    #[arg(long)]
    pub create_changelog: bool,

    /// Do not read the changelog; render every discovered script
    #[arg(long)]
    pub offline: bool,

    /// Pipe the script to the configured sql_tool
    #[arg(long)]
    pub execute: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
