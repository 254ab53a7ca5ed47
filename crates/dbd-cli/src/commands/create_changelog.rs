//! Create-changelog command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::DeployContext;

/// Execute the create-changelog command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = DeployContext::load(global)?;
    let manager = ctx.connect_persistent()?;

    if manager
        .does_changelog_table_exist()
        .context("Failed to check for the changelog table")?
    {
        println!("Changelog table {} already exists", ctx.config.changelog_table);
        return Ok(());
    }

    manager
        .create_changelog_table()
        .context("Failed to create the changelog table")?;
    println!("Created changelog table {}", ctx.config.changelog_table);
    Ok(())
}
