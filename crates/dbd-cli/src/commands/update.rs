//! Update command implementation

use anyhow::{Context, Result};
use dbd_engine::DirectApplier;

use crate::cli::{GlobalArgs, UpdateArgs};
use crate::commands::common::{plural_scripts, print_scripts};
use crate::context::DeployContext;

/// Execute the update command
pub(crate) async fn execute(args: &UpdateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = DeployContext::load(global)?;
    let manager = ctx.connect_persistent()?;
    let discovered = ctx.discover()?;

    let mut applier = DirectApplier::new(manager.clone(), ctx.splitter())
        .with_applied_by(ctx.config.applied_by.clone());
    let report = ctx
        .deployer(Some(manager))
        .run(discovered, &mut applier, args.create_changelog)
        .context("Deployment failed; scripts before the failing one remain applied")?;

    if report.pending.is_empty() {
        println!("Database is up to date ({} applied)", report.applied.len());
    } else {
        println!("Applied {}:", plural_scripts(report.pending.len()));
        print_scripts("+", &report.pending);
    }
    if !report.held_back.is_empty() {
        println!("Held back {}:", plural_scripts(report.held_back.len()));
        print_scripts("~", &report.held_back);
    }
    Ok(())
}
