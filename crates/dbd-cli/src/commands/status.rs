//! Status command implementation

use anyhow::{Context, Result};
use dbd_engine::DeployReport;
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::DeployContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = DeployContext::load(global)?;
    let manager = ctx.connect()?;
    let discovered = ctx.discover()?;

    let report = ctx
        .deployer(Some(manager))
        .status(discovered)
        .context("Failed to compute deployment status")?;
    let rows = status_rows(&report);

    match args.output {
        StatusOutput::Table => print_table(&rows),
        StatusOutput::Json => print_json(&rows)?,
    }
    Ok(())
}

/// One line of the status listing
#[derive(Debug, Serialize)]
struct StatusRow {
    key: String,
    name: String,
    state: &'static str,
    applied_at: Option<String>,
    applied_by: Option<String>,
}

fn status_rows(report: &DeployReport) -> Vec<StatusRow> {
    let applied = report.applied.iter().map(|entry| StatusRow {
        key: entry.unique_key(),
        name: entry.script_name.clone(),
        state: "applied",
        applied_at: entry
            .complete_date
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        applied_by: entry.applied_by.clone(),
    });
    let pending = report.pending.iter().map(|script| StatusRow {
        key: script.unique_key(),
        name: script.name.clone(),
        state: "pending",
        applied_at: None,
        applied_by: None,
    });
    let held_back = report.held_back.iter().map(|script| StatusRow {
        key: script.unique_key(),
        name: script.name.clone(),
        state: "held back",
        applied_at: None,
        applied_by: None,
    });
    applied.chain(pending).chain(held_back).collect()
}

fn print_table(rows: &[StatusRow]) {
    let key_width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0).max(3);
    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);

    println!(
        "{:<key_width$}  {:<name_width$}  {:<9}  {:<19}  APPLIED BY",
        "KEY", "NAME", "STATE", "APPLIED AT"
    );
    for row in rows {
        println!(
            "{:<key_width$}  {:<name_width$}  {:<9}  {:<19}  {}",
            row.key,
            row.name,
            row.state,
            row.applied_at.as_deref().unwrap_or("-"),
            row.applied_by.as_deref().unwrap_or("-"),
        );
    }

    let count = |state: &str| rows.iter().filter(|r| r.state == state).count();
    println!();
    println!(
        "{} applied, {} pending, {} held back",
        count("applied"),
        count("pending"),
        count("held back")
    );
}

fn print_json(rows: &[StatusRow]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows).context("Failed to serialize status")?;
    println!("{json}");
    Ok(())
}
