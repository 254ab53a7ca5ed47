//! External SQL tool runner
//!
//! The rendered script is fed to the tool on stdin. Its output and exit
//! status are passed back verbatim; nothing here interprets them.

use anyhow::{Context, Result};
use dbd_core::SqlToolConfig;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

/// Captured result of a tool run
pub(crate) struct ToolOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run `tool` with `script` on stdin and wait for it to exit.
pub(crate) async fn run_sql_tool(tool: &SqlToolConfig, script: &[u8]) -> Result<ToolOutput> {
    log::debug!("Running {} {}", tool.program, tool.args.join(" "));

    let mut child = tokio::process::Command::new(&tool.program)
        .args(&tool.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start '{}'; is it installed?", tool.program))?;

    let mut stdin = child.stdin.take().context("Tool stdin was not captured")?;
    let input = script.to_vec();
    let feeder = tokio::spawn(async move {
        let result = stdin.write_all(&input).await;
        drop(stdin);
        result
    });

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("Failed to wait for '{}'", tool.program))?;

    // A tool that stops at the first error may close stdin early.
    if let Ok(Err(e)) = feeder.await {
        log::warn!("{} did not read the whole script: {e}", tool.program);
    }

    Ok(ToolOutput {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
