//! Render command implementation

use anyhow::{Context, Result};
use dbd_engine::TemplateApplier;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::{GlobalArgs, RenderArgs};
use crate::commands::common::{plural_scripts, ExitCode};
use crate::context::DeployContext;
use crate::tool;

/// Execute the render command
pub(crate) async fn execute(args: &RenderArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = DeployContext::load(global)?;
    let manager = if args.offline {
        None
    } else {
        ctx.try_connect()?
    };
    let discovered = ctx.discover()?;

    let mut applier = TemplateApplier::new(
        ctx.factory.syntax(),
        ctx.config.changelog_table.clone(),
        ctx.splitter(),
        ctx.template_environment(),
        Vec::new(),
    )
    .with_applied_by(ctx.config.applied_by.clone());

    let report = ctx
        .deployer(manager)
        .run(discovered, &mut applier, args.create_changelog)
        .context("Failed to render change scripts")?;
    let artifact = applier.into_inner();

    if report.offline {
        if ctx.factory.syntax().supports_guarded_scripts() {
            eprintln!(
                "Rendered offline: every discovered script is included and skips itself \
                 when already in the changelog"
            );
        } else {
            log::warn!(
                "{} artifacts cannot skip applied scripts; render without --offline",
                ctx.factory.dbms()
            );
            eprintln!(
                "Rendered offline: every discovered script is included, already-applied \
                 ones will fail when run"
            );
        }
    }
    eprintln!("Rendered {}", plural_scripts(report.pending.len()));

    match output_path(args, &ctx) {
        Some(path) => {
            std::fs::write(&path, &artifact)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None if !args.execute => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&artifact).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
        None => {}
    }

    if args.execute {
        let sql_tool = ctx
            .config
            .sql_tool
            .as_ref()
            .context("render --execute needs a sql_tool section in dbdeploy.yml")?;
        let output = tool::run_sql_tool(sql_tool, &artifact).await?;

        print!("{}", output.stdout);
        eprint!("{}", output.stderr);
        eprintln!("{} exited with status {}", sql_tool.program, output.exit_code);
        if !output.success {
            return Err(ExitCode(output.exit_code.max(1)).into());
        }
    }
    Ok(())
}

/// `--output-file` as given, else `output_file` from config under the project dir
fn output_path(args: &RenderArgs, ctx: &DeployContext) -> Option<PathBuf> {
    args.output_file.as_ref().map(PathBuf::from).or_else(|| {
        ctx.config
            .output_file
            .as_ref()
            .map(|file| ctx.project_dir.join(file))
    })
}
