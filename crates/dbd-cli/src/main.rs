//! dbdeploy CLI - apply numbered SQL change scripts exactly once

use clap::Parser;

mod cli;
mod commands;
mod context;
mod tool;

use cli::Cli;
use commands::common::ExitCode;
use commands::{create_changelog, render, status, update};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Update(args) => update::execute(args, &cli.global).await,
        cli::Commands::Render(args) => render::execute(args, &cli.global).await,
        cli::Commands::CreateChangelog => create_changelog::execute(&cli.global).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => {
                std::process::ExitCode::from(u8::try_from(*code).unwrap_or(1))
            }
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

/// Warnings by default, debug with `--verbose`; `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_target(false)
        .init();
}
