// ABOUTME: Entry point for the boxrun CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use boxrun::config::{self, Config};
use boxrun::error::{Error, Result};
use boxrun::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use commands::{RunArgs, SuiteArgs};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    // Ctrl-C drops the command future; staging dirs and containers go with it.
    let result = tokio::select! {
        result = run(cli, mode) => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Aborted),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new(mode).error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    let load_config = || match &cli.config {
        Some(path) => Config::load(path),
        None => Config::discover_or_default(&cwd),
    };

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Run {
            source,
            lang,
            yes,
            marker,
        } => {
            let args = RunArgs {
                source,
                lang,
                yes,
                marker,
            };
            commands::run(load_config()?, args, output).await
        }
        Commands::Detect { path } => commands::detect(&load_config()?, &path, &output),
        Commands::Languages => {
            commands::languages(&load_config()?, &output);
            Ok(())
        }
        Commands::Suite {
            only,
            jobs,
            images,
            fixtures,
            results,
            generate,
            preflight,
            yes,
        } => {
            let args = SuiteArgs {
                only,
                jobs,
                images,
                fixtures,
                results,
                generate,
                preflight,
                yes,
            };
            commands::suite(load_config()?, args, output).await
        }
        Commands::Clean => commands::clean(load_config()?, output).await,
    }
}
