// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolhub: offline utility toolbox
//
// Entry point. Parses the command line, loads the config file, initialises
// logging, and dispatches to the command handlers.

mod cli;
mod commands;
mod services;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolhub_core::human_errors::humanize_error;
use toolhub_core::{AppConfig, ToolhubError};

use cli::{Cli, Command, ConfigCommand};
use commands::Context;
use services::data_dir;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = data_dir::load_config(cli.config.as_deref());
    let log_filter = match (&loaded, cli.verbose, cli.quiet) {
        (_, true, _) => "debug".to_owned(),
        (_, _, true) => "warn".to_owned(),
        (Ok((config, _)), _, _) => config.log_filter.clone(),
        (Err(_), _, _) => "info".to_owned(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let (config, config_path) = match loaded {
        Ok(loaded) => loaded,
        // A broken config file must not lock the user out of replacing it.
        Err(err) if can_run_without_config(&cli.command) => {
            tracing::warn!(error = %err, "ignoring unreadable config file");
            let path = cli
                .config
                .clone()
                .unwrap_or_else(data_dir::default_config_path);
            (AppConfig::default(), path)
        }
        Err(err) => return report(&anyhow::Error::new(err)),
    };

    tracing::debug!(config = %config_path.display(), "Toolhub starting");
    let ctx = Context::new(config, config_path);
    match commands::run(cli.command, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn can_run_without_config(command: &Command) -> bool {
    matches!(
        command,
        Command::Config(ConfigCommand::Path | ConfigCommand::Init { force: true })
    )
}

/// Print a plain-language error to stderr.
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ToolhubError>() {
        Some(toolhub_err) => {
            let human = humanize_error(toolhub_err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            eprintln!("  details: {err:#}");
        }
        None => eprintln!("error: {err:#}"),
    }
    ExitCode::FAILURE
}
