// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers. Each tool family maps its parsed arguments onto the
// library crates and prints or writes the result.

pub mod calc;
pub mod config;
pub mod convert;
pub mod datauri;
pub mod generate;
pub mod image;
pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use toolhub_core::{AppConfig, ToolhubError};

use crate::cli::Command;
use crate::services::output::OutputPlan;

/// Loaded configuration shared by every command.
pub struct Context {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub output: OutputPlan,
}

impl Context {
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        let output = OutputPlan::from_config(&config);
        Self {
            config,
            config_path,
            output,
        }
    }
}

pub fn run(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Pdf(command) => pdf::run(command, ctx),
        Command::Convert(args) => convert::run(args, ctx),
        Command::Image(command) => image::run(command, ctx),
        Command::Calc(command) => calc::run(command, ctx),
        Command::Gen(command) => generate::run(command, ctx),
        Command::Datauri(command) => datauri::run(command, ctx),
        Command::Config(command) => config::run(command, ctx),
    }
}

/// Read a whole input file. I/O failures stay `ToolhubError`s so the
/// friendly error report still applies.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(ToolhubError::from)
        .with_context(|| format!("reading {}", path.display()))
}
