// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `toolhub config ...`

use anyhow::{Result, bail};

use toolhub_core::AppConfig;

use super::Context;
use crate::cli::ConfigCommand;
use crate::services::data_dir::persist_config;

pub fn run(command: ConfigCommand, ctx: &Context) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if ctx.config_path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite it",
                    ctx.config_path.display()
                );
            }
            persist_config(&ctx.config_path, &AppConfig::default())?;
            println!("Wrote {}", ctx.config_path.display());
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let ctx = Context::new(AppConfig::default(), path.clone());

        run(ConfigCommand::Init { force: false }, &ctx).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());

        assert!(run(ConfigCommand::Init { force: false }, &ctx).is_err());
        assert!(run(ConfigCommand::Init { force: true }, &ctx).is_ok());
    }
}
