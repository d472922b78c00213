// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `toolhub gen ...`

use anyhow::{Context as _, Result, bail};

use toolhub_utility::generators::{lorem, password};
use toolhub_utility::{LoremOptions, PasswordOptions, generate_uuids, hash_file, verify_file};

use super::Context;
use crate::cli::GenCommand;

/// Most passwords printed by one invocation.
const MAX_PASSWORDS: usize = 1000;

pub fn run(command: GenCommand, ctx: &Context) -> Result<()> {
    match command {
        GenCommand::Password {
            length,
            no_uppercase,
            no_lowercase,
            no_digits,
            no_symbols,
            exclude_ambiguous,
            count,
            show_strength,
        } => {
            if count == 0 || count > MAX_PASSWORDS {
                bail!("--count must be 1-{MAX_PASSWORDS}, got {count}");
            }
            let options = PasswordOptions {
                length: length.unwrap_or(ctx.config.password_length),
                uppercase: !no_uppercase,
                lowercase: !no_lowercase,
                digits: !no_digits,
                symbols: !no_symbols,
                exclude_ambiguous,
            };
            for _ in 0..count {
                let generated = password::generate(&options)?;
                if show_strength {
                    let estimate = password::estimate_strength(&generated);
                    println!(
                        "{generated}  ({}, {:.0} bits)",
                        estimate.strength, estimate.entropy_bits
                    );
                } else {
                    println!("{generated}");
                }
            }
            Ok(())
        }

        GenCommand::Strength { password: candidate } => {
            let estimate = password::estimate_strength(&candidate);
            println!(
                "{} ({:.0} bits of entropy)",
                estimate.strength, estimate.entropy_bits
            );
            Ok(())
        }

        GenCommand::Lorem {
            unit,
            count,
            no_lorem_start,
            seed,
        } => {
            let options = LoremOptions {
                unit: unit.into(),
                count,
                start_with_lorem: !no_lorem_start,
            };
            let text = match seed {
                Some(seed) => lorem::generate_seeded(&options, seed)?,
                None => lorem::generate(&options)?,
            };
            println!("{text}");
            Ok(())
        }

        GenCommand::Uuid { count } => {
            for id in generate_uuids(count)? {
                println!("{id}");
            }
            Ok(())
        }

        GenCommand::Hash { input, verify } => {
            match verify {
                Some(expected) => {
                    verify_file(&input, &expected)
                        .with_context(|| format!("verifying {}", input.display()))?;
                    println!("OK  {}", input.display());
                }
                None => {
                    let digest = hash_file(&input)
                        .with_context(|| format!("hashing {}", input.display()))?;
                    println!("{digest}  {}", input.display());
                }
            }
            Ok(())
        }
    }
}
