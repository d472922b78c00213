// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Random password generation and a simple entropy-based strength estimate.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use toolhub_core::error::{Result, ToolhubError};

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 128;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>?/~";
/// Characters easily confused with one another in many fonts.
const AMBIGUOUS: &str = "Il1O0o|";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

impl PasswordOptions {
    /// Character classes enabled by these options, ambiguous characters
    /// already removed when requested.
    fn classes(&self) -> Vec<Vec<char>> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, chars)| {
            chars
                .chars()
                .filter(|c| !(self.exclude_ambiguous && AMBIGUOUS.contains(*c)))
                .collect()
        })
        .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let classes = self.classes();
        if classes.is_empty() {
            return Err(ToolhubError::Generator(
                "enable at least one character class".into(),
            ));
        }
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            return Err(ToolhubError::Generator(format!(
                "length must be {MIN_LENGTH}-{MAX_LENGTH}, got {}",
                self.length
            )));
        }
        if self.length < classes.len() {
            return Err(ToolhubError::Generator(format!(
                "length {} is too short for {} character classes",
                self.length,
                classes.len()
            )));
        }
        Ok(())
    }
}

/// Generate a password with the operating system's cryptographically secure
/// generator.
pub fn generate(options: &PasswordOptions) -> Result<String> {
    generate_with(options, &mut rand::thread_rng())
}

/// Generate a password from `rng`. The result holds at least one character
/// from every enabled class.
pub fn generate_with<R: Rng + ?Sized>(options: &PasswordOptions, rng: &mut R) -> Result<String> {
    options.validate()?;
    let classes = options.classes();
    let pool: Vec<char> = classes.iter().flatten().copied().collect();

    let mut chars: Vec<char> = classes
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();
    while chars.len() < options.length {
        chars.push(pool[rng.gen_range(0..pool.len())]);
    }
    chars.shuffle(rng);

    debug!(length = chars.len(), classes = classes.len(), "password generated");
    Ok(chars.into_iter().collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strength {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Fair => "fair",
            Self::Strong => "strong",
            Self::VeryStrong => "very strong",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthEstimate {
    pub entropy_bits: f64,
    pub strength: Strength,
}

/// Estimate strength as `length × log2(pool)`, where the pool is the union
/// of the character classes that appear in `password`.
pub fn estimate_strength(password: &str) -> StrengthEstimate {
    let has = |set: &str| password.chars().any(|c| set.contains(c));
    let mut pool = 0u32;
    if has(UPPERCASE) {
        pool += 26;
    }
    if has(LOWERCASE) {
        pool += 26;
    }
    if has(DIGITS) {
        pool += 10;
    }
    if password
        .chars()
        .any(|c| !c.is_ascii_alphanumeric())
    {
        pool += 33;
    }

    let length = password.chars().count() as f64;
    let entropy_bits = if pool == 0 {
        0.0
    } else {
        length * (pool as f64).log2()
    };
    let strength = match entropy_bits {
        bits if bits < 28.0 => Strength::VeryWeak,
        bits if bits < 36.0 => Strength::Weak,
        bits if bits < 60.0 => Strength::Fair,
        bits if bits < 128.0 => Strength::Strong,
        _ => Strength::VeryStrong,
    };
    StrengthEstimate {
        entropy_bits,
        strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_enabled_class_is_present() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = PasswordOptions {
            length: 4,
            ..PasswordOptions::default()
        };
        for _ in 0..200 {
            let password = generate_with(&options, &mut rng).unwrap();
            assert_eq!(password.chars().count(), 4);
            assert!(password.chars().any(|c| c.is_ascii_uppercase()));
            assert!(password.chars().any(|c| c.is_ascii_lowercase()));
            assert!(password.chars().any(|c| c.is_ascii_digit()));
            assert!(password.chars().any(|c| SYMBOLS.contains(c)));
        }
    }

    #[test]
    fn disabled_and_ambiguous_characters_never_appear() {
        let mut rng = StdRng::seed_from_u64(11);
        let options = PasswordOptions {
            length: 64,
            symbols: false,
            uppercase: true,
            exclude_ambiguous: true,
            ..PasswordOptions::default()
        };
        for _ in 0..50 {
            let password = generate_with(&options, &mut rng).unwrap();
            assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(!password.chars().any(|c| AMBIGUOUS.contains(c)));
        }
    }

    #[test]
    fn invalid_options_are_rejected() {
        let none = PasswordOptions {
            uppercase: false,
            lowercase: false,
            digits: false,
            symbols: false,
            ..PasswordOptions::default()
        };
        assert!(matches!(generate(&none), Err(ToolhubError::Generator(_))));
        for length in [3, 129] {
            let options = PasswordOptions {
                length,
                ..PasswordOptions::default()
            };
            assert!(generate(&options).is_err());
        }
    }

    #[test]
    fn thread_rng_generation() {
        let password = generate(&PasswordOptions::default()).unwrap();
        assert_eq!(password.len(), 16);
    }

    #[test]
    fn strength_estimates() {
        assert_eq!(estimate_strength("").strength, Strength::VeryWeak);
        assert_eq!(estimate_strength("abc123").strength, Strength::Weak);
        let phrase = estimate_strength("horse battery");
        assert_eq!(phrase.strength, Strength::Strong);
        let random = estimate_strength("q7#Vt9!mZ2@xL5$wR8^kP3&nB6*yH4(e");
        assert_eq!(random.strength, Strength::VeryStrong);
        assert!(estimate_strength("Tr0ub4dor&3").entropy_bits > 60.0);
    }
}
