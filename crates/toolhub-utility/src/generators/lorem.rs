// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lorem ipsum placeholder text.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use toolhub_core::error::{Result, ToolhubError};

/// Upper bound on `count` for any unit.
pub const MAX_COUNT: usize = 10_000;

const OPENING: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit";

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "eu", "fugiat", "nulla",
    "pariatur", "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt",
    "culpa", "qui", "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoremUnit {
    Words,
    Sentences,
    Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoremOptions {
    pub unit: LoremUnit,
    pub count: usize,
    /// Open with the classic "Lorem ipsum dolor sit amet…".
    pub start_with_lorem: bool,
}

impl Default for LoremOptions {
    fn default() -> Self {
        Self {
            unit: LoremUnit::Paragraphs,
            count: 3,
            start_with_lorem: true,
        }
    }
}

/// Generate placeholder text with a fresh random seed.
pub fn generate(options: &LoremOptions) -> Result<String> {
    generate_from(options, &mut rand::thread_rng())
}

/// Generate placeholder text deterministically from `seed`.
pub fn generate_seeded(options: &LoremOptions, seed: u64) -> Result<String> {
    generate_from(options, &mut StdRng::seed_from_u64(seed))
}

fn generate_from<R: Rng + ?Sized>(options: &LoremOptions, rng: &mut R) -> Result<String> {
    if options.count == 0 || options.count > MAX_COUNT {
        return Err(ToolhubError::Generator(format!(
            "count must be 1-{MAX_COUNT}, got {}",
            options.count
        )));
    }

    let text = match options.unit {
        LoremUnit::Words => words(options.count, options.start_with_lorem, rng),
        LoremUnit::Sentences => (0..options.count)
            .map(|i| sentence(options.start_with_lorem && i == 0, &mut *rng))
            .collect::<Vec<_>>()
            .join(" "),
        LoremUnit::Paragraphs => (0..options.count)
            .map(|i| paragraph(options.start_with_lorem && i == 0, &mut *rng))
            .collect::<Vec<_>>()
            .join("\n\n"),
    };
    Ok(text)
}

fn words<R: Rng + ?Sized>(count: usize, start_with_lorem: bool, rng: &mut R) -> String {
    let mut out: Vec<&str> = if start_with_lorem {
        OPENING
            .split(' ')
            .map(|word| word.trim_end_matches(','))
            .take(count)
            .collect()
    } else {
        Vec::with_capacity(count)
    };
    while out.len() < count {
        out.push(WORDS[rng.gen_range(0..WORDS.len())]);
    }
    out.join(" ")
}

fn sentence<R: Rng + ?Sized>(opening: bool, rng: &mut R) -> String {
    if opening {
        return format!("{OPENING}.");
    }
    let length = rng.gen_range(6..=14);
    let comma_after = if length > 8 {
        Some(rng.gen_range(3..length - 3))
    } else {
        None
    };

    let mut text = String::new();
    for i in 0..length {
        let word = WORDS[rng.gen_range(0..WORDS.len())];
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                text.extend(first.to_uppercase());
                text.push_str(chars.as_str());
            }
        } else {
            text.push(' ');
            text.push_str(word);
        }
        if Some(i) == comma_after {
            text.push(',');
        }
    }
    text.push('.');
    text
}

fn paragraph<R: Rng + ?Sized>(opening: bool, rng: &mut R) -> String {
    let sentences = rng.gen_range(3..=6);
    (0..sentences)
        .map(|i| sentence(opening && i == 0, &mut *rng))
        .collect::<Vec<_>>()
        .join(" ")
}
