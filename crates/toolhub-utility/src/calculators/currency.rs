// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Currency conversion against an offline table of indicative rates.
//
// Rates are units of the currency per one US dollar. They are not live
// market data; users who need current figures override them in config.json.

use std::collections::BTreeMap;

use tracing::{debug, info};

use toolhub_core::AppConfig;
use toolhub_core::error::{Result, ToolhubError};

const DEFAULT_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 151.0),
    ("CNY", 7.24),
    ("INR", 83.3),
    ("CAD", 1.36),
    ("AUD", 1.52),
    ("NZD", 1.66),
    ("CHF", 0.90),
    ("SEK", 10.6),
    ("NOK", 10.7),
    ("DKK", 6.87),
    ("PLN", 3.98),
    ("CZK", 23.3),
    ("HUF", 362.0),
    ("TRY", 32.0),
    ("MXN", 16.8),
    ("BRL", 5.05),
    ("ZAR", 18.7),
    ("SGD", 1.35),
    ("HKD", 7.82),
    ("KRW", 1350.0),
    ("AED", 3.6725),
    ("SAR", 3.75),
    ("PKR", 278.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyConverter {
    /// Keyed by upper-case ISO 4217 code.
    rates: BTreeMap<String, f64>,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES
                .iter()
                .map(|(code, rate)| ((*code).to_owned(), *rate))
                .collect(),
        }
    }
}

impl CurrencyConverter {
    /// Built-in rates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in rates with `overrides` applied on top. Overrides may add
    /// currencies missing from the built-in table.
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Result<Self> {
        let mut converter = Self::default();
        for (code, rate) in overrides {
            let code = normalise_code(code)?;
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(ToolhubError::InvalidInput(format!(
                    "rate for {code} must be positive, got {rate}"
                )));
            }
            debug!(code = %code, rate, "currency rate override");
            converter.rates.insert(code, *rate);
        }
        Ok(converter)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::with_overrides(&config.currency_rates)
    }

    /// Units of `code` per US dollar.
    pub fn rate(&self, code: &str) -> Result<f64> {
        let code = normalise_code(code)?;
        self.rates
            .get(&code)
            .copied()
            .ok_or_else(|| ToolhubError::InvalidInput(format!("unknown currency code '{code}'")))
    }

    /// Convert `amount` of `from` into `to`.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ToolhubError::InvalidInput(format!(
                "amount must be zero or more, got {amount}"
            )));
        }
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        let result = amount / from_rate * to_rate;
        info!(amount, from, to, result, "currency converted");
        Ok(result)
    }

    /// Known currency codes in alphabetical order.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}

fn normalise_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ToolhubError::InvalidInput(format!(
            "'{code}' is not a three-letter currency code"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_through_dollars() {
        let converter = CurrencyConverter::new();
        let eur = converter.convert(100.0, "usd", "EUR").unwrap();
        assert!((eur - 92.0).abs() < 1e-9);
        let back = converter.convert(eur, "eur", "usd").unwrap();
        assert!((back - 100.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_unknown_codes_and_negative_amounts() {
        let converter = CurrencyConverter::new();
        assert!(converter.convert(1.0, "USD", "XYZ").is_err());
        assert!(converter.convert(1.0, "dollars", "EUR").is_err());
        assert!(converter.convert(-5.0, "USD", "EUR").is_err());
        assert!(converter.convert(0.0, "USD", "EUR").is_ok());
    }

    #[test]
    fn config_overrides_apply() {
        let mut config = AppConfig::default();
        config.currency_rates.insert("eur".into(), 0.5);
        config.currency_rates.insert("ISK".into(), 138.0);
        let converter = CurrencyConverter::from_config(&config).unwrap();
        assert_eq!(converter.rate("EUR").unwrap(), 0.5);
        assert_eq!(converter.convert(2.0, "USD", "isk").unwrap(), 276.0);
        assert!(converter.currencies().any(|code| code == "ISK"));
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert("EUR".to_owned(), 0.0);
        assert!(CurrencyConverter::with_overrides(&overrides).is_err());
    }
}
