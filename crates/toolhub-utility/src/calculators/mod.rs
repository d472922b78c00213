// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Calculators: unit conversion, BMI, loan amortization, currency.

pub mod bmi;
pub mod currency;
pub mod loan;
pub mod units;

/// Round to `places` decimal places for display.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
