// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// toolhub-utility: Calculators and generators.
//
// Unit, BMI, loan, and currency calculators; password, lorem ipsum, hash,
// and UUID generators. Everything here is a pure function or a small value
// type with no I/O beyond optional file hashing.

pub mod calculators;
pub mod generators;

pub use calculators::bmi::{Bmi, BmiCategory};
pub use calculators::currency::CurrencyConverter;
pub use calculators::loan::{Installment, LoanTerms};
pub use calculators::units::{Unit, UnitCategory};
pub use generators::identifiers::{
    generate_uuids, hash_bytes, hash_file, verify_file, verify_hash,
};
pub use generators::lorem::{LoremOptions, LoremUnit};
pub use generators::password::{PasswordOptions, Strength, StrengthEstimate};
