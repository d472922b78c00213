// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generators: passwords, placeholder text, hashes, and UUIDs.

pub mod identifiers;
pub mod lorem;
pub mod password;
