// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: configuration location and output file handling shared by
// every subcommand.

pub mod data_dir;
pub mod output;
