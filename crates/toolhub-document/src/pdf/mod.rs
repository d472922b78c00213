// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: page tools on existing PDFs, and PDF creation from text or images.

pub mod reader;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use reader::{PageInfo, PdfInfo, PdfReader, merge_all};
pub use writer::PdfWriter;
