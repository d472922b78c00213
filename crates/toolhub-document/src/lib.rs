// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// toolhub-document: Document and data tools for Toolhub.
//
// Provides PDF page operations (merge, split, extract, delete, rotate) driven
// by page-range strings, PDF creation from text or images, image format
// conversion and resizing, and CSV/JSON/XML/Excel conversion.

pub mod convert;
pub mod image;
pub mod pdf;

// Re-export the primary types so callers can use `toolhub_document::PdfReader` etc.
pub use convert::{ConvertOptions, DataConverter, DataFormat, Table};
pub use image::{ImageFormatKind, ImageProcessor, convert_image};
pub use pdf::{PdfInfo, PdfReader, PdfWriter, merge_all};
