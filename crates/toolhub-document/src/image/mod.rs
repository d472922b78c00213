// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: format conversion, resize, rotate, flip, crop, and tone
// adjustment.

pub mod format;
pub mod processor;

pub use format::ImageFormatKind;
pub use processor::{ImageProcessor, convert_image};
