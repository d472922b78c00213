// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Toolhub.

use thiserror::Error;

use crate::page_range::PageRangeError;

/// Top-level error type for all Toolhub operations.
#[derive(Debug, Error)]
pub enum ToolhubError {
    // -- Input errors --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid page range: {0}")]
    PageRange(#[from] PageRangeError),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("conversion failed: {0}")]
    Conversion(String),

    #[error("no conversion from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    // -- Utility errors --
    #[error("calculation failed: {0}")]
    Calculation(String),

    #[error("generator error: {0}")]
    Generator(String),

    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ToolhubError>;
