// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolhub: Core types, error definitions, and the page-range parser shared
// by every PDF page tool.

pub mod config;
pub mod data_uri;
pub mod error;
pub mod human_errors;
pub mod page_range;
pub mod types;

pub use config::AppConfig;
pub use data_uri::DataUri;
pub use error::ToolhubError;
pub use page_range::{PageRangeError, PageSelection};
pub use types::*;
