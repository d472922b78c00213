// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to a short plain-English message with a
// suggestion, the way a tool page would show it in a toast.

use crate::error::ToolhubError;
use crate::page_range::PageRangeError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user typed or chose something we can't use; fixing the input helps.
    InputProblem,
    /// The file itself is damaged or in a format we can't handle.
    FileProblem,
    /// Something went wrong on this machine (disk, permissions, config).
    Environment,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Drives the prefix/colour in front ends.
    pub severity: Severity,
}

/// Convert a `ToolhubError` into a `HumanError`.
pub fn humanize_error(err: &ToolhubError) -> HumanError {
    match err {
        ToolhubError::InvalidInput(detail) => HumanError {
            message: "Some of the input isn't valid.".into(),
            suggestion: format!("Check the values you entered. ({detail})"),
            severity: Severity::InputProblem,
        },

        ToolhubError::PageRange(range_err) => humanize_page_range(range_err),

        ToolhubError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged or password-protected. Try opening it in a PDF viewer first, or try a different file.".into(),
            severity: Severity::FileProblem,
        },

        ToolhubError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a PNG or JPEG first.".into(),
            severity: Severity::FileProblem,
        },

        ToolhubError::Conversion(detail) => HumanError {
            message: "The file couldn't be converted.".into(),
            suggestion: format!("Make sure the file is well-formed and really is in the format you chose. ({detail})"),
            severity: Severity::FileProblem,
        },

        ToolhubError::UnsupportedConversion { from, to } => HumanError {
            message: format!("Converting {from} to {to} isn't supported."),
            suggestion: "Pick a different target format, or convert in two steps through JSON.".into(),
            severity: Severity::InputProblem,
        },

        ToolhubError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Check the file extension, or name the format explicitly. ({detail})"),
            severity: Severity::InputProblem,
        },

        ToolhubError::Calculation(detail) => HumanError {
            message: "That calculation can't be done.".into(),
            suggestion: format!("Check the numbers and units you entered. ({detail})"),
            severity: Severity::InputProblem,
        },

        ToolhubError::Generator(detail) => HumanError {
            message: "Nothing could be generated with those options.".into(),
            suggestion: format!("Adjust the options and try again. ({detail})"),
            severity: Severity::InputProblem,
        },

        ToolhubError::HashMismatch { expected, actual } => HumanError {
            message: "The file doesn't match the expected checksum.".into(),
            suggestion: format!("The file may have been changed or corrupted. Expected {expected}, got {actual}."),
            severity: Severity::FileProblem,
        },

        ToolhubError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix the value in config.json, or run `toolhub config init` to start over. ({detail})"),
            severity: Severity::Environment,
        },

        ToolhubError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path. It may have been moved or deleted.".into(),
                    severity: Severity::InputProblem,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied while reading or writing a file.".into(),
                    suggestion: "Check the file permissions, or choose a different output location.".into(),
                    severity: Severity::Environment,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    severity: Severity::Environment,
                }
            }
        }

        ToolhubError::Serialization(_) => HumanError {
            message: "The data isn't valid JSON.".into(),
            suggestion: "Check for missing commas, quotes, or brackets.".into(),
            severity: Severity::FileProblem,
        },
    }
}

fn humanize_page_range(err: &PageRangeError) -> HumanError {
    let suggestion = match err {
        PageRangeError::Empty => "Enter pages like 1,3,5-7 or 9- (page 9 to the end).".to_owned(),
        PageRangeError::InvalidToken(token) => {
            format!("'{token}' isn't a page. Use numbers and ranges like 2-4, separated by commas.")
        }
        PageRangeError::PageZero => "Pages are numbered from 1.".to_owned(),
        PageRangeError::ReversedRange { start, end } => {
            format!("Write the smaller page first: {end}-{start}.")
        }
        PageRangeError::OutOfBounds { total, .. } => {
            format!("This document has {total} pages. Choose pages between 1 and {total}.")
        }
        PageRangeError::NoPages => "This document has no pages to work with.".to_owned(),
        PageRangeError::WouldRemoveAll { .. } => {
            "A PDF needs at least one page. Leave at least one page out of the selection.".to_owned()
        }
    };

    HumanError {
        message: "The page selection isn't valid.".into(),
        suggestion,
        severity: Severity::InputProblem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_errors_are_input_problems() {
        let err = ToolhubError::from(PageRangeError::WouldRemoveAll { total: 3 });
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::InputProblem);
        assert!(human.suggestion.contains("at least one page"));
    }

    #[test]
    fn reversed_range_suggests_swapped_order() {
        let err = ToolhubError::from(PageRangeError::ReversedRange { start: 7, end: 2 });
        assert!(humanize_error(&err).suggestion.contains("2-7"));
    }

    #[test]
    fn missing_file_is_input_problem() {
        let err = ToolhubError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::InputProblem);
    }

    #[test]
    fn damaged_pdf_is_file_problem() {
        let err = ToolhubError::PdfError("trailer not found".into());
        assert_eq!(humanize_error(&err).severity, Severity::FileProblem);
    }
}
