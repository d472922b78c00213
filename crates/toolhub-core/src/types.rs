// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared by the Toolhub crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToolhubError;

/// Standard paper sizes for generated PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

impl FromStr for PaperSize {
    type Err = ToolhubError;

    /// Accepts the named sizes case-insensitively, or `WIDTHxHEIGHT` in mm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "tabloid" => Ok(Self::Tabloid),
            other => {
                let (w, h) = other.split_once('x').ok_or_else(|| {
                    ToolhubError::InvalidInput(format!("unknown paper size '{s}'"))
                })?;
                let parse = |v: &str| {
                    v.trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|mm| *mm > 0)
                        .ok_or_else(|| ToolhubError::InvalidInput(format!("bad paper size '{s}'")))
                };
                Ok(Self::Custom {
                    width_mm: parse(w)?,
                    height_mm: parse(h)?,
                })
            }
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom {
                width_mm,
                height_mm,
            } => write!(f, "{width_mm}x{height_mm}"),
            named => write!(f, "{named:?}"),
        }
    }
}

/// Clockwise page rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    Clockwise90,
    Half,
    Counterclockwise90,
}

impl Rotation {
    /// Map a signed multiple of 90 to a rotation. Full turns are rejected
    /// because they would be a no-op.
    pub fn from_degrees(degrees: i32) -> Result<Self, ToolhubError> {
        if degrees % 90 != 0 {
            return Err(ToolhubError::InvalidInput(format!(
                "rotation must be a multiple of 90, got {degrees}"
            )));
        }
        match degrees.rem_euclid(360) {
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Half),
            270 => Ok(Self::Counterclockwise90),
            _ => Err(ToolhubError::InvalidInput(format!(
                "rotation by {degrees} degrees leaves pages unchanged"
            ))),
        }
    }

    /// Clockwise degrees in `0..360`, as stored in a PDF `/Rotate` entry.
    pub fn degrees(&self) -> i64 {
        match self {
            Self::Clockwise90 => 90,
            Self::Half => 180,
            Self::Counterclockwise90 => 270,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_size_parses_names_and_custom() {
        assert_eq!("Letter".parse::<PaperSize>().unwrap(), PaperSize::Letter);
        assert_eq!(
            "100x150".parse::<PaperSize>().unwrap(),
            PaperSize::Custom {
                width_mm: 100,
                height_mm: 150
            }
        );
        assert!("0x150".parse::<PaperSize>().is_err());
        assert!("B5".parse::<PaperSize>().is_err());
    }

    #[test]
    fn rotation_normalises_negative_degrees() {
        assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::Counterclockwise90);
        assert_eq!(Rotation::from_degrees(450).unwrap(), Rotation::Clockwise90);
        assert!(Rotation::from_degrees(45).is_err());
        assert!(Rotation::from_degrees(360).is_err());
    }
}
