// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Body mass index.

use std::fmt;

use serde::{Deserialize, Serialize};

use toolhub_core::error::{Result, ToolhubError};

use super::round_to;

const KG_PER_LB: f64 = 0.453_592_37;
const CM_PER_INCH: f64 = 2.54;
const UNDERWEIGHT_BELOW: f64 = 18.5;
const NORMAL_BELOW: f64 = 25.0;
const OVERWEIGHT_BELOW: f64 = 30.0;

/// WHO adult weight categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_value(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            Self::Underweight
        } else if bmi < NORMAL_BELOW {
            Self::Normal
        } else if bmi < OVERWEIGHT_BELOW {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// A computed BMI together with the height it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bmi {
    value: f64,
    height_m: f64,
}

impl Bmi {
    /// BMI from weight in kilograms and height in centimetres.
    pub fn metric(weight_kg: f64, height_cm: f64) -> Result<Self> {
        positive("weight", weight_kg)?;
        positive("height", height_cm)?;
        let height_m = height_cm / 100.0;
        Ok(Self {
            value: weight_kg / (height_m * height_m),
            height_m,
        })
    }

    /// BMI from weight in pounds and height in inches.
    pub fn imperial(weight_lb: f64, height_in: f64) -> Result<Self> {
        positive("weight", weight_lb)?;
        positive("height", height_in)?;
        Self::metric(weight_lb * KG_PER_LB, height_in * CM_PER_INCH)
    }

    /// Unrounded index.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Index rounded to one decimal place, as displayed.
    pub fn rounded(&self) -> f64 {
        round_to(self.value, 1)
    }

    /// Category of the unrounded index.
    pub fn category(&self) -> BmiCategory {
        BmiCategory::from_value(self.value)
    }

    /// Weight range in kilograms that falls in the normal category for this
    /// height.
    pub fn normal_weight_range_kg(&self) -> (f64, f64) {
        let square = self.height_m * self.height_m;
        (
            round_to(UNDERWEIGHT_BELOW * square, 1),
            round_to(NORMAL_BELOW * square, 1),
        )
    }
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} ({})", self.value, self.category())
    }
}

fn positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ToolhubError::InvalidInput(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_bmi() {
        let bmi = Bmi::metric(70.0, 175.0).unwrap();
        assert_eq!(bmi.rounded(), 22.9);
        assert_eq!(bmi.category(), BmiCategory::Normal);
        assert_eq!(bmi.to_string(), "22.9 (Normal weight)");
    }

    #[test]
    fn imperial_matches_metric() {
        let imperial = Bmi::imperial(154.0, 69.0).unwrap();
        let metric = Bmi::metric(154.0 * KG_PER_LB, 69.0 * CM_PER_INCH).unwrap();
        assert!((imperial.value() - metric.value()).abs() < 1e-12);
        assert_eq!(imperial.rounded(), 22.7);
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(BmiCategory::from_value(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_value(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_value(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_value(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_value(30.0), BmiCategory::Obese);
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        assert!(Bmi::metric(0.0, 170.0).is_err());
        assert!(Bmi::metric(70.0, -1.0).is_err());
        assert!(Bmi::imperial(f64::NAN, 60.0).is_err());
    }

    #[test]
    fn normal_range_for_height() {
        let bmi = Bmi::metric(80.0, 180.0).unwrap();
        assert_eq!(bmi.normal_weight_range_kg(), (59.9, 81.0));
    }
}
