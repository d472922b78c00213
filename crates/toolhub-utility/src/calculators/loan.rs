// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-rate loan repayment and amortization.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use toolhub_core::error::{Result, ToolhubError};

use super::round_to;

/// Longest term accepted: 100 years of monthly payments.
const MAX_MONTHS: u32 = 1200;

/// Validated loan terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    principal: f64,
    annual_rate_percent: f64,
    months: u32,
}

/// One row of an amortization schedule. Money amounts are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Installment {
    pub number: u32,
    /// Due date, when the schedule was given a start date.
    pub date: Option<NaiveDate>,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_percent: f64, months: u32) -> Result<Self> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(ToolhubError::InvalidInput(format!(
                "loan amount must be positive, got {principal}"
            )));
        }
        if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
            return Err(ToolhubError::InvalidInput(format!(
                "interest rate must be zero or more, got {annual_rate_percent}%"
            )));
        }
        if months == 0 || months > MAX_MONTHS {
            return Err(ToolhubError::InvalidInput(format!(
                "term must be 1-{MAX_MONTHS} months, got {months}"
            )));
        }
        Ok(Self {
            principal,
            annual_rate_percent,
            months,
        })
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    /// Level monthly payment, unrounded.
    ///
    /// `P·r·(1+r)^n / ((1+r)^n − 1)`; with a zero rate the principal is simply
    /// spread evenly over the term.
    pub fn monthly_payment(&self) -> f64 {
        let n = self.months as f64;
        let r = self.monthly_rate();
        if r == 0.0 {
            return self.principal / n;
        }
        let growth = (1.0 + r).powf(n);
        self.principal * r * growth / (growth - 1.0)
    }

    /// Sum of all payments.
    pub fn total_payment(&self) -> f64 {
        self.monthly_payment() * self.months as f64
    }

    /// Total cost of borrowing.
    pub fn total_interest(&self) -> f64 {
        self.total_payment() - self.principal
    }

    /// Month-by-month breakdown. Payments fall due monthly starting one month
    /// after `start`. Every row pays the rounded level payment except the
    /// last, which settles the remaining balance so it ends at exactly zero.
    pub fn schedule(&self, start: Option<NaiveDate>) -> Vec<Installment> {
        let rate = self.monthly_rate();
        let payment = round_to(self.monthly_payment(), 2);
        let mut balance = round_to(self.principal, 2);
        let mut rows = Vec::with_capacity(self.months as usize);

        for number in 1..=self.months {
            let interest = round_to(balance * rate, 2);
            let (payment, principal) = if number == self.months {
                (round_to(balance + interest, 2), balance)
            } else {
                let principal = round_to((payment - interest).min(balance), 2);
                (round_to(principal + interest, 2), principal)
            };
            balance = round_to(balance - principal, 2);

            rows.push(Installment {
                number,
                date: start.and_then(|date| date.checked_add_months(Months::new(number))),
                payment,
                principal,
                interest,
                balance,
            });
        }

        debug!(
            rows = rows.len(),
            payment,
            "amortization schedule built"
        );
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_mortgage_payment() {
        let terms = LoanTerms::new(200_000.0, 6.0, 360).unwrap();
        assert_eq!(round_to(terms.monthly_payment(), 2), 1199.10);
        assert_eq!(round_to(terms.total_interest(), 0), 231_676.0);
    }

    #[test]
    fn zero_rate_divides_evenly() {
        let terms = LoanTerms::new(1200.0, 0.0, 12).unwrap();
        assert_eq!(terms.monthly_payment(), 100.0);
        assert_eq!(terms.total_interest(), 0.0);
    }

    #[test]
    fn schedule_ends_at_zero() {
        let terms = LoanTerms::new(10_000.0, 5.0, 36).unwrap();
        let rows = terms.schedule(None);
        assert_eq!(rows.len(), 36);
        assert_eq!(rows.last().unwrap().balance, 0.0);

        let repaid: f64 = rows.iter().map(|row| row.principal).sum();
        assert!((repaid - 10_000.0).abs() < 0.005);
        assert!(rows.iter().all(|row| row.date.is_none()));
        assert_eq!(rows[0].interest, 41.67);
    }

    #[test]
    fn schedule_dates_advance_monthly() {
        let terms = LoanTerms::new(1000.0, 12.0, 3).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let dates: Vec<_> = terms
            .schedule(Some(start))
            .into_iter()
            .map(|row| row.date.unwrap())
            .collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
            ]
        );
    }

    #[test]
    fn invalid_terms_are_rejected() {
        assert!(LoanTerms::new(0.0, 5.0, 12).is_err());
        assert!(LoanTerms::new(1000.0, -1.0, 12).is_err());
        assert!(LoanTerms::new(1000.0, 5.0, 0).is_err());
        assert!(LoanTerms::new(f64::INFINITY, 5.0, 12).is_err());
    }
}
