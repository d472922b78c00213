// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `toolhub calc ...`

use anyhow::{Result, anyhow};
use serde_json::json;

use toolhub_utility::calculators::round_to;
use toolhub_utility::calculators::units;
use toolhub_utility::{Bmi, CurrencyConverter, Installment, LoanTerms, Unit, UnitCategory};

use super::Context;
use crate::cli::CalcCommand;

pub fn run(command: CalcCommand, ctx: &Context) -> Result<()> {
    match command {
        CalcCommand::Units { list: true, .. } => {
            print!("{}", unit_listing());
            Ok(())
        }
        CalcCommand::Units {
            value, from, to, ..
        } => {
            let value = value.ok_or_else(|| anyhow!("give a value to convert"))?;
            let (from, to) = required_pair(from, to)?;
            let from = Unit::parse(&from)?;
            let to = Unit::parse(&to)?;
            let result = units::convert(value, from, to)?;
            println!("{value} {from} = {} {to}", round_to(result, 6));
            Ok(())
        }

        CalcCommand::Bmi {
            weight,
            height,
            imperial,
        } => {
            let bmi = if imperial {
                Bmi::imperial(weight, height)?
            } else {
                Bmi::metric(weight, height)?
            };
            let (low, high) = bmi.normal_weight_range_kg();
            println!("BMI: {bmi}");
            println!("Normal weight for this height: {low}-{high} kg");
            Ok(())
        }

        CalcCommand::Loan {
            principal,
            rate,
            months,
            schedule,
            start,
            json,
        } => {
            let terms = LoanTerms::new(principal, rate, months)?;
            let rows = (schedule || start.is_some()).then(|| terms.schedule(start));
            if json {
                let report = json!({
                    "principal": terms.principal(),
                    "annual_rate_percent": terms.annual_rate_percent(),
                    "months": terms.months(),
                    "monthly_payment": round_to(terms.monthly_payment(), 2),
                    "total_payment": round_to(terms.total_payment(), 2),
                    "total_interest": round_to(terms.total_interest(), 2),
                    "schedule": rows,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Monthly payment: {:.2}", terms.monthly_payment());
                println!("Total paid:      {:.2}", terms.total_payment());
                println!("Total interest:  {:.2}", terms.total_interest());
                if let Some(rows) = rows {
                    print!("{}", schedule_table(&rows));
                }
            }
            Ok(())
        }

        CalcCommand::Currency { list: true, .. } => {
            let converter = CurrencyConverter::from_config(&ctx.config)?;
            for code in converter.currencies() {
                println!("{code}  {}", converter.rate(code)?);
            }
            Ok(())
        }
        CalcCommand::Currency {
            amount, from, to, ..
        } => {
            let amount = amount.ok_or_else(|| anyhow!("give an amount to convert"))?;
            let (from, to) = required_pair(from, to)?;
            let converter = CurrencyConverter::from_config(&ctx.config)?;
            let result = converter.convert(amount, &from, &to)?;
            println!(
                "{amount:.2} {} = {result:.2} {}",
                from.to_ascii_uppercase(),
                to.to_ascii_uppercase()
            );
            println!("Rates are indicative and may be out of date.");
            Ok(())
        }
    }
}

fn required_pair(from: Option<String>, to: Option<String>) -> Result<(String, String)> {
    from.zip(to)
        .ok_or_else(|| anyhow!("give both the unit to convert from and the unit to convert to"))
}

fn unit_listing() -> String {
    let mut out = String::new();
    for category in UnitCategory::ALL {
        out.push_str(&format!("{category}:\n"));
        for unit in category.units() {
            out.push_str(&format!("  {:<6} {}\n", unit.symbol, unit.name));
        }
    }
    out
}

fn schedule_table(rows: &[Installment]) -> String {
    let mut out = format!(
        "\n{:>5}  {:<10}  {:>12}  {:>12}  {:>12}  {:>14}\n",
        "#", "Due", "Payment", "Principal", "Interest", "Balance"
    );
    for row in rows {
        let due = row
            .date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".into());
        out.push_str(&format!(
            "{:>5}  {:<10}  {:>12.2}  {:>12.2}  {:>12.2}  {:>14.2}\n",
            row.number, due, row.payment, row.principal, row.interest, row.balance
        ));
    }
    out
}
