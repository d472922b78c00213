// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unit conversion across length, mass, temperature, volume, area, speed,
// time, and data size.
//
// Linear units carry a factor to their category's base unit (metre,
// kilogram, litre, square metre, metre per second, second, byte).
// Temperatures convert through kelvin.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use toolhub_core::error::{Result, ToolhubError};

/// Tolerance when checking for temperatures below absolute zero.
const ABSOLUTE_ZERO_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Length,
    Mass,
    Temperature,
    Volume,
    Area,
    Speed,
    Time,
    DataSize,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 8] = [
        Self::Length,
        Self::Mass,
        Self::Temperature,
        Self::Volume,
        Self::Area,
        Self::Speed,
        Self::Time,
        Self::DataSize,
    ];

    /// Units belonging to this category, in table order.
    pub fn units(self) -> impl Iterator<Item = &'static Unit> {
        UNITS.iter().filter(move |unit| unit.category == self)
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Temperature => "temperature",
            Self::Volume => "volume",
            Self::Area => "area",
            Self::Speed => "speed",
            Self::Time => "time",
            Self::DataSize => "data size",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scale {
    /// Multiply by this to reach the category's base unit.
    Linear(f64),
    Celsius,
    Fahrenheit,
    Kelvin,
    Rankine,
}

/// A unit of measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub symbol: &'static str,
    pub name: &'static str,
    pub category: UnitCategory,
    aliases: &'static [&'static str],
    scale: Scale,
}

const fn linear(
    symbol: &'static str,
    name: &'static str,
    category: UnitCategory,
    factor: f64,
    aliases: &'static [&'static str],
) -> Unit {
    Unit {
        symbol,
        name,
        category,
        aliases,
        scale: Scale::Linear(factor),
    }
}

const fn temperature(
    symbol: &'static str,
    name: &'static str,
    scale: Scale,
    aliases: &'static [&'static str],
) -> Unit {
    Unit {
        symbol,
        name,
        category: UnitCategory::Temperature,
        aliases,
        scale,
    }
}

use UnitCategory::{Area, DataSize, Length, Mass, Speed, Time, Volume};

static UNITS: &[Unit] = &[
    // Length (metre)
    linear("mm", "millimetre", Length, 0.001, &["millimeter", "millimeters", "millimetres"]),
    linear("cm", "centimetre", Length, 0.01, &["centimeter", "centimeters", "centimetres"]),
    linear("m", "metre", Length, 1.0, &["meter", "meters", "metres"]),
    linear("km", "kilometre", Length, 1000.0, &["kilometer", "kilometers", "kilometres"]),
    linear("in", "inch", Length, 0.0254, &["inches", "\""]),
    linear("ft", "foot", Length, 0.3048, &["feet", "'"]),
    linear("yd", "yard", Length, 0.9144, &["yards"]),
    linear("mi", "mile", Length, 1609.344, &["miles"]),
    linear("nmi", "nautical mile", Length, 1852.0, &["nautical miles"]),
    // Mass (kilogram)
    linear("mg", "milligram", Mass, 1e-6, &["milligrams"]),
    linear("g", "gram", Mass, 0.001, &["grams"]),
    linear("kg", "kilogram", Mass, 1.0, &["kilograms", "kilo", "kilos"]),
    linear("t", "tonne", Mass, 1000.0, &["tonnes", "metric ton"]),
    linear("oz", "ounce", Mass, 0.028_349_523_125, &["ounces"]),
    linear("lb", "pound", Mass, 0.453_592_37, &["lbs", "pounds"]),
    linear("st", "stone", Mass, 6.350_293_18, &["stones"]),
    // Temperature (kelvin)
    temperature("°C", "degree Celsius", Scale::Celsius, &["C", "celsius", "degC"]),
    temperature("°F", "degree Fahrenheit", Scale::Fahrenheit, &["F", "fahrenheit", "degF"]),
    temperature("K", "kelvin", Scale::Kelvin, &["kelvins"]),
    temperature("°R", "degree Rankine", Scale::Rankine, &["R", "rankine"]),
    // Volume (litre)
    linear("ml", "millilitre", Volume, 0.001, &["mL", "milliliter", "milliliters"]),
    linear("l", "litre", Volume, 1.0, &["L", "liter", "liters", "litres"]),
    linear("m3", "cubic metre", Volume, 1000.0, &["m³", "cubic meter"]),
    linear("tsp", "teaspoon", Volume, 0.004_928_921_593_75, &["teaspoons"]),
    linear("tbsp", "tablespoon", Volume, 0.014_786_764_781_25, &["tablespoons"]),
    linear("floz", "US fluid ounce", Volume, 0.029_573_529_562_5, &["fl oz", "fluid ounce"]),
    linear("cup", "US cup", Volume, 0.236_588_236_5, &["cups"]),
    linear("pt", "US pint", Volume, 0.473_176_473, &["pint", "pints"]),
    linear("qt", "US quart", Volume, 0.946_352_946, &["quart", "quarts"]),
    linear("gal", "US gallon", Volume, 3.785_411_784, &["gallon", "gallons"]),
    // Area (square metre)
    linear("mm2", "square millimetre", Area, 1e-6, &["mm²"]),
    linear("cm2", "square centimetre", Area, 1e-4, &["cm²"]),
    linear("m2", "square metre", Area, 1.0, &["m²", "sqm"]),
    linear("ha", "hectare", Area, 10_000.0, &["hectare", "hectares"]),
    linear("km2", "square kilometre", Area, 1e6, &["km²"]),
    linear("in2", "square inch", Area, 0.000_645_16, &["in²", "sq in"]),
    linear("ft2", "square foot", Area, 0.092_903_04, &["ft²", "sq ft", "sqft"]),
    linear("yd2", "square yard", Area, 0.836_127_36, &["yd²", "sq yd"]),
    linear("ac", "acre", Area, 4046.856_422_4, &["acre", "acres"]),
    linear("mi2", "square mile", Area, 2_589_988.110_336, &["mi²", "sq mi"]),
    // Speed (metre per second)
    linear("m/s", "metre per second", Speed, 1.0, &["mps"]),
    linear("km/h", "kilometre per hour", Speed, 1.0 / 3.6, &["kph", "kmh"]),
    linear("mph", "mile per hour", Speed, 0.447_04, &["mi/h"]),
    linear("kn", "knot", Speed, 1852.0 / 3600.0, &["knot", "knots", "kt"]),
    linear("ft/s", "foot per second", Speed, 0.3048, &["fps"]),
    // Time (second)
    linear("ms", "millisecond", Time, 0.001, &["milliseconds"]),
    linear("s", "second", Time, 1.0, &["sec", "seconds"]),
    linear("min", "minute", Time, 60.0, &["minutes"]),
    linear("h", "hour", Time, 3600.0, &["hr", "hours"]),
    linear("d", "day", Time, 86_400.0, &["days"]),
    linear("wk", "week", Time, 604_800.0, &["week", "weeks"]),
    // Julian year, 365.25 days.
    linear("yr", "year", Time, 31_557_600.0, &["year", "years"]),
    // Data size (byte)
    linear("bit", "bit", DataSize, 0.125, &["bits", "b"]),
    linear("B", "byte", DataSize, 1.0, &["byte", "bytes"]),
    linear("KB", "kilobyte", DataSize, 1e3, &["kilobyte", "kilobytes"]),
    linear("MB", "megabyte", DataSize, 1e6, &["megabyte", "megabytes"]),
    linear("GB", "gigabyte", DataSize, 1e9, &["gigabyte", "gigabytes"]),
    linear("TB", "terabyte", DataSize, 1e12, &["terabyte", "terabytes"]),
    linear("KiB", "kibibyte", DataSize, 1024.0, &["kibibyte"]),
    linear("MiB", "mebibyte", DataSize, 1_048_576.0, &["mebibyte"]),
    linear("GiB", "gibibyte", DataSize, 1_073_741_824.0, &["gibibyte"]),
    linear("TiB", "tebibyte", DataSize, 1_099_511_627_776.0, &["tebibyte"]),
];

impl Unit {
    /// Look up a unit by symbol, name, or alias.
    ///
    /// Exact matches win, so `"B"` is a byte and `"b"` a bit; otherwise the
    /// lookup is case-insensitive and the first unit in table order wins.
    pub fn parse(input: &str) -> Result<&'static Unit> {
        let wanted = input.trim();
        let exact = |unit: &&Unit| {
            unit.symbol == wanted || unit.name == wanted || unit.aliases.contains(&wanted)
        };
        let loose = |unit: &&Unit| {
            unit.symbol.eq_ignore_ascii_case(wanted)
                || unit.name.eq_ignore_ascii_case(wanted)
                || unit.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(wanted))
        };
        UNITS
            .iter()
            .find(exact)
            .or_else(|| UNITS.iter().find(loose))
            .ok_or_else(|| ToolhubError::InvalidInput(format!("unknown unit '{input}'")))
    }

    fn to_base(&self, value: f64) -> f64 {
        match self.scale {
            Scale::Linear(factor) => value * factor,
            Scale::Celsius => value + 273.15,
            Scale::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + 273.15,
            Scale::Kelvin => value,
            Scale::Rankine => value * 5.0 / 9.0,
        }
    }

    fn from_base(&self, base: f64) -> f64 {
        match self.scale {
            Scale::Linear(factor) => base / factor,
            Scale::Celsius => base - 273.15,
            Scale::Fahrenheit => (base - 273.15) * 9.0 / 5.0 + 32.0,
            Scale::Kelvin => base,
            Scale::Rankine => base * 9.0 / 5.0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

/// Convert `value` between two units of the same category.
pub fn convert(value: f64, from: &Unit, to: &Unit) -> Result<f64> {
    if !value.is_finite() {
        return Err(ToolhubError::InvalidInput(format!("{value} is not a finite number")));
    }
    if from.category != to.category {
        return Err(ToolhubError::Calculation(format!(
            "cannot convert {} ({}) to {} ({})",
            from.symbol, from.category, to.symbol, to.category
        )));
    }

    let base = from.to_base(value);
    if from.category == UnitCategory::Temperature && base < -ABSOLUTE_ZERO_EPSILON {
        return Err(ToolhubError::Calculation(format!(
            "{value} {} is below absolute zero",
            from.symbol
        )));
    }

    let result = to.from_base(base);
    debug!(value, from = from.symbol, to = to.symbol, result, "unit conversion");
    Ok(result)
}

/// Parse both unit names and convert.
pub fn convert_str(value: f64, from: &str, to: &str) -> Result<f64> {
    convert(value, Unit::parse(from)?, Unit::parse(to)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn length_and_mass() {
        assert!(close(convert_str(1.0, "mi", "km").unwrap(), 1.609344));
        assert!(close(convert_str(12.0, "in", "ft").unwrap(), 1.0));
        assert!(close(convert_str(1.0, "kg", "lb").unwrap(), 2.204_622_621_848_776));
        assert!(close(convert_str(14.0, "lb", "st").unwrap(), 1.0));
    }

    #[test]
    fn temperature_goes_through_kelvin() {
        assert!(close(convert_str(100.0, "°C", "°F").unwrap(), 212.0));
        assert!(close(convert_str(32.0, "F", "C").unwrap(), 0.0));
        assert!(close(convert_str(0.0, "K", "celsius").unwrap(), -273.15));
        assert!(close(convert_str(-40.0, "C", "F").unwrap(), -40.0));
        assert!(close(convert_str(491.67, "R", "K").unwrap(), 273.15));
    }

    #[test]
    fn below_absolute_zero_is_rejected() {
        assert!(matches!(
            convert_str(-300.0, "C", "K"),
            Err(ToolhubError::Calculation(_))
        ));
        assert!(convert_str(-1.0, "K", "F").is_err());
        assert!(convert_str(-459.67, "F", "K").is_ok());
    }

    #[test]
    fn cross_category_is_rejected() {
        let err = convert_str(1.0, "kg", "m").unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn symbol_lookup() {
        assert_eq!(Unit::parse("B").unwrap().name, "byte");
        assert_eq!(Unit::parse("b").unwrap().name, "bit");
        assert_eq!(Unit::parse("mb").unwrap().symbol, "MB");
        assert_eq!(Unit::parse(" Feet ").unwrap().symbol, "ft");
        assert_eq!(Unit::parse("km²").unwrap().category, UnitCategory::Area);
        assert!(Unit::parse("furlong").is_err());
        assert!(close(convert_str(1.0, "GiB", "MiB").unwrap(), 1024.0));
        assert!(close(convert_str(8.0, "bit", "B").unwrap(), 1.0));
    }

    #[test]
    fn every_category_has_units() {
        for category in UnitCategory::ALL {
            assert!(category.units().count() >= 2, "{category}");
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(convert_str(f64::NAN, "m", "km").is_err());
        assert!(convert_str(f64::INFINITY, "m", "km").is_err());
    }

    proptest! {
        #[test]
        fn linear_round_trip(value in -1e9f64..1e9, a in 0usize..9, b in 0usize..9) {
            let units: Vec<&Unit> = UnitCategory::Length.units().collect();
            let there = convert(value, units[a], units[b]).unwrap();
            let back = convert(there, units[b], units[a]).unwrap();
            prop_assert!(close(back, value) || (back - value).abs() < 1e-6);
        }
    }
}
