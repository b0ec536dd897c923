//! Stock units and their base-unit equivalence.
//!
//! Mass normalizes to grams and volume to millilitres. Counts ("each",
//! "case") have no conversion and only compare with the same unit.

use std::str::FromStr;

pub const DEFAULT_UNIT: &str = "g";

const GRAMS_PER_POUND: f64 = 453.59237;
const GRAMS_PER_OUNCE: f64 = 28.349523125;
const ML_PER_QUART: f64 = 946.352946;
const ML_PER_GALLON: f64 = 3785.411784;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Mass,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    Quart,
    Gallon,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Milligram | Unit::Gram | Unit::Kilogram | Unit::Ounce | Unit::Pound => {
                Dimension::Mass
            }
            Unit::Milliliter | Unit::Liter | Unit::Quart | Unit::Gallon => Dimension::Volume,
        }
    }

    /// Multiplier into grams (mass) or millilitres (volume).
    fn base_factor(self) -> f64 {
        match self {
            Unit::Milligram => 0.001,
            Unit::Gram => 1.0,
            Unit::Kilogram => 1000.0,
            Unit::Ounce => GRAMS_PER_OUNCE,
            Unit::Pound => GRAMS_PER_POUND,
            Unit::Milliliter => 1.0,
            Unit::Liter => 1000.0,
            Unit::Quart => ML_PER_QUART,
            Unit::Gallon => ML_PER_GALLON,
        }
    }
}

impl FromStr for Unit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mg" => Ok(Unit::Milligram),
            "g" | "gram" | "grams" => Ok(Unit::Gram),
            "kg" | "kilogram" | "kilograms" => Ok(Unit::Kilogram),
            "oz" | "ounce" | "ounces" => Ok(Unit::Ounce),
            "lb" | "lbs" | "pound" | "pounds" => Ok(Unit::Pound),
            "ml" | "milliliter" | "milliliters" => Ok(Unit::Milliliter),
            "l" | "liter" | "liters" | "litre" | "litres" => Ok(Unit::Liter),
            "qt" | "quart" | "quarts" => Ok(Unit::Quart),
            "gal" | "gallon" | "gallons" => Ok(Unit::Gallon),
            _ => Err(()),
        }
    }
}

/// Puts two stored amounts on a common scale, if they have one.
///
/// Units of the same dimension convert to its base unit. Unrecognised
/// units only compare against the identical unit string.
pub fn comparable_amounts(
    amount: f64,
    unit: &str,
    other_amount: f64,
    other_unit: &str,
) -> Option<(f64, f64)> {
    match (unit.parse::<Unit>(), other_unit.parse::<Unit>()) {
        (Ok(a), Ok(b)) if a.dimension() == b.dimension() => Some((
            amount * a.base_factor(),
            other_amount * b.base_factor(),
        )),
        (Ok(_), Ok(_)) => None,
        _ if unit.trim().eq_ignore_ascii_case(other_unit.trim()) => Some((amount, other_amount)),
        _ => None,
    }
}
