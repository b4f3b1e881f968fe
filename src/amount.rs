use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest amount the 8-digit record field can carry, in cents.
pub const MAX_MINOR_UNITS: u64 = 99_999_999;
const MINOR_UNIT_SCALE: u32 = 2;
const MINOR_UNITS_PER_MAJOR: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Amount {0:?} is not a number")]
    NotANumber(String),

    #[error("Amount must be a finite number")]
    NotFinite,

    #[error("Amount cannot be negative")]
    Negative,

    #[error("Amount can have at most 2 decimal places, got {0}")]
    TooPrecise(u32),

    #[error("Amount cannot exceed 999999.99")]
    TooLarge,
}

/// A non-negative amount of euros, held as a whole number of cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct MonetaryAmount {
    minor_units: u64,
}

impl MonetaryAmount {
    pub fn from_minor_units(minor_units: u64) -> Result<Self, AmountError> {
        if minor_units > MAX_MINOR_UNITS {
            return Err(AmountError::TooLarge);
        }
        Ok(Self { minor_units })
    }

    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative);
        }
        // 12.500 carries no more precision than 12.50
        let value = value.normalize();
        if value.scale() > MINOR_UNIT_SCALE {
            return Err(AmountError::TooPrecise(value.scale()));
        }
        let minor_units = value
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
            .and_then(|cents| cents.to_u64())
            .ok_or(AmountError::TooLarge)?;
        Self::from_minor_units(minor_units)
    }

    /// Converts a floating point amount using its shortest decimal representation, so `12.5`
    /// is accepted while `12.345` is rejected.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite);
        }
        if value < 0.0 {
            return Err(AmountError::Negative);
        }
        let value = Decimal::from_f64(value).ok_or(AmountError::TooLarge)?;
        Self::from_decimal(value)
    }

    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.minor_units as i64, MINOR_UNIT_SCALE)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.minor_units / MINOR_UNITS_PER_MAJOR,
            self.minor_units % MINOR_UNITS_PER_MAJOR
        )
    }
}

/// Parses user input such as `12.50`, `1234.5` or the Finnish notation `1 234,50`.
impl FromStr for MonetaryAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        let value = Decimal::from_str(&cleaned).map_err(|err| parse_error(s, &cleaned, err))?;
        Self::from_decimal(value)
    }
}

/// Numeric text with more digits than a `Decimal` holds is out of range, not malformed.
fn parse_error(raw: &str, cleaned: &str, err: rust_decimal::Error) -> AmountError {
    let overflow = match err {
        rust_decimal::Error::ExceedsMaximumPossibleValue
        | rust_decimal::Error::LessThanMinimumPossibleValue => true,
        rust_decimal::Error::ErrorString(ref message) => message.contains("overflow"),
        _ => false,
    };
    match (overflow, cleaned.starts_with('-')) {
        (true, true) => AmountError::Negative,
        (true, false) => AmountError::TooLarge,
        (false, _) => AmountError::NotANumber(raw.to_string()),
    }
}

impl TryFrom<Decimal> for MonetaryAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<MonetaryAmount> for Decimal {
    fn from(amount: MonetaryAmount) -> Self {
        amount.to_decimal()
    }
}
