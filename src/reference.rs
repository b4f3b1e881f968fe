use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CheckKind;
use crate::secondary_validation::weighted_check_digit;

/// Width of the reference field in a barcode record.
pub const MAX_REFERENCE_LENGTH: usize = 23;
/// At least one payload digit followed by the check digit.
pub const MIN_REFERENCE_LENGTH: usize = 2;
const DISPLAY_GROUP_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Reference is empty")]
    Empty,

    #[error("Unexpected character {character:?} at position {position}")]
    InvalidCharacter { position: usize, character: char },

    #[error("Reference must have at least {min} digits, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Reference can have at most {max} digits, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Check digit should be {expected}, got {actual}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

impl ReferenceError {
    pub fn kind(&self) -> CheckKind {
        match self {
            ReferenceError::ChecksumMismatch { .. } => CheckKind::Checksum,
            ReferenceError::Empty
            | ReferenceError::InvalidCharacter { .. }
            | ReferenceError::TooShort { .. }
            | ReferenceError::TooLong { .. } => CheckKind::Format,
        }
    }
}

/// A Finnish creditor reference with a verified check digit and without leading zeros (the
/// all-zero reference is kept as `00`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedReference {
    digits: String,
}

impl NormalizedReference {
    /// Plain digit string, check digit included.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn payload(&self) -> &str {
        &self.digits[..self.digits.len() - 1]
    }

    pub fn check_digit(&self) -> u8 {
        self.digits.as_bytes()[self.digits.len() - 1] - b'0'
    }

    /// The reference right-aligned in the fixed-width record field.
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.digits, width = MAX_REFERENCE_LENGTH)
    }

    /// Groups of five counted from the right, as printed on invoices: `55958 22432 94671`.
    pub fn grouped(&self) -> String {
        let len = self.digits.len();
        let mut grouped = String::with_capacity(len + len / DISPLAY_GROUP_SIZE);
        for (i, c) in self.digits.chars().enumerate() {
            if i > 0 && (len - i) % DISPLAY_GROUP_SIZE == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }
        grouped
    }
}

impl fmt::Display for NormalizedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grouped())
    }
}

impl FromStr for NormalizedReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferenceValidator::validate(s)
    }
}

impl TryFrom<String> for NormalizedReference {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ReferenceValidator::validate(&value)
    }
}

impl From<NormalizedReference> for String {
    fn from(reference: NormalizedReference) -> Self {
        reference.digits
    }
}

pub struct ReferenceValidator;

impl ReferenceValidator {
    /// Validates a full reference (payload followed by its check digit). Whitespace is ignored.
    pub fn validate(raw: &str) -> Result<NormalizedReference, ReferenceError> {
        let digits = strip_to_digits(raw)?;
        check_length(&digits, MIN_REFERENCE_LENGTH, MAX_REFERENCE_LENGTH)?;

        let (payload, check) = digits.split_at(digits.len() - 1);
        let expected = weighted_check_digit(payload);
        let actual = check.as_bytes()[0] - b'0';
        if expected != actual {
            return Err(ReferenceError::ChecksumMismatch { expected, actual });
        }

        Ok(NormalizedReference {
            digits: without_leading_zeros(&digits).to_string(),
        })
    }

    /// Check digit for a reference payload (the reference without its last digit).
    pub fn compute_check_digit(payload: &str) -> Result<u8, ReferenceError> {
        let digits = strip_to_digits(payload)?;
        check_length(&digits, MIN_REFERENCE_LENGTH - 1, MAX_REFERENCE_LENGTH - 1)?;
        Ok(weighted_check_digit(&digits))
    }

    /// Turns a payload such as an invoice number into a complete reference.
    pub fn create(payload: &str) -> Result<NormalizedReference, ReferenceError> {
        let check_digit = Self::compute_check_digit(payload)?;
        Self::validate(&format!("{payload}{check_digit}"))
    }
}

fn check_length(digits: &str, min: usize, max: usize) -> Result<(), ReferenceError> {
    if digits.len() < min {
        return Err(ReferenceError::TooShort {
            min,
            actual: digits.len(),
        });
    }
    if digits.len() > max {
        return Err(ReferenceError::TooLong {
            max,
            actual: digits.len(),
        });
    }
    Ok(())
}

/// Leading zeros carry no weight in the checksum. An all-zero reference keeps the shortest valid
/// form, `00`.
fn without_leading_zeros(digits: &str) -> &str {
    let significant = digits.trim_start_matches('0');
    if significant.len() < MIN_REFERENCE_LENGTH {
        &digits[digits.len() - MIN_REFERENCE_LENGTH..]
    } else {
        significant
    }
}

fn strip_to_digits(raw: &str) -> Result<String, ReferenceError> {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return Err(ReferenceError::Empty);
    }
    if let Some((position, character)) = stripped
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(ReferenceError::InvalidCharacter {
            position,
            character,
        });
    }
    Ok(stripped)
}
