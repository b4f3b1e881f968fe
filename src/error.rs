use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};
use thiserror::Error;

use crate::amount::AmountError;
use crate::due_date::DateError;
use crate::iban::IbanError;
use crate::reference::ReferenceError;

/// The part of a payment a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Iban,
    Amount,
    Reference,
    DueDate,
    /// The barcode record as a whole (length, charset, version marker).
    Record,
}

/// Whether a validator rejected the shape of the input or its check digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CheckKind {
    Format,
    Checksum,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("Barcode record must be {expected} digits long, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Barcode record contains a non-digit character {character:?} at position {position}")]
    NonDigit { position: usize, character: char },

    #[error("Unsupported barcode version marker {0:?}")]
    UnsupportedVersion(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    #[error("Invalid IBAN: {0}")]
    InvalidIban(#[from] IbanError),

    #[error("Invalid reference: {0}")]
    InvalidReference(#[from] ReferenceError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Invalid due date: {0}")]
    InvalidDate(#[from] DateError),

    /// A validated field still does not fit its fixed-width slot in the record.
    #[error("The {field} field needs {actual} digits but only {width} are available")]
    Encoding {
        field: Field,
        width: usize,
        actual: usize,
    },

    #[error("Invalid barcode record: {0}")]
    Decoding(#[from] DecodingError),
}

impl BarcodeError {
    pub fn field(&self) -> Field {
        match self {
            BarcodeError::InvalidIban(_) => Field::Iban,
            BarcodeError::InvalidReference(_) => Field::Reference,
            BarcodeError::InvalidAmount(_) => Field::Amount,
            BarcodeError::InvalidDate(_) => Field::DueDate,
            BarcodeError::Encoding { field, .. } => *field,
            BarcodeError::Decoding(_) => Field::Record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateCodecError {
    #[error("The due date century must be a multiple of 100 between 1900 and 9900, got {0}")]
    InvalidCentury(u16),
}
