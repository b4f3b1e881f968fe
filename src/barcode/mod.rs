//! The Finnish virtual barcode ("virtuaaliviivakoodi") record.
//!
//! A record is 54 decimal digits without separators:
//!
//! | field     | width | content                                                  |
//! |-----------|-------|----------------------------------------------------------|
//! | version   | 1     | `4`, the version for standard creditor references        |
//! | account   | 16    | IBAN without the `FI` country letters                    |
//! | amount    | 8     | cents, left-zero-padded                                  |
//! | reference | 23    | reference digits, right-aligned and left-zero-padded     |
//! | due date  | 6     | `YYMMDD`, `000000` when the payment has no due date      |

mod config;
mod metrics;

#[cfg(test)]
mod test;

use std::fmt;
use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use self::config::BarcodeConfig;
use self::metrics::{CodecMetrics, Operation};
use crate::amount::MonetaryAmount;
use crate::due_date::{DueDate, DEFAULT_CENTURY, NO_DUE_DATE};
use crate::error::{BarcodeError, CreateCodecError, DecodingError, Field};
use crate::iban::{IbanValidator, NormalizedIban};
use crate::observability::labels::NO_LABEL;
use crate::reference::{NormalizedReference, ReferenceValidator, MAX_REFERENCE_LENGTH};

pub const RECORD_LENGTH: usize = 54;

const IBAN_WIDTH: usize = 16;
const AMOUNT_WIDTH: usize = 8;
const REFERENCE_WIDTH: usize = MAX_REFERENCE_LENGTH;
const DUE_DATE_WIDTH: usize = 6;

const VERSION_FIELD: Range<usize> = 0..1;
const IBAN_FIELD: Range<usize> = 1..17;
const AMOUNT_FIELD: Range<usize> = 17..25;
const REFERENCE_FIELD: Range<usize> = 25..48;
const DUE_DATE_FIELD: Range<usize> = 48..54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeVersion {
    /// Version 4: domestic account with a standard Finnish creditor reference.
    Version4,
}

impl BarcodeVersion {
    pub fn marker(&self) -> char {
        match self {
            BarcodeVersion::Version4 => '4',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '4' => Some(BarcodeVersion::Version4),
            _ => None,
        }
    }

    pub fn record_length(&self) -> usize {
        match self {
            BarcodeVersion::Version4 => RECORD_LENGTH,
        }
    }
}

/// An encoded barcode: digits only, fixed length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BarcodeRecord(String);

impl BarcodeRecord {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn version_field(&self) -> &str {
        &self.0[VERSION_FIELD]
    }

    pub fn iban_field(&self) -> &str {
        &self.0[IBAN_FIELD]
    }

    pub fn amount_field(&self) -> &str {
        &self.0[AMOUNT_FIELD]
    }

    pub fn reference_field(&self) -> &str {
        &self.0[REFERENCE_FIELD]
    }

    pub fn due_date_field(&self) -> &str {
        &self.0[DUE_DATE_FIELD]
    }
}

impl fmt::Display for BarcodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BarcodeRecord {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The fields read back from a record, each one re-validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBarcode {
    pub version: BarcodeVersion,
    pub iban: NormalizedIban,
    pub amount: MonetaryAmount,
    pub reference: NormalizedReference,
    pub due_date: Option<DueDate>,
}

/// Encodes and decodes barcode records. Holds no mutable state and can be shared between
/// threads.
pub struct BarcodeCodec {
    century: u16,
    metrics: CodecMetrics,
}

impl Default for BarcodeCodec {
    fn default() -> Self {
        BarcodeCodec {
            century: DEFAULT_CENTURY,
            metrics: CodecMetrics::new(&NO_LABEL),
        }
    }
}

impl BarcodeCodec {
    pub fn new(config: &BarcodeConfig) -> Result<Self, CreateCodecError> {
        config.validate()?;
        Ok(BarcodeCodec {
            century: config.century,
            metrics: CodecMetrics::new(&config.labels),
        })
    }

    /// Builds the record from fields that already passed validation. Fails without output if
    /// a field does not fit its slot.
    pub fn encode(
        &self,
        iban: &NormalizedIban,
        amount_minor_units: u64,
        reference: &NormalizedReference,
        due_date: Option<DueDate>,
    ) -> Result<BarcodeRecord, BarcodeError> {
        let result = self.assemble(iban, amount_minor_units, reference, due_date);
        self.metrics.record(Operation::Encode, &result);
        result
    }

    /// Validates raw user input field by field and encodes it. The first invalid field is
    /// reported.
    pub fn encode_payment(
        &self,
        raw_iban: &str,
        raw_amount: &str,
        raw_reference: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<BarcodeRecord, BarcodeError> {
        let result = self.validate_and_assemble(raw_iban, raw_amount, raw_reference, due_date);
        self.metrics.record(Operation::Encode, &result);
        result
    }

    /// Splits a record back into its fields and re-validates them.
    pub fn decode(&self, record: &str) -> Result<DecodedBarcode, BarcodeError> {
        let result = self.disassemble(record);
        self.metrics.record(Operation::Decode, &result);
        result
    }

    fn validate_and_assemble(
        &self,
        raw_iban: &str,
        raw_amount: &str,
        raw_reference: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<BarcodeRecord, BarcodeError> {
        let iban = IbanValidator::validate(raw_iban)?;
        let amount: MonetaryAmount = raw_amount.parse()?;
        let reference = ReferenceValidator::validate(raw_reference)?;
        self.assemble(
            &iban,
            amount.minor_units(),
            &reference,
            due_date.map(DueDate::new),
        )
    }

    fn assemble(
        &self,
        iban: &NormalizedIban,
        amount_minor_units: u64,
        reference: &NormalizedReference,
        due_date: Option<DueDate>,
    ) -> Result<BarcodeRecord, BarcodeError> {
        let version = BarcodeVersion::Version4;
        let iban = pad_field(Field::Iban, iban.barcode_digits(), IBAN_WIDTH)?;
        let amount = pad_field(Field::Amount, &amount_minor_units.to_string(), AMOUNT_WIDTH)?;
        let reference = pad_field(Field::Reference, reference.digits(), REFERENCE_WIDTH)?;
        let due_date = match due_date {
            Some(date) => date.to_yymmdd(self.century)?,
            None => NO_DUE_DATE.to_string(),
        };
        debug_assert_eq!(due_date.len(), DUE_DATE_WIDTH);

        let mut record = String::with_capacity(version.record_length());
        record.push(version.marker());
        record.push_str(&iban);
        record.push_str(&amount);
        record.push_str(&reference);
        record.push_str(&due_date);
        debug_assert_eq!(record.len(), version.record_length());

        Ok(BarcodeRecord(record))
    }

    fn disassemble(&self, record: &str) -> Result<DecodedBarcode, BarcodeError> {
        let marker = record.chars().next().ok_or(DecodingError::InvalidLength {
            expected: RECORD_LENGTH,
            actual: 0,
        })?;
        let version =
            BarcodeVersion::from_marker(marker).ok_or(DecodingError::UnsupportedVersion(marker))?;

        let length = record.chars().count();
        if length != version.record_length() {
            return Err(DecodingError::InvalidLength {
                expected: version.record_length(),
                actual: length,
            }
            .into());
        }
        if let Some((position, character)) = record
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_digit())
        {
            return Err(DecodingError::NonDigit {
                position,
                character,
            }
            .into());
        }

        let iban = IbanValidator::from_barcode_digits(&record[IBAN_FIELD])?;
        let amount = MonetaryAmount::from_minor_units(parse_digits(&record[AMOUNT_FIELD]))?;
        let reference = ReferenceValidator::validate(&record[REFERENCE_FIELD])?;
        let due_date = DueDate::from_yymmdd(&record[DUE_DATE_FIELD], self.century)?;

        Ok(DecodedBarcode {
            version,
            iban,
            amount,
            reference,
            due_date,
        })
    }
}

/// Right-aligns `digits` in a zero-filled field. Never truncates.
fn pad_field(field: Field, digits: &str, width: usize) -> Result<String, BarcodeError> {
    if digits.len() > width {
        return Err(BarcodeError::Encoding {
            field,
            width,
            actual: digits.len(),
        });
    }
    Ok(format!("{digits:0>width$}"))
}

/// Callers pass ASCII digits only.
fn parse_digits(digits: &str) -> u64 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}
