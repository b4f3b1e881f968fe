use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CheckKind;
use crate::secondary_validation::mod97_remainder;

const FINNISH_COUNTRY_CODE: &str = "FI";
const FINNISH_IBAN_LENGTH: usize = 18;
const FINNISH_BBAN_LENGTH: usize = 14;
const DISPLAY_GROUP_SIZE: usize = 4;

lazy_static! {
    static ref IBAN_SHAPE: Regex = Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    #[error("IBAN must be {expected} characters long, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unexpected character {character:?} at position {position}")]
    InvalidCharacter { position: usize, character: char },

    #[error("Only Finnish IBANs are supported, got country code {0:?}")]
    UnsupportedCountry(String),

    #[error("The mod-97 checksum does not match")]
    ChecksumMismatch,
}

impl IbanError {
    pub fn kind(&self) -> CheckKind {
        match self {
            IbanError::ChecksumMismatch => CheckKind::Checksum,
            IbanError::InvalidLength { .. }
            | IbanError::InvalidCharacter { .. }
            | IbanError::UnsupportedCountry(_) => CheckKind::Format,
        }
    }
}

/// A Finnish IBAN that passed both the format and the mod-97 check.
///
/// Always held in its electronic form: no whitespace, uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedIban {
    electronic: String,
}

impl NormalizedIban {
    /// Contiguous form, e.g. `FI2112345600000785`.
    pub fn electronic(&self) -> &str {
        &self.electronic
    }

    /// Blocks of four separated by a single space, e.g. `FI21 1234 5600 0007 85`.
    pub fn grouped(&self) -> String {
        self.electronic
            .as_bytes()
            .chunks(DISPLAY_GROUP_SIZE)
            .map(String::from_utf8_lossy)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn country(&self) -> &str {
        &self.electronic[..2]
    }

    pub fn check_digits(&self) -> &str {
        &self.electronic[2..4]
    }

    pub fn bban(&self) -> &str {
        &self.electronic[4..]
    }

    /// The numeric account payload carried in a barcode: the IBAN without its country letters.
    pub fn barcode_digits(&self) -> &str {
        &self.electronic[FINNISH_COUNTRY_CODE.len()..]
    }
}

impl fmt::Display for NormalizedIban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grouped())
    }
}

impl FromStr for NormalizedIban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IbanValidator::validate(s)
    }
}

impl TryFrom<String> for NormalizedIban {
    type Error = IbanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IbanValidator::validate(&value)
    }
}

impl From<NormalizedIban> for String {
    fn from(iban: NormalizedIban) -> Self {
        iban.electronic
    }
}

pub struct IbanValidator;

impl IbanValidator {
    /// Validates raw user input. Whitespace is ignored and letters may be in any case.
    pub fn validate(raw: &str) -> Result<NormalizedIban, IbanError> {
        let electronic = normalize(raw);
        check_format(&electronic)?;

        let (head, tail) = electronic.split_at(4);
        let rearranged = format!("{tail}{head}");
        if mod97_remainder(&rearranged) != Some(1) {
            return Err(IbanError::ChecksumMismatch);
        }

        Ok(NormalizedIban { electronic })
    }

    /// Computes the two IBAN check digits for a Finnish domestic account number (BBAN).
    pub fn compute_check_digits(country: &str, bban: &str) -> Result<String, IbanError> {
        let country = normalize(country);
        let bban = normalize(bban);
        if country != FINNISH_COUNTRY_CODE {
            return Err(IbanError::UnsupportedCountry(country));
        }
        if let Some((position, character)) = bban
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_digit())
        {
            return Err(IbanError::InvalidCharacter {
                position: position + 4,
                character,
            });
        }
        if bban.len() != FINNISH_BBAN_LENGTH {
            return Err(IbanError::InvalidLength {
                expected: FINNISH_IBAN_LENGTH,
                actual: bban.len() + 4,
            });
        }

        let remainder = mod97_remainder(&format!("{bban}{country}00"))
            .ok_or(IbanError::ChecksumMismatch)?;
        Ok(format!("{:02}", 98 - remainder))
    }

    /// Rebuilds an IBAN from the numeric payload of a barcode.
    pub(crate) fn from_barcode_digits(digits: &str) -> Result<NormalizedIban, IbanError> {
        Self::validate(&format!("{FINNISH_COUNTRY_CODE}{digits}"))
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn check_format(iban: &str) -> Result<(), IbanError> {
    if !IBAN_SHAPE.is_match(iban) {
        return Err(first_format_violation(iban));
    }
    let country = &iban[..2];
    if country != FINNISH_COUNTRY_CODE {
        return Err(IbanError::UnsupportedCountry(country.to_string()));
    }
    if iban.len() != FINNISH_IBAN_LENGTH {
        return Err(IbanError::InvalidLength {
            expected: FINNISH_IBAN_LENGTH,
            actual: iban.len(),
        });
    }
    // Finnish account numbers are purely numeric
    if let Some((position, character)) = iban
        .chars()
        .enumerate()
        .skip(4)
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(IbanError::InvalidCharacter {
            position,
            character,
        });
    }
    Ok(())
}

fn first_format_violation(iban: &str) -> IbanError {
    for (position, character) in iban.chars().enumerate() {
        let allowed = match position {
            0 | 1 => character.is_ascii_uppercase(),
            2 | 3 => character.is_ascii_digit(),
            _ => character.is_ascii_uppercase() || character.is_ascii_digit(),
        };
        if !allowed {
            return IbanError::InvalidCharacter {
                position,
                character,
            };
        }
    }
    IbanError::InvalidLength {
        expected: FINNISH_IBAN_LENGTH,
        actual: iban.chars().count(),
    }
}
