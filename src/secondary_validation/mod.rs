mod finnish_reference_checksum;
mod iban_checker;

pub use crate::secondary_validation::finnish_reference_checksum::{
    weighted_check_digit, FinnishReferenceChecksum,
};
pub use crate::secondary_validation::iban_checker::{mod97_remainder, IbanChecker};
use std::str::Chars;

/// Quick yes/no check of a candidate string. Unlike the typed validators, implementations
/// never explain why a candidate was rejected.
pub trait Validator: Send + Sync {
    fn is_valid_match(&self, regex_match: &str) -> bool;
}

fn get_previous_digit(chars: &mut Chars<'_>) -> Option<u32> {
    while let Some(char) = chars.next_back() {
        if let Some(digit) = char.to_digit(10) {
            return Some(digit);
        }
    }
    None
}
