use crate::reference::ReferenceValidator;
use crate::secondary_validation::{get_previous_digit, Validator};

/// Finnish creditor reference ("viitenumero") with its trailing 7-3-1 check digit.
pub struct FinnishReferenceChecksum;

const WEIGHTS: &[u32; 3] = &[7, 3, 1];

/// Computes the check digit of a reference payload. Digits are weighted 7, 3, 1, 7, ... starting
/// from the rightmost one, and the check digit tops the sum up to the next multiple of ten.
/// Characters that are not digits are skipped.
pub fn weighted_check_digit(payload: &str) -> u8 {
    let mut chars = payload.chars();
    let mut sum = 0;
    let mut position = 0;
    while let Some(digit) = get_previous_digit(&mut chars) {
        sum += digit * WEIGHTS[position % WEIGHTS.len()];
        position += 1;
    }
    ((10 - sum % 10) % 10) as u8
}

impl Validator for FinnishReferenceChecksum {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        // separators are dropped, letters are kept so that RF references fail
        let reference_candidate: String = regex_match
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        ReferenceValidator::validate(&reference_candidate).is_ok()
    }
}
