use crate::iban::IbanValidator;
use crate::secondary_validation::Validator;

pub struct IbanChecker;

/// ISO 7064 MOD 97-10 remainder of an alphanumeric string, where letters count as two digits
/// (A=10 ... Z=35). The remainder is folded one character at a time so the number is never
/// materialized. Returns `None` on characters other than ASCII letters and digits.
pub fn mod97_remainder(input: &str) -> Option<u32> {
    let mut remainder = 0;
    for c in input.chars() {
        remainder = match c {
            '0'..='9' => (remainder * 10 + c.to_digit(10)?) % 97,
            'A'..='Z' | 'a'..='z' => (remainder * 100 + c.to_digit(36)?) % 97,
            _ => return None,
        };
    }
    Some(remainder)
}

impl Validator for IbanChecker {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        let iban_candidate: String = regex_match
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        IbanValidator::validate(&iban_candidate).is_ok()
    }
}
