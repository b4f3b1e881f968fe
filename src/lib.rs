// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod amount;
mod barcode;
mod due_date;
mod error;
mod iban;
mod observability;
mod reference;
mod secondary_validation;

// This is the public API of the barcode library
pub use amount::{AmountError, MonetaryAmount, MAX_MINOR_UNITS};
pub use barcode::{
    BarcodeCodec, BarcodeConfig, BarcodeRecord, BarcodeVersion, DecodedBarcode, RECORD_LENGTH,
};
pub use due_date::{DateError, DueDate, DEFAULT_CENTURY};
pub use error::{BarcodeError, CheckKind, CreateCodecError, DecodingError, Field};
pub use iban::{IbanError, IbanValidator, NormalizedIban};
pub use observability::labels::Labels;
pub use reference::{
    NormalizedReference, ReferenceError, ReferenceValidator, MAX_REFERENCE_LENGTH,
    MIN_REFERENCE_LENGTH,
};
pub use secondary_validation::{FinnishReferenceChecksum, IbanChecker, Validator};
