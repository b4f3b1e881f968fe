use crate::amount::{AmountError, MonetaryAmount, MAX_MINOR_UNITS};
use crate::barcode::{BarcodeCodec, BarcodeConfig, BarcodeVersion, DecodedBarcode, RECORD_LENGTH};
use crate::due_date::{DateError, DueDate};
use crate::error::{BarcodeError, DecodingError, Field};
use crate::iban::{IbanError, IbanValidator};
use crate::reference::{ReferenceError, ReferenceValidator};
use chrono::NaiveDate;

const IBAN: &str = "FI29 1220 3500 6578 75";
const REFERENCE: &str = "55958 22432 94671";
const RECORD: &str = "429122035006578750000125000000000559582243294671240315";

fn due_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 3, 15)
}

#[test]
fn encodes_the_reference_payment() {
    let codec = BarcodeCodec::default();
    let record = codec
        .encode_payment(IBAN, "12.50", REFERENCE, due_date())
        .unwrap();

    assert_eq!(record.as_str(), RECORD);
    assert_eq!(record.as_str().len(), RECORD_LENGTH);
    assert_eq!(record.version_field(), "4");
    assert_eq!(record.iban_field(), "2912203500657875");
    assert_eq!(record.amount_field(), "00001250");
    assert_eq!(record.reference_field(), "00000000559582243294671");
    assert_eq!(record.due_date_field(), "240315");
    assert_eq!(record.to_string(), RECORD);
}

#[test]
fn encode_matches_encode_payment() {
    let codec = BarcodeCodec::default();
    let iban = IbanValidator::validate(IBAN).unwrap();
    let reference = ReferenceValidator::validate(REFERENCE).unwrap();
    let record = codec
        .encode(
            &iban,
            1250,
            &reference,
            Some(DueDate::from_ymd(2024, 3, 15).unwrap()),
        )
        .unwrap();
    assert_eq!(record.into_string(), RECORD);
}

#[test]
fn one_decimal_amount_is_padded_to_cents() {
    let codec = BarcodeCodec::default();
    let record = codec
        .encode_payment(IBAN, "1234.5", REFERENCE, due_date())
        .unwrap();
    assert_eq!(record.amount_field(), "00123450");

    let record = codec
        .encode_payment(IBAN, "0", REFERENCE, due_date())
        .unwrap();
    assert_eq!(record.amount_field(), "00000000");
}

#[test]
fn missing_due_date_is_encoded_as_zeros() {
    let codec = BarcodeCodec::default();
    let record = codec.encode_payment(IBAN, "12.50", "1232", None).unwrap();
    assert_eq!(record.due_date_field(), "000000");
    assert_eq!(record.reference_field(), "00000000000000000001232");

    let decoded = codec.decode(record.as_str()).unwrap();
    assert_eq!(decoded.due_date, None);
}

#[test]
fn encode_then_decode_returns_the_same_fields() {
    let codec = BarcodeCodec::default();
    let ibans = [
        "FI2112345600000785",
        "FI2912203500657875",
        "FI5810171000000122",
        "FI4112203500006595",
    ];
    let amounts = [0, 1, 1250, 123_450, MAX_MINOR_UNITS];
    let references = ["13", "1232", "559582243294671", "12345616123456161234561"];
    let dates = [
        None,
        Some(DueDate::from_ymd(2000, 1, 1).unwrap()),
        Some(DueDate::from_ymd(2024, 2, 29).unwrap()),
        Some(DueDate::from_ymd(2099, 12, 31).unwrap()),
    ];

    for raw_iban in ibans {
        let iban = IbanValidator::validate(raw_iban).unwrap();
        for amount in amounts {
            for raw_reference in references {
                let reference = ReferenceValidator::validate(raw_reference).unwrap();
                for due_date in dates {
                    let record = codec.encode(&iban, amount, &reference, due_date).unwrap();
                    assert_eq!(record.as_str().len(), RECORD_LENGTH);
                    assert!(record.as_str().chars().all(|c| c.is_ascii_digit()));

                    let decoded = codec.decode(record.as_str()).unwrap();
                    assert_eq!(
                        decoded,
                        DecodedBarcode {
                            version: BarcodeVersion::Version4,
                            iban: iban.clone(),
                            amount: MonetaryAmount::from_minor_units(amount).unwrap(),
                            reference: reference.clone(),
                            due_date,
                        }
                    );
                }
            }
        }
    }
}

#[test]
fn amount_overflow_is_an_encoding_error() {
    let codec = BarcodeCodec::default();
    let iban = IbanValidator::validate(IBAN).unwrap();
    let reference = ReferenceValidator::validate(REFERENCE).unwrap();
    let err = codec
        .encode(&iban, MAX_MINOR_UNITS + 1, &reference, None)
        .unwrap_err();
    assert_eq!(
        err,
        BarcodeError::Encoding {
            field: Field::Amount,
            width: 8,
            actual: 9
        }
    );
    assert_eq!(err.field(), Field::Amount);
}

#[test]
fn encode_payment_reports_the_failing_field() {
    let codec = BarcodeCodec::default();

    let err = codec
        .encode_payment("FI2112203500006595", "12.50", REFERENCE, due_date())
        .unwrap_err();
    assert_eq!(err, BarcodeError::InvalidIban(IbanError::ChecksumMismatch));
    assert_eq!(err.field(), Field::Iban);

    let err = codec
        .encode_payment(IBAN, "1234.567", REFERENCE, due_date())
        .unwrap_err();
    assert_eq!(err, BarcodeError::InvalidAmount(AmountError::TooPrecise(3)));
    assert_eq!(err.field(), Field::Amount);

    let err = codec
        .encode_payment(IBAN, "-5", REFERENCE, due_date())
        .unwrap_err();
    assert_eq!(err, BarcodeError::InvalidAmount(AmountError::Negative));

    let err = codec
        .encode_payment(IBAN, "12.50", "1233", due_date())
        .unwrap_err();
    assert_eq!(
        err,
        BarcodeError::InvalidReference(ReferenceError::ChecksumMismatch {
            expected: 2,
            actual: 3
        })
    );
    assert_eq!(err.field(), Field::Reference);

    let err = codec
        .encode_payment(IBAN, "12.50", REFERENCE, NaiveDate::from_ymd_opt(2100, 1, 1))
        .unwrap_err();
    assert_eq!(
        err,
        BarcodeError::InvalidDate(DateError::OutsideCenturyWindow {
            year: 2100,
            first: 2000,
            last: 2099
        })
    );
    assert_eq!(err.field(), Field::DueDate);
}

#[test]
fn decode_rejects_malformed_records() {
    let codec = BarcodeCodec::default();

    assert_eq!(
        codec.decode(""),
        Err(DecodingError::InvalidLength {
            expected: 54,
            actual: 0
        }
        .into())
    );
    assert_eq!(
        codec.decode(&RECORD[..53]),
        Err(DecodingError::InvalidLength {
            expected: 54,
            actual: 53
        }
        .into())
    );
    assert_eq!(
        codec.decode(&format!("{RECORD}0")),
        Err(DecodingError::InvalidLength {
            expected: 54,
            actual: 55
        }
        .into())
    );
    assert_eq!(
        codec.decode(&format!("5{}", &RECORD[1..])),
        Err(DecodingError::UnsupportedVersion('5').into())
    );
    assert_eq!(
        codec.decode(&format!("{} {}", &RECORD[..20], &RECORD[21..])),
        Err(DecodingError::NonDigit {
            position: 20,
            character: ' '
        }
        .into())
    );

    let err = codec.decode(&RECORD.replace('4', "X")).unwrap_err();
    assert_eq!(err.field(), Field::Record);
}

#[test]
fn decode_revalidates_fields() {
    let codec = BarcodeCodec::default();

    // account check digits 29 -> 28
    let record = format!("428{}", &RECORD[3..]);
    assert_eq!(
        codec.decode(&record),
        Err(BarcodeError::InvalidIban(IbanError::ChecksumMismatch))
    );

    // reference check digit 1 -> 2
    let record = format!("{}2{}", &RECORD[..47], &RECORD[48..]);
    assert_eq!(
        codec.decode(&record),
        Err(BarcodeError::InvalidReference(
            ReferenceError::ChecksumMismatch {
                expected: 1,
                actual: 2
            }
        ))
    );

    let record = format!("{}240230", &RECORD[..48]);
    assert_eq!(
        codec.decode(&record),
        Err(BarcodeError::InvalidDate(DateError::NotACalendarDate {
            year: 2024,
            month: 2,
            day: 30
        }))
    );
}

#[test]
fn all_zero_reference_round_trips() {
    let codec = BarcodeCodec::default();
    let record = format!("{}{}{}", &RECORD[..25], "0".repeat(23), &RECORD[48..]);
    let decoded = codec.decode(&record).unwrap();
    assert_eq!(decoded.reference.digits(), "00");

    let encoded = codec
        .encode(
            &decoded.iban,
            decoded.amount.minor_units(),
            &decoded.reference,
            decoded.due_date,
        )
        .unwrap();
    assert_eq!(encoded.as_str(), record);
}

#[test]
fn century_window_is_configurable() {
    let codec = BarcodeConfig::new().century(1900).build().unwrap();
    let record = codec
        .encode_payment(IBAN, "12.50", REFERENCE, NaiveDate::from_ymd_opt(1999, 12, 31))
        .unwrap();
    assert_eq!(record.due_date_field(), "991231");

    let decoded = codec.decode(record.as_str()).unwrap();
    assert_eq!(
        decoded.due_date,
        Some(DueDate::from_ymd(1999, 12, 31).unwrap())
    );

    // the same digits read in the default window
    let decoded = BarcodeCodec::default().decode(record.as_str()).unwrap();
    assert_eq!(
        decoded.due_date,
        Some(DueDate::from_ymd(2099, 12, 31).unwrap())
    );
}

#[test]
fn codec_can_be_shared_between_threads() {
    let codec = BarcodeCodec::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    codec
                        .encode_payment(IBAN, "12.50", REFERENCE, due_date())
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_str(), RECORD);
        }
    });
}

#[test]
fn decoded_barcode_serializes() {
    let decoded = BarcodeCodec::default().decode(RECORD).unwrap();
    let json = serde_json::to_value(&decoded).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "version": "Version4",
            "iban": "FI2912203500657875",
            "amount": "12.50",
            "reference": "559582243294671",
            "due_date": "2024-03-15",
        })
    );
    let parsed: DecodedBarcode = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, decoded);
}
