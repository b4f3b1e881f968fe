use afl::fuzz;
use chrono::{Days, NaiveDate};
use fi_virtual_barcode::{
    BarcodeCodec, FinnishReferenceChecksum, IbanChecker, IbanValidator, MonetaryAmount,
    ReferenceValidator, Validator,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(not(feature = "manual_test"))]
fn main() {
    fuzz!(|data: &[u8]| {
        run_raw_fuzz(data);
    });
}

#[cfg(feature = "manual_test")]
fn main() {
    use std::io::{stdin, Read};

    let mut input = vec![];
    stdin().read_to_end(&mut input).unwrap();
    run_raw_fuzz(&input);
}

fn split_bytes_once(input: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(i) = input.iter().position(|b| *b == b',') {
        Some((&input[0..i], &input[i + 1..]))
    } else {
        None
    }
}

/// Input layout: `iban,amount,reference,seed`.
fn run_raw_fuzz(bytes: &[u8]) -> Option<()> {
    // Arbitrary bytes must never panic the decoder.
    if let Ok(raw_record) = std::str::from_utf8(bytes) {
        let _ = BarcodeCodec::default().decode(raw_record);
    }

    let (iban, bytes) = split_bytes_once(bytes)?;
    let (amount, bytes) = split_bytes_once(bytes)?;
    let (reference, rand_seed) = split_bytes_once(bytes)?;

    let iban_str = std::str::from_utf8(iban).ok()?;
    let amount_str = std::str::from_utf8(amount).ok()?;
    let reference_str = std::str::from_utf8(reference).ok()?;

    let mut rng_seed: u64 = 0;
    for i in 0..8 {
        if rand_seed.len() > i {
            rng_seed <<= 8;
            rng_seed += rand_seed[i] as u64;
        }
    }

    let rng = StdRng::seed_from_u64(rng_seed);
    run_fuzz(iban_str, amount_str, reference_str, rng);

    Some(())
}

fn gen_due_date(rng: &mut StdRng) -> Option<NaiveDate> {
    if rng.gen_bool(0.1) {
        return None;
    }
    let start = NaiveDate::from_ymd_opt(1990, 1, 1)?;
    start.checked_add_days(Days::new(rng.gen_range(0..60_000)))
}

fn run_fuzz(iban: &str, amount: &str, reference: &str, mut rng: StdRng) {
    let due_date = gen_due_date(&mut rng);

    #[cfg(feature = "manual_test")]
    {
        println!("IBAN: {:?}", iban);
        println!("Amount: {:?}", amount);
        println!("Reference: {:?}", reference);
        println!("Due date: {:?}", due_date);
    }

    // The boolean checkers must agree with the typed validators on clean input.
    let iban_result = IbanValidator::validate(iban);
    let alphanumeric = iban.chars().all(|c| c.is_alphanumeric());
    if alphanumeric {
        assert_eq!(IbanChecker.is_valid_match(iban), iban_result.is_ok());
    }
    let reference_result = ReferenceValidator::validate(reference);
    if reference.chars().all(|c| c.is_ascii_digit()) {
        assert_eq!(
            FinnishReferenceChecksum.is_valid_match(reference),
            reference_result.is_ok()
        );
    }

    let codec = BarcodeCodec::default();
    let encoded = codec.encode_payment(iban, amount, reference, due_date);

    #[cfg(feature = "manual_test")]
    {
        println!("Encoded: {:?}", encoded);
    }

    if let Ok(record) = encoded {
        let decoded = codec
            .decode(record.as_str())
            .expect("an encoded record must decode");
        assert_eq!(Ok(decoded.iban), iban_result);
        assert_eq!(Ok(decoded.reference), reference_result);
        assert_eq!(Ok(decoded.amount), amount.parse::<MonetaryAmount>());
        assert_eq!(decoded.due_date.map(|d| d.date()), due_date);
    }
}
