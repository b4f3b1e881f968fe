use crate::error::BarcodeError;
use crate::observability::labels::Labels;
use metrics::{counter, Counter};
use strum::AsRefStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Encode,
    Decode,
}

pub struct CodecMetrics {
    pub encoded: Counter,
    pub decoded: Counter,
    labels: Labels,
}

const OPERATION: &str = "operation";
const FIELD: &str = "field";

impl CodecMetrics {
    pub fn new(labels: &Labels) -> Self {
        CodecMetrics {
            encoded: counter!("barcode.encoded", labels.clone()),
            decoded: counter!("barcode.decoded", labels.clone()),
            labels: labels.clone(),
        }
    }

    pub fn record<T>(&self, operation: Operation, result: &Result<T, BarcodeError>) {
        match (operation, result) {
            (Operation::Encode, Ok(_)) => self.encoded.increment(1),
            (Operation::Decode, Ok(_)) => self.decoded.increment(1),
            (_, Err(err)) => counter!(
                "barcode.rejected",
                self.labels.clone_with_labels(&[
                    (OPERATION, operation.as_ref()),
                    (FIELD, err.field().as_ref()),
                ])
            )
            .increment(1),
        }
    }
}
