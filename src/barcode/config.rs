use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DefaultOnNull;

use crate::barcode::BarcodeCodec;
use crate::due_date::DEFAULT_CENTURY;
use crate::error::CreateCodecError;
use crate::observability::labels::Labels;

const MIN_CENTURY: u16 = 1900;
const MAX_CENTURY: u16 = 9900;

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BarcodeConfig {
    /// First year of the window two-digit due date years are read in.
    #[serde(default = "default_century")]
    pub century: u16,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub labels: Labels,
}

fn default_century() -> u16 {
    DEFAULT_CENTURY
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeConfig {
    pub fn new() -> Self {
        Self {
            century: DEFAULT_CENTURY,
            labels: Labels::default(),
        }
    }

    pub fn century(&self, century: u16) -> Self {
        self.mutate_clone(|x| x.century = century)
    }

    pub fn labels(&self, labels: Labels) -> Self {
        self.mutate_clone(|x| x.labels = labels)
    }

    pub fn validate(&self) -> Result<(), CreateCodecError> {
        if self.century % 100 != 0 || !(MIN_CENTURY..=MAX_CENTURY).contains(&self.century) {
            return Err(CreateCodecError::InvalidCentury(self.century));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<BarcodeCodec, CreateCodecError> {
        BarcodeCodec::new(self)
    }

    fn mutate_clone(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        modify(&mut clone);
        clone
    }
}
