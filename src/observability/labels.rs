use std::collections::BTreeMap;

use metrics::{IntoLabels, Label};
use serde::{Deserialize, Serialize};

/// Holder of metric labels providing some methods to easily clone and add new labels in it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

pub const NO_LABEL: Labels = Labels(BTreeMap::new());

impl Labels {
    /// Clone the actual [Labels] with additional key-value labels. A key that is already
    /// present takes the new value.
    pub fn clone_with_labels(
        &self,
        additional_labels: &[(impl Into<String> + Clone, impl Into<String> + Clone)],
    ) -> Labels {
        let mut tags = self.0.clone();
        tags.extend(
            additional_labels
                .iter()
                .map(|(key, value)| (key.clone().into(), value.clone().into())),
        );
        Labels(tags)
    }

    pub fn new(labels: &[(impl Into<String> + Clone, impl Into<String> + Clone)]) -> Self {
        NO_LABEL.clone_with_labels(labels)
    }
}

impl IntoLabels for Labels {
    fn into_labels(self) -> Vec<Label> {
        self.0
            .into_iter()
            .map(|(key, value)| Label::new(key, value))
            .collect()
    }
}
