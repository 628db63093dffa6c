//! Metric report aggregation.

use std::collections::BTreeMap;

pub const VALIDATION_LOSS: &str = "validation/loss";
pub const VALIDATION_MAP: &str = "validation/map";
pub const VALIDATION_MRR: &str = "validation/mrr";
pub const VALIDATION_SVM_MAP: &str = "validation/svm_map";
pub const VALIDATION_SVM_MRR: &str = "validation/svm_mrr";

/// Keyed mean accumulator for scalar observations.
///
/// Collects per-step values during an evaluation pass and emits the mean per
/// key as the flat report consumed by the surrounding training framework.
#[derive(Debug, Default)]
pub struct Summary {
    entries: BTreeMap<String, Accumulator>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, key: &str, value: f64) {
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.sum += value;
        entry.count += 1;
    }

    pub fn means(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|(key, accumulator)| (key.clone(), accumulator.sum / accumulator.count as f64))
            .collect()
    }
}
