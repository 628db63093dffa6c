//! Accuracy for forced two-choice tasks.

use crate::ranking::{MetricsError, ScoredGroup};
use serde::Serialize;

/// Partition boundaries for a two-choice run.
///
/// The first `dev_size` groups form the dev partition, the rest the test
/// partition. Accuracies are divided by these configured sizes, not by the
/// partition sizes actually observed, so callers must size their datasets to
/// the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSplit {
    pub dev_size: usize,
    pub test_size: usize,
}

impl Default for ChoiceSplit {
    fn default() -> Self {
        Self {
            dev_size: 500,
            test_size: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChoiceAccuracy {
    pub dev_accuracy: f64,
    pub test_accuracy: f64,
}

/// Accuracy of picking the higher-scoring candidate out of two.
///
/// Every group must hold exactly two candidates. The higher-scoring candidate
/// is the system's answer; on an exact score tie the second candidate wins.
/// An answer is correct when its label is positive.
pub fn choice_accuracy(
    groups: &[ScoredGroup],
    split: ChoiceSplit,
) -> Result<ChoiceAccuracy, MetricsError> {
    if split.dev_size == 0 || split.test_size == 0 {
        return Err(MetricsError::EmptyPartition);
    }
    if groups.len() != split.dev_size + split.test_size {
        tracing::warn!(
            "run has {} groups but the split covers {}",
            groups.len(),
            split.dev_size + split.test_size
        );
    }

    let mut dev_correct = 0usize;
    let mut test_correct = 0usize;

    for (index, group) in groups.iter().enumerate() {
        if group.len() != 2 {
            return Err(MetricsError::NotAPair {
                index,
                len: group.len(),
            });
        }

        let chosen = if group.scores()[0] > group.scores()[1] {
            0
        } else {
            1
        };
        if group.labels()[chosen] > 0 {
            if index < split.dev_size {
                dev_correct += 1;
            } else {
                test_correct += 1;
            }
        }
    }

    Ok(ChoiceAccuracy {
        dev_accuracy: dev_correct as f64 / split.dev_size as f64,
        test_accuracy: test_correct as f64 / split.test_size as f64,
    })
}
