use crate::groups::GroupIter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One (question, candidate answer) pair with its precomputed features.
///
/// Token ids and auxiliary counts are produced by an external data-loading
/// stage; this crate only consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Question token ids, variable length.
    pub question_ids: Vec<u32>,
    /// Candidate answer token ids, variable length.
    pub answer_ids: Vec<u32>,
    /// Count of question words occurring in the answer.
    pub word_count: f32,
    /// Idf-weighted variant of `word_count`.
    pub weighted_word_count: f32,
    /// Question length as a float feature.
    pub question_len: f32,
    /// Answer length as a float feature.
    pub answer_len: f32,
    /// Binary relevance label, 1 for a correct answer.
    pub label: u32,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Group sizes cover {covered} examples but the dataset has {total}")]
    GroupSizeMismatch { covered: usize, total: usize },
    #[error("Group {index} has no candidates")]
    EmptyGroup { index: usize },
}

/// Examples grouped contiguously by question.
///
/// `group_sizes` holds one candidate count per question, in dataset order.
/// Both sequences must be co-derived from the same source: the sizes must sum
/// to the number of examples. Read-only after construction.
#[derive(Debug, Clone)]
pub struct GroupedDataset {
    examples: Vec<Example>,
    group_sizes: Vec<usize>,
}

impl GroupedDataset {
    pub fn new(examples: Vec<Example>, group_sizes: Vec<usize>) -> Result<Self, DatasetError> {
        let covered: usize = group_sizes.iter().sum();
        if covered != examples.len() {
            return Err(DatasetError::GroupSizeMismatch {
                covered,
                total: examples.len(),
            });
        }
        if let Some(index) = group_sizes.iter().position(|&size| size == 0) {
            return Err(DatasetError::EmptyGroup { index });
        }

        Ok(Self {
            examples,
            group_sizes,
        })
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn group_sizes(&self) -> &[usize] {
        &self.group_sizes
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.group_sizes.len()
    }

    /// Fresh single-pass iterator over the question groups.
    pub fn groups(&self) -> GroupIter<'_> {
        GroupIter::new(&self.examples, &self.group_sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(label: u32) -> Example {
        Example {
            question_ids: vec![1, 2],
            answer_ids: vec![3],
            word_count: 0.0,
            weighted_word_count: 0.0,
            question_len: 2.0,
            answer_len: 1.0,
            label,
        }
    }

    #[test]
    fn test_new_accepts_consistent_sizes() {
        let dataset = GroupedDataset::new(vec![example(0), example(1), example(0)], vec![2, 1])
            .expect("sizes sum to the dataset length");

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.group_count(), 2);
    }

    #[test]
    fn test_new_rejects_size_mismatch() {
        let err = GroupedDataset::new(vec![example(0), example(1)], vec![2, 1]).unwrap_err();

        assert_eq!(
            err,
            DatasetError::GroupSizeMismatch {
                covered: 3,
                total: 2
            }
        );
    }

    #[test]
    fn test_new_rejects_empty_group() {
        let err = GroupedDataset::new(vec![example(0), example(1)], vec![2, 0]).unwrap_err();

        assert_eq!(err, DatasetError::EmptyGroup { index: 1 });
    }
}
