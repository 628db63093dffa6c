//! Ranking metrics over per-question candidate groups.
//!
//! Pure functions for MAP and MRR with deterministic, stable tie-breaking.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Labels and scores have different lengths: {labels} vs {scores}")]
    LengthMismatch { labels: usize, scores: usize },
    #[error("Score at index {index} is NaN")]
    NanScore { index: usize },
    #[error("No group with a positive label to score")]
    NoScorableGroups,
    #[error("Choice group {index} has {len} candidates, expected exactly 2")]
    NotAPair { index: usize, len: usize },
    #[error("Partition sizes must be positive")]
    EmptyPartition,
}

/// Relevance labels and predicted scores for one question's candidates.
///
/// Index-aligned: position `i` refers to the same candidate in both arrays.
/// Equal lengths and NaN-free scores are enforced at construction, so
/// deserialization has to go through [`ScoredGroup::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredGroup {
    labels: Vec<u32>,
    scores: Vec<f32>,
}

impl ScoredGroup {
    pub fn new(labels: Vec<u32>, scores: Vec<f32>) -> Result<Self, MetricsError> {
        if labels.len() != scores.len() {
            return Err(MetricsError::LengthMismatch {
                labels: labels.len(),
                scores: scores.len(),
            });
        }
        // Check that no score is NaN or the ranks computed below are meaningless
        if let Some(index) = scores.iter().position(|score| score.is_nan()) {
            return Err(MetricsError::NanScore { index });
        }
        Ok(Self { labels, scores })
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn positives(&self) -> usize {
        self.labels.iter().filter(|&&label| label > 0).count()
    }
}

/// Corpus-level ranking aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingStats {
    /// Mean Average Precision over the scorable groups, in [0, 1].
    pub map: f64,
    /// Mean Reciprocal Rank over the scorable groups, in [0, 1].
    pub mrr: f64,
    /// Number of groups that entered the means.
    pub scored_groups: usize,
}

/// Candidate indices ordered by score descending.
///
/// The sort is stable: candidates with equal scores keep their original
/// relative order, so the ranking is bit-for-bit reproducible. Comparison
/// uses the IEEE 754 total order, which is defined for every input; a NaN
/// score sorts ahead of every number instead of breaking the sort.
pub fn rank_descending(scores: &[f32]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    indices
}

/// Average Precision for one group.
///
/// Walking the descending order with 1-indexed position `n`, every positive
/// label adds `positives_so_far / n`; the sum is divided by the group's total
/// positive count. Returns `None` when the group has no positive label, since
/// the metric is undefined there.
pub fn average_precision(group: &ScoredGroup) -> Option<f64> {
    let positives = group.positives();
    if positives == 0 {
        return None;
    }

    let mut hits = 0usize;
    let mut precision_sum = 0.0;
    for (n, &index) in rank_descending(group.scores()).iter().enumerate() {
        if group.labels()[index] > 0 {
            hits += 1;
            precision_sum += hits as f64 / (n + 1) as f64;
        }
    }

    Some(precision_sum / positives as f64)
}

/// Reciprocal Rank for one group.
///
/// `1 / rank` of the first positive label in descending score order, or `0.0`
/// when the group has no positive label.
pub fn reciprocal_rank(group: &ScoredGroup) -> f64 {
    for (n, &index) in rank_descending(group.scores()).iter().enumerate() {
        if group.labels()[index] > 0 {
            return 1.0 / (n + 1) as f64;
        }
    }
    0.0
}

/// MAP and MRR over a corpus of scored groups.
///
/// Groups without a positive label are skipped from both means and reported
/// with a warning; the number of groups that entered the means is exposed on
/// the result. Fails if no group is scorable.
pub fn compute_map_mrr(groups: &[ScoredGroup]) -> Result<RankingStats, MetricsError> {
    let mut ap_sum = 0.0;
    let mut rr_sum = 0.0;
    let mut scored_groups = 0usize;

    for (index, group) in groups.iter().enumerate() {
        match average_precision(group) {
            Some(ap) => {
                ap_sum += ap;
                rr_sum += reciprocal_rank(group);
                scored_groups += 1;
            }
            None => {
                tracing::warn!("group {index} has no positive label, skipping");
            }
        }
    }

    if scored_groups == 0 {
        return Err(MetricsError::NoScorableGroups);
    }

    Ok(RankingStats {
        map: ap_sum / scored_groups as f64,
        mrr: rr_sum / scored_groups as f64,
        scored_groups,
    })
}
