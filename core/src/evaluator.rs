use crate::collate::{Collator, Padding};
use crate::dataset::{Example, GroupedDataset};
use crate::ranking::{compute_map_mrr, ScoredGroup};
use crate::report::{self, Summary};
use crate::EvalError;
use candle::{Device, Tensor};
use qa_rank_backend::{Batch, BackendError, Classifier, ScoringModel, WrapErr};
use std::collections::BTreeMap;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Chunk size for the training-feature pass.
    pub batch_size: usize,
    pub padding: Padding,
    pub device: Device,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            padding: Padding::default(),
            device: Device::Cpu,
        }
    }
}

/// Runs one full evaluation pass per invocation.
///
/// A pass collects pooled features over the training partition, fits the
/// external classifier on them, walks the dev partition question by question
/// recording both model and classifier rankings, and aggregates everything
/// into a flat metric report. Partitions are borrowed immutably and every
/// pass builds fresh iterator state, so repeated invocations (once per
/// training epoch) see identical inputs.
pub struct Evaluator<M: ScoringModel> {
    model: M,
    train: Vec<Example>,
    dev: GroupedDataset,
    collator: Collator,
    batch_size: usize,
}

impl<M: ScoringModel> Evaluator<M> {
    pub fn new(model: M, train: Vec<Example>, dev: GroupedDataset, config: EvalConfig) -> Self {
        Self {
            model,
            train,
            dev,
            collator: Collator::new(config.padding, config.device),
            batch_size: config.batch_size,
        }
    }

    /// One evaluation pass.
    ///
    /// The classifier is refitted on the training features every call, never
    /// cached. Returns the flat report keyed by the `report` constants.
    #[instrument(skip_all)]
    pub fn evaluate<C: Classifier>(
        &self,
        classifier: &mut C,
    ) -> Result<BTreeMap<String, f64>, EvalError> {
        if self.batch_size == 0 {
            return Err(EvalError::Validation(
                "batch size must be positive".to_string(),
            ));
        }
        if self.train.is_empty() {
            return Err(EvalError::Validation(
                "training partition is empty".to_string(),
            ));
        }

        let (features, labels) = self.collect_train_features()?;
        classifier.fit(&features, &labels)?;

        let mut summary = Summary::new();
        let mut model_groups = Vec::with_capacity(self.dev.group_count());
        let mut classifier_groups = Vec::with_capacity(self.dev.group_count());

        for group in self.dev.groups() {
            let batch = self.collator.collate(group)?;
            let output = self.model.forward(&batch)?;

            let loss = self.model.loss(&output.scores, &batch.labels)?;
            summary.observe(report::VALIDATION_LOSS, loss as f64);

            let labels: Vec<u32> = batch.labels.to_vec1().e()?;
            let scores: Vec<f32> = output.scores.to_vec1().e()?;
            model_groups.push(ScoredGroup::new(labels.clone(), scores)?);

            let features = pooled_features(&batch, &output.similarities)?;
            let decisions: Vec<f32> = classifier.decision_function(&features)?.to_vec1().c()?;
            classifier_groups.push(ScoredGroup::new(labels, decisions)?);
        }

        let model_stats = compute_map_mrr(&model_groups)?;
        let classifier_stats = compute_map_mrr(&classifier_groups)?;
        summary.observe(report::VALIDATION_MAP, model_stats.map);
        summary.observe(report::VALIDATION_MRR, model_stats.mrr);
        summary.observe(report::VALIDATION_SVM_MAP, classifier_stats.map);
        summary.observe(report::VALIDATION_SVM_MRR, classifier_stats.mrr);

        Ok(summary.means())
    }

    /// Pooled feature matrix and label vector over the training partition.
    #[instrument(skip_all)]
    fn collect_train_features(&self) -> Result<(Tensor, Tensor), EvalError> {
        let mut feature_rows = Vec::new();
        let mut label_rows = Vec::new();

        for chunk in self.train.chunks(self.batch_size) {
            let batch = self.collator.collate(chunk)?;
            let output = self.model.forward(&batch)?;
            feature_rows.push(pooled_features(&batch, &output.similarities)?);
            label_rows.push(batch.labels);
        }

        let features = Tensor::cat(&feature_rows, 0).e()?;
        let labels = Tensor::cat(&label_rows, 0).e()?;
        tracing::debug!(
            "collected training features with shape {:?}",
            features.dims()
        );
        Ok((features, labels))
    }
}

/// Per-layer similarity features concatenated with the auxiliary batch
/// fields along the feature axis, `(batch_size, d)`.
fn pooled_features(batch: &Batch, similarities: &[Tensor]) -> Result<Tensor, BackendError> {
    let mut parts: Vec<&Tensor> = Vec::with_capacity(similarities.len() + 4);
    parts.extend(similarities.iter());
    parts.push(&batch.word_counts);
    parts.push(&batch.weighted_word_counts);
    parts.push(&batch.question_lens);
    parts.push(&batch.answer_lens);
    Tensor::cat(&parts, 1).e()
}
