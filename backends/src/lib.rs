use candle::{DType, Tensor};
use thiserror::Error;

/// Padded, device-resident arrays for one evaluation step.
///
/// The leading dimension of every field is the batch size. A batch is built
/// once, consumed by a [`ScoringModel`] forward pass and then dropped; all of
/// its tensors live on the same device.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Question token ids, `(batch_size, max_question_len)`, `U32`.
    pub question_ids: Tensor,
    /// Candidate answer token ids, `(batch_size, max_answer_len)`, `U32`.
    pub answer_ids: Tensor,
    /// Question words occurring in the answer, `(batch_size, 1)`, `F32`.
    pub word_counts: Tensor,
    /// Idf-weighted word counts, `(batch_size, 1)`, `F32`.
    pub weighted_word_counts: Tensor,
    /// Question lengths as float features, `(batch_size, 1)`, `F32`.
    pub question_lens: Tensor,
    /// Answer lengths as float features, `(batch_size, 1)`, `F32`.
    pub answer_lens: Tensor,
    /// Binary relevance labels, `(batch_size,)`, `U32`.
    pub labels: Tensor,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn device(&self) -> &candle::Device {
        self.labels.device()
    }
}

/// Model outputs for one batch.
#[derive(Debug)]
pub struct ModelOutput {
    /// Relevance logit per example, `(batch_size,)`, `F32`.
    pub scores: Tensor,
    /// Ordered per-layer similarity features, each `(batch_size, k)`, `F32`.
    pub similarities: Vec<Tensor>,
}

/// Scoring model invoked once per batch during an evaluation pass.
pub trait ScoringModel {
    fn forward(&self, batch: &Batch) -> Result<ModelOutput, BackendError>;

    /// Mean sigmoid cross-entropy of `scores` against binary `labels`.
    fn loss(&self, scores: &Tensor, labels: &Tensor) -> Result<f32, BackendError> {
        let targets = labels.to_dtype(DType::F32).e()?;
        let loss = candle_nn::loss::binary_cross_entropy_with_logit(scores, &targets).e()?;
        loss.to_scalar::<f32>().e()
    }
}

/// Externally-trained linear classifier used for the re-ranking pass.
///
/// `features` is a `(n, d)` matrix with one row per example; `labels` is the
/// parallel `(n,)` binary vector. The training algorithm itself lives outside
/// this crate.
pub trait Classifier {
    fn fit(&mut self, features: &Tensor, labels: &Tensor) -> Result<(), BackendError>;

    fn decision_function(&self, features: &Tensor) -> Result<Tensor, BackendError>;
}

#[derive(Debug, Error, Clone)]
pub enum BackendError {
    #[error("{0}")]
    Inference(String),
    #[error("Classifier error: {0}")]
    Classifier(String),
}

pub trait WrapErr<O> {
    fn e(self) -> Result<O, BackendError>;
    fn c(self) -> Result<O, BackendError>;
}

impl<O> WrapErr<O> for Result<O, candle::Error> {
    fn e(self) -> Result<O, BackendError> {
        self.map_err(|e| BackendError::Inference(e.to_string()))
    }
    fn c(self) -> Result<O, BackendError> {
        self.map_err(|e| BackendError::Classifier(e.to_string()))
    }
}
