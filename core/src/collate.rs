use crate::dataset::Example;
use candle::{Device, Tensor};
use qa_rank_backend::Batch;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollateError {
    #[error("Cannot collate an empty batch")]
    EmptyBatch,
    #[error("Length mismatch for {field}: expected {expected}, found {found}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Tensor error: {0}")]
    Tensor(#[from] candle::Error),
}

/// Padding policy for the variable-length token fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// One constant for both token fields.
    Uniform(u32),
    /// A constant per field; `None` exempts that field from padding, in
    /// which case its sequences must already share one length.
    PerField {
        question: Option<u32>,
        answer: Option<u32>,
    },
    /// No padding anywhere: every sequence field must already be uniform.
    Exact,
}

impl Default for Padding {
    fn default() -> Self {
        Padding::Uniform(0)
    }
}

/// Assembles slices of examples into rectangular device-resident batches.
///
/// Token fields are padded to the longest sequence in the batch, each row
/// top-left aligned with the remainder at the padding constant. Scalar fields
/// stack into `(batch_size, 1)` columns. Inputs are never mutated; every
/// tensor is a fresh copy materialized on the target device.
#[derive(Debug, Clone)]
pub struct Collator {
    padding: Padding,
    device: Device,
    span: tracing::Span,
}

impl Collator {
    pub fn new(padding: Padding, device: Device) -> Self {
        Self {
            padding,
            device,
            span: tracing::span!(tracing::Level::TRACE, "collate"),
        }
    }

    pub fn collate(&self, examples: &[Example]) -> Result<Batch, CollateError> {
        let _enter = self.span.enter();

        if examples.is_empty() {
            return Err(CollateError::EmptyBatch);
        }

        let (question_pad, answer_pad) = match self.padding {
            Padding::Uniform(pad) => (Some(pad), Some(pad)),
            Padding::PerField { question, answer } => (question, answer),
            Padding::Exact => (None, None),
        };

        let question_ids =
            self.pad_tokens(examples, "question_ids", |e| &e.question_ids, question_pad)?;
        let answer_ids = self.pad_tokens(examples, "answer_ids", |e| &e.answer_ids, answer_pad)?;

        let word_counts = self.stack_scalars(examples, |e| e.word_count)?;
        let weighted_word_counts = self.stack_scalars(examples, |e| e.weighted_word_count)?;
        let question_lens = self.stack_scalars(examples, |e| e.question_len)?;
        let answer_lens = self.stack_scalars(examples, |e| e.answer_len)?;

        let labels: Vec<u32> = examples.iter().map(|e| e.label).collect();
        let labels = Tensor::from_vec(labels, examples.len(), &self.device)?;

        Ok(Batch {
            question_ids,
            answer_ids,
            word_counts,
            weighted_word_counts,
            question_lens,
            answer_lens,
            labels,
        })
    }

    fn pad_tokens(
        &self,
        examples: &[Example],
        field: &'static str,
        select: impl Fn(&Example) -> &[u32],
        pad: Option<u32>,
    ) -> Result<Tensor, CollateError> {
        let batch_size = examples.len();

        match pad {
            Some(pad) => {
                let max_length = examples
                    .iter()
                    .map(|example| select(example).len())
                    .max()
                    .unwrap_or(0);

                let mut flat = Vec::with_capacity(batch_size * max_length);
                for example in examples {
                    let ids = select(example);
                    flat.extend_from_slice(ids);
                    flat.extend(std::iter::repeat(pad).take(max_length - ids.len()));
                }
                Ok(Tensor::from_vec(
                    flat,
                    (batch_size, max_length),
                    &self.device,
                )?)
            }
            None => {
                let expected = select(&examples[0]).len();

                let mut flat = Vec::with_capacity(batch_size * expected);
                for example in examples {
                    let ids = select(example);
                    if ids.len() != expected {
                        return Err(CollateError::ShapeMismatch {
                            field,
                            expected,
                            found: ids.len(),
                        });
                    }
                    flat.extend_from_slice(ids);
                }
                Ok(Tensor::from_vec(flat, (batch_size, expected), &self.device)?)
            }
        }
    }

    fn stack_scalars(
        &self,
        examples: &[Example],
        select: impl Fn(&Example) -> f32,
    ) -> Result<Tensor, candle::Error> {
        let values: Vec<f32> = examples.iter().map(select).collect();
        Tensor::from_vec(values, (examples.len(), 1), &self.device)
    }
}
