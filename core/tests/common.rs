use candle::Tensor;
use qa_rank_backend::{BackendError, Batch, Classifier, ModelOutput, ScoringModel, WrapErr};
use qa_rank_core::dataset::{Example, GroupedDataset};
use std::cell::Cell;
use std::rc::Rc;

/// Deterministic stand-in model: scores every example by its weighted word
/// count and exposes the word count and question length as two similarity
/// columns.
pub struct CountingModel {
    forward_calls: Rc<Cell<usize>>,
}

impl CountingModel {
    pub fn new() -> Self {
        Self {
            forward_calls: Rc::new(Cell::new(0)),
        }
    }

    /// Shared handle to the forward-call counter, to inspect after the model
    /// moves into an evaluator.
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.forward_calls)
    }
}

impl ScoringModel for CountingModel {
    fn forward(&self, batch: &Batch) -> Result<ModelOutput, BackendError> {
        self.forward_calls.set(self.forward_calls.get() + 1);

        let scores = batch.weighted_word_counts.squeeze(1).e()?;
        let similarities = vec![batch.word_counts.clone(), batch.question_lens.clone()];
        Ok(ModelOutput {
            scores,
            similarities,
        })
    }
}

/// Simulates a diverged model: every forward pass scores NaN.
pub struct DivergedModel;

impl ScoringModel for DivergedModel {
    fn forward(&self, batch: &Batch) -> Result<ModelOutput, BackendError> {
        let scores =
            Tensor::from_vec(vec![f32::NAN; batch.len()], batch.len(), batch.device()).e()?;
        Ok(ModelOutput {
            scores,
            similarities: vec![batch.word_counts.clone()],
        })
    }
}

/// Records the shape it was fitted on and ranks by the first feature column.
pub struct FirstColumnClassifier {
    pub fitted_shape: Option<(usize, usize)>,
}

impl FirstColumnClassifier {
    pub fn new() -> Self {
        Self { fitted_shape: None }
    }
}

impl Classifier for FirstColumnClassifier {
    fn fit(&mut self, features: &Tensor, labels: &Tensor) -> Result<(), BackendError> {
        let (rows, cols) = features.dims2().c()?;
        let label_count = labels.dims1().c()?;
        if label_count != rows {
            return Err(BackendError::Classifier(format!(
                "{rows} feature rows but {label_count} labels"
            )));
        }
        self.fitted_shape = Some((rows, cols));
        Ok(())
    }

    fn decision_function(&self, features: &Tensor) -> Result<Tensor, BackendError> {
        features.narrow(1, 0, 1).c()?.squeeze(1).c()
    }
}

/// An example whose model score and first feature column both equal
/// `word_count`.
pub fn example(word_count: f32, label: u32) -> Example {
    Example {
        question_ids: vec![1, 2, 3],
        answer_ids: vec![4, 5],
        word_count,
        weighted_word_count: word_count,
        question_len: 3.0,
        answer_len: 2.0,
        label,
    }
}

pub fn train_examples(n: usize) -> Vec<Example> {
    (0..n)
        .map(|i| example(i as f32 + 1.0, (i % 2) as u32))
        .collect()
}

/// Dev partition where every group ranks its single positive candidate
/// first, for both the model scores and the classifier decisions.
pub fn perfect_dev(groups: usize, group_size: usize) -> GroupedDataset {
    let mut examples = Vec::with_capacity(groups * group_size);
    let mut sizes = Vec::with_capacity(groups);

    for _ in 0..groups {
        for i in 0..group_size {
            let label = u32::from(i == 0);
            examples.push(example((group_size - i) as f32, label));
        }
        sizes.push(group_size);
    }

    GroupedDataset::new(examples, sizes).expect("consistent by construction")
}
