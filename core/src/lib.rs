pub mod choice;
pub mod collate;
pub mod dataset;
pub mod evaluator;
pub mod groups;
pub mod ranking;
pub mod report;

use qa_rank_backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Input validation error: {0}")]
    Validation(String),
    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),
    #[error("Batching error: {0}")]
    Collate(#[from] collate::CollateError),
    #[error("Metrics error: {0}")]
    Metrics(#[from] ranking::MetricsError),
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}
