use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogisticError>;

#[derive(Error, Debug, Clone)]
pub enum LogisticError {
    #[error(transparent)]
    BaseCrate(#[from] sylva::Error),
    #[error("Binary targets must be either 0 or 1, got {0}")]
    InvalidLabels(f64),
    #[error("Values must be finite and not `Inf`, `-Inf` or `NaN`")]
    InvalidValues,
    #[error("learning_rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),
    #[error("At least one iteration of gradient descent is needed")]
    ZeroIterations,
}
