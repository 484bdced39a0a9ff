use thiserror::Error;

/// Simplified `Result` using [`NaiveBayesError`](crate::NaiveBayesError) as error type
pub type Result<T> = std::result::Result<T, NaiveBayesError>;

/// Error variants from hyper-parameter construction or model estimation
#[derive(Error, Debug, Clone)]
pub enum NaiveBayesError {
    /// Invalid smoothing parameter
    #[error("invalid smoothing parameter {0}")]
    InvalidSmoothing(f64),
    #[error(transparent)]
    BaseCrate(#[from] sylva::Error),
}
