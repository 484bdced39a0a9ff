//! Error definitions for preprocessing
use thiserror::Error;
pub type Result<T> = std::result::Result<T, PreprocessingError>;

#[derive(Error, Debug, Clone)]
pub enum PreprocessingError {
    #[error("minimum value for MinMax scaler cannot be greater than the maximum")]
    FlippedMinMaxRange,
    #[error("labels must be non-negative integers, got {0}")]
    InvalidLabel(f64),
    #[error(transparent)]
    BaseCrate(#[from] sylva::Error),
}
