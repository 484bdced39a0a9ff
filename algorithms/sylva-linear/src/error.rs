//! An error when modeling a Linear algorithm
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinearError>;

/// An error when modeling a Linear algorithm
#[derive(Error, Debug, Clone)]
pub enum LinearError {
    #[error(transparent)]
    BaseCrate(#[from] sylva::Error),
    #[error("At least one sample needed")]
    NotEnoughSamples,
}
