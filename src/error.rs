//! Error types in sylva
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("the number of records ({0}) does not match the number of targets ({1})")]
    MismatchedShapes(usize, usize),
    #[error("not enough samples")]
    NotEnoughSamples,
    #[error("the model has not been fitted")]
    NotFitted,
    #[error("expected records with {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("persistence failed: {0}")]
    Persistence(String),
}
