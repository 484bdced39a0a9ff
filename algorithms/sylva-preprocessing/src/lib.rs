//! # Preprocessing
//! ## The Big Picture
//!
//! `sylva-preprocessing` is a crate in the `sylva` workspace, a small toolkit of classical
//! supervised learning algorithms sharing one fit/predict contract.
//!
//! ## Current state
//! `sylva-preprocessing` provides a pure Rust implementation of:
//! * Min-max and standard scaling: [`LinearScaler`](linear_scaling::LinearScaler)
//! * Replacing missing values: [`Imputer`](imputation::Imputer)
//! * Dropping observations with missing values: [`drop_nan`](imputation::drop_nan)
//! * One-hot encoding of labels: [`one_hot`](encoding::one_hot)
//!
//! Scalers and imputers learn their statistics with [`Fit`](sylva::traits::Fit) and apply them
//! with [`Transformer`](sylva::traits::Transformer), so that a test set is transformed with the
//! statistics of the training set.

pub mod encoding;
mod error;
pub mod imputation;
pub mod linear_scaling;

pub use error::{PreprocessingError, Result};
