//!
//! `sylva-linear` aims to provide pure Rust implementations of linear regression algorithms.
//!
//! ## The Big Picture
//!
//! `sylva-linear` is a crate in the `sylva` workspace, a small toolkit of classical supervised
//! learning algorithms sharing one fit/predict contract.
//!
//! ## Current state
//!
//! `sylva-linear` currently provides an implementation of the following regression algorithms:
//! - Ordinary Least Squares
//!
//! ## Examples
//!
//! ```rust
//! use sylva::prelude::*;
//! use sylva_linear::{LinearRegression, LinearRegressionEstimator};
//! use ndarray::array;
//!
//! let dataset = Dataset::new(array![[0f64], [1.], [2.]], array![1f64, 3., 5.]);
//!
//! let mut estimator = LinearRegressionEstimator::new(LinearRegression::new());
//! estimator.fit(&dataset).unwrap();
//!
//! let r2 = estimator.score(&dataset, |truth, pred| pred.r2(&truth)).unwrap();
//! assert!((r2 - 1.0).abs() < 1e-9);
//! ```

mod error;
mod ols;

pub use error::*;
pub use ols::*;
