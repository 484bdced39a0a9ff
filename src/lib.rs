//! `sylva` is a small toolkit of classical machine learning estimators, built around a CART
//! decision tree.
//!
//! Every estimator follows the same contract: hyperparameters are checked through a
//! [`ParamGuard`], fitted on a [`Dataset`] and produce a model which predicts one value per row of
//! a records matrix. The [`Estimator`] facade wraps this life cycle behind a uniform interface
//! with `fit`, `predict`, `score`, `get_params`, `set_params`, `save` and `load`.
//!
//! The algorithms themselves live in their own crates:
//!
//! * `sylva-trees`: classification and regression trees
//! * `sylva-nn`: k-nearest neighbours
//! * `sylva-bayes`: gaussian and multinomial naive Bayes
//! * `sylva-linear`: ordinary least squares
//! * `sylva-logistic`: binary and one-vs-rest logistic regression
//! * `sylva-preprocessing`: scaling, imputation and encoding
//! * `sylva-datasets`: CSV loading
//!

pub mod dataset;
pub mod error;
pub mod estimator;
pub mod linalg;
mod metrics_classification;
mod metrics_regression;
pub mod param_guard;
pub mod param_map;
pub mod prelude;
pub mod task;
pub mod traits;

#[cfg(feature = "benchmarks")]
pub mod benchmarks;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float};
pub use error::Error;
pub use estimator::{Estimator, EstimatorParams};
pub use param_guard::ParamGuard;
pub use param_map::ParamMap;
pub use task::Task;

/// Common metrics functions for classification and regression
pub mod metrics {
    pub use crate::metrics_classification::Classification;
    pub use crate::metrics_regression::Regression;
}
