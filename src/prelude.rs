//! Sylva prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::dataset::{AsSingleTargets, Dataset, DatasetBase, DatasetView, Float, Records};

#[doc(no_inline)]
pub use crate::estimator::{Estimator, EstimatorParams};

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;

#[doc(no_inline)]
pub use crate::param_map::ParamMap;

#[doc(no_inline)]
pub use crate::metrics_classification::Classification;

#[doc(no_inline)]
pub use crate::metrics_regression::Regression;

#[doc(no_inline)]
pub use crate::task::Task;
