//! Common metrics for regression
//!
//! This module implements common comparison metrices for continuous variables.

use ndarray::prelude::*;
use ndarray::Data;

use crate::dataset::{AsSingleTargets, Float};
use crate::error::Result;
use crate::metrics_classification::check_pair;

/// Regression metrices trait for single targets
///
/// The receiver holds the predictions, the argument the ground truth. To evaluate a fitted
/// model, use
/// ```ignore
/// prediction.r2(&ground_truth)?
/// ```
pub trait Regression<F: Float, T: AsSingleTargets<Elem = F>>: AsSingleTargets<Elem = F> {
    /// Mean error between two continuous variables
    fn mean_absolute_error(&self, compare_to: &T) -> Result<F> {
        let (pred, truth) = (self.as_single_targets(), compare_to.as_single_targets());
        check_pair(pred, truth)?;

        Ok((&pred - &truth).mapv(|x| x.abs()).sum() / F::cast(pred.len()))
    }

    /// Mean squared error between two continuous variables
    fn mean_squared_error(&self, compare_to: &T) -> Result<F> {
        let (pred, truth) = (self.as_single_targets(), compare_to.as_single_targets());
        check_pair(pred, truth)?;

        Ok((&pred - &truth).mapv(|x| x * x).sum() / F::cast(pred.len()))
    }

    /// Square root of the mean squared error
    fn root_mean_squared_error(&self, compare_to: &T) -> Result<F> {
        self.mean_squared_error(compare_to).map(|x| x.sqrt())
    }

    /// R squared coefficient, is the proportion of the variance in the dependent variable that is
    /// predictable from the independent variable.
    ///
    /// Returns zero if the ground truth is constant.
    // r2 = 1 - sum((pred_i - y_i)^2)/sum((mean_y - y_i)^2)
    fn r2(&self, compare_to: &T) -> Result<F> {
        let (pred, truth) = (self.as_single_targets(), compare_to.as_single_targets());
        check_pair(pred, truth)?;

        let mean = truth.sum() / F::cast(truth.len());
        let ss_res = (&truth - &pred).mapv(|x| x * x).sum();
        let ss_tot = truth.mapv(|x| (x - mean) * (x - mean)).sum();

        if ss_tot == F::zero() {
            return Ok(F::zero());
        }
        Ok(F::one() - ss_res / ss_tot)
    }
}

impl<F: Float, D: Data<Elem = F>, T: AsSingleTargets<Elem = F>> Regression<F, T>
    for ArrayBase<D, Ix1>
{
}
