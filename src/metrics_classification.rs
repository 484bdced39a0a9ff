//! Common metrics for performance evaluation of classifiers
//!
//! Labels are stored as integral floats. Before comparing, every value is truncated towards
//! zero, so that `0.9` and `0.0` count as the same class. The positive class for precision and
//! recall is the label `1`.
use ndarray::prelude::*;
use ndarray::Data;

use crate::dataset::{AsSingleTargets, Float};
use crate::error::{Error, Result};

const PROBABILITY_EPS: f64 = 1e-15;

/// Check that prediction and ground truth are aligned and non-empty
pub(crate) fn check_pair<F>(
    prediction: ArrayView1<'_, F>,
    ground_truth: ArrayView1<'_, F>,
) -> Result<()> {
    if prediction.len() != ground_truth.len() {
        return Err(Error::MismatchedShapes(ground_truth.len(), prediction.len()));
    }
    if prediction.is_empty() {
        return Err(Error::NotEnoughSamples);
    }

    Ok(())
}

fn is_positive<F: Float>(x: F) -> bool {
    x.trunc() == F::one()
}

/// Classification metrics trait
///
/// Implemented for predictions stored in one-dimensional arrays. The ground truth is anything
/// with a single target per sample, for example another array or a dataset.
///
/// ```ignore
/// let accuracy = prediction.accuracy(&dataset)?;
/// ```
pub trait Classification<F: Float, T: AsSingleTargets<Elem = F>>:
    AsSingleTargets<Elem = F>
{
    /// Fraction of samples whose predicted class equals the true class
    fn accuracy(&self, compare_to: &T) -> Result<F> {
        let (pred, truth) = (self.as_single_targets(), compare_to.as_single_targets());
        check_pair(pred.view(), truth.view())?;

        let correct = pred
            .iter()
            .zip(truth.iter())
            .filter(|(p, t)| p.trunc() == t.trunc())
            .count();

        Ok(F::cast(correct) / F::cast(pred.len()))
    }

    /// True positives among all positive predictions, zero if nothing was predicted positive
    fn precision(&self, compare_to: &T) -> Result<F> {
        let (pred, truth) = (self.as_single_targets(), compare_to.as_single_targets());
        check_pair(pred.view(), truth.view())?;

        let (mut tp, mut fp) = (0usize, 0usize);
        for (p, t) in pred.iter().zip(truth.iter()) {
            if is_positive(*p) {
                if is_positive(*t) {
                    tp += 1;
                } else {
                    fp += 1;
                }
            }
        }

        if tp + fp == 0 {
            return Ok(F::zero());
        }
        Ok(F::cast(tp) / F::cast(tp + fp))
    }

    /// True positives among all positive samples, zero if there are no positive samples
    fn recall(&self, compare_to: &T) -> Result<F> {
        let (pred, truth) = (self.as_single_targets(), compare_to.as_single_targets());
        check_pair(pred.view(), truth.view())?;

        let (mut tp, mut fn_) = (0usize, 0usize);
        for (p, t) in pred.iter().zip(truth.iter()) {
            if is_positive(*t) {
                if is_positive(*p) {
                    tp += 1;
                } else {
                    fn_ += 1;
                }
            }
        }

        if tp + fn_ == 0 {
            return Ok(F::zero());
        }
        Ok(F::cast(tp) / F::cast(tp + fn_))
    }

    /// Mean binary cross entropy of predicted probabilities
    ///
    /// Probabilities are clipped to `[1e-15, 1 - 1e-15]` to keep the logarithm finite.
    fn cross_entropy(&self, compare_to: &T) -> Result<F> {
        let (pred, truth) = (self.as_single_targets(), compare_to.as_single_targets());
        check_pair(pred.view(), truth.view())?;

        let eps = F::cast(PROBABILITY_EPS);
        let loss = pred
            .iter()
            .zip(truth.iter())
            .map(|(p, t)| {
                let p = p.max(eps).min(F::one() - eps);
                if is_positive(*t) {
                    -p.ln()
                } else {
                    -(F::one() - p).ln()
                }
            })
            .sum::<F>();

        Ok(loss / F::cast(pred.len()))
    }
}

impl<F: Float, D: Data<Elem = F>, T: AsSingleTargets<Elem = F>> Classification<F, T>
    for ArrayBase<D, Ix1>
{
}

#[cfg(test)]
mod tests {
    use super::Classification;
    use crate::dataset::Dataset;
    use crate::error::{Error, Result};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_accuracy() -> Result<()> {
        let truth = array![0., 1., 2., 1., 0.];
        let pred = array![0., 1., 1., 1., 2.];

        assert_abs_diff_eq!(pred.accuracy(&truth)?, 0.6);
        // labels are compared as integers
        assert_abs_diff_eq!(array![0.4, 1.7].accuracy(&array![0., 1.])?, 1.0);

        Ok(())
    }

    #[test]
    fn test_precision_recall() -> Result<()> {
        let truth = array![1., 1., 0., 0., 1.];
        let pred = array![1., 0., 1., 0., 1.];

        assert_abs_diff_eq!(pred.precision(&truth)?, 2. / 3.);
        assert_abs_diff_eq!(pred.recall(&truth)?, 2. / 3.);

        // no positive predictions or samples
        let zeros = array![0., 0., 0.];
        assert_abs_diff_eq!(zeros.precision(&array![1., 0., 1.])?, 0.0);
        assert_abs_diff_eq!(array![1., 0., 1.].recall(&zeros)?, 0.0);

        Ok(())
    }

    #[test]
    fn test_cross_entropy() -> Result<()> {
        let truth = array![1., 0.];
        let prob = array![0.8, 0.1];

        let expected = -(0.8f64.ln() + 0.9f64.ln()) / 2.;
        assert_abs_diff_eq!(prob.cross_entropy(&truth)?, expected, epsilon = 1e-12);

        // certain but wrong predictions stay finite
        let loss = array![0., 1.].cross_entropy(&truth)?;
        assert!(loss.is_finite());
        assert!(loss > 30.);

        Ok(())
    }

    #[test]
    fn test_dataset_as_ground_truth() -> Result<()> {
        let dataset = Dataset::new(array![[0.], [1.], [2.]], array![0., 1., 1.]);

        assert_abs_diff_eq!(array![0., 1., 0.].accuracy(&dataset)?, 2. / 3.);

        Ok(())
    }

    #[test]
    fn test_invalid_inputs() {
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(matches!(empty.accuracy(&empty), Err(Error::NotEnoughSamples)));
        assert!(matches!(
            array![1., 0.].recall(&array![1.]),
            Err(Error::MismatchedShapes(1, 2))
        ));
        assert!(matches!(
            array![0.5].cross_entropy(&array![1., 0.]),
            Err(Error::MismatchedShapes(2, 1))
        ));
    }
}
