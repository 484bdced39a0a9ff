use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix2, Zip};
use serde::{Deserialize, Serialize};
use sylva::dataset::{AsSingleTargets, DatasetBase};
use sylva::traits::{FeatureDim, Fit, PredictInplace};
use sylva::Float;
use tracing::debug;

use crate::base_nb::{group_by_class, NaiveBayes};
use crate::error::{NaiveBayesError, Result};
use crate::hyperparams::{MultinomialNbParams, MultinomialNbValidParams};

impl<F, D, T> Fit<ArrayBase<D, Ix2>, T, NaiveBayesError> for MultinomialNbValidParams<F>
where
    F: Float,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = F>,
{
    type Object = MultinomialNb<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.check_shapes()?;

        let x = dataset.records();
        let (classes, class_rows) = group_by_class(dataset.as_single_targets());
        if classes.is_empty() {
            return Err(sylva::Error::NotEnoughSamples.into());
        }

        let nsamples = class_rows.iter().map(Vec::len).sum::<usize>();
        let nfeatures = x.ncols();
        let mut feature_log_prob = Array2::zeros((classes.len(), nfeatures));
        let mut priors = Array1::zeros(classes.len());

        for (idx, rows) in class_rows.iter().enumerate() {
            // smoothed occurrences of every feature within the class
            let feature_count = x
                .select(Axis(0), rows)
                .sum_axis(Axis(0))
                .mapv(|count| count + self.alpha());
            let total = feature_count.sum();

            feature_log_prob
                .row_mut(idx)
                .assign(&feature_count.mapv(|count| (count / total).ln()));
            priors[idx] = F::cast(rows.len()) / F::cast(nsamples);
        }

        debug!(
            classes = classes.len(),
            nsamples, "fitted multinomial naive bayes"
        );

        Ok(MultinomialNb {
            classes,
            priors,
            feature_log_prob,
        })
    }
}

/// Fitted Multinomial Naive Bayes classifier.
///
/// See [MultinomialNbParams] for more information on the hyper-parameters.
///
/// # Model assumptions
///
/// Features are non-negative occurrence counts, for example word counts in text classification.
/// The probability of feature `j` in a class is estimated from the counts of all samples in that
/// class as `(count_j + alpha) / (sum_k count_k + alpha * n_features)`, and the predicted class
/// maximizes `ln(prior) + sum_j x_j ln(p_j)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb<F> {
    classes: Vec<F>,
    priors: Array1<F>,
    feature_log_prob: Array2<F>,
}

impl<F: Float> MultinomialNb<F> {
    /// Construct a new set of hyperparameters
    pub fn params() -> MultinomialNbParams<F> {
        MultinomialNbParams::new()
    }

    /// Fraction of training samples in every class
    pub fn priors(&self) -> &Array1<F> {
        &self.priors
    }

    /// Log-probabilities of every feature, one row per class
    pub fn feature_log_prob(&self) -> &Array2<F> {
        &self.feature_log_prob
    }
}

impl<F: Float> NaiveBayes<F> for MultinomialNb<F> {
    fn classes(&self) -> &[F] {
        &self.classes
    }

    fn joint_log_likelihood(&self, x: ArrayView2<F>) -> Array2<F> {
        let mut jll = Array2::zeros((x.nrows(), self.classes.len()));

        for (idx, mut column) in jll.columns_mut().into_iter().enumerate() {
            let log_prob = self.feature_log_prob.row(idx);
            let log_prior = self.priors[idx].ln();

            for (row, out) in x.rows().into_iter().zip(column.iter_mut()) {
                // absent features contribute nothing, even with a zero probability
                *out = Zip::from(&row)
                    .and(&log_prob)
                    .fold(log_prior, |acc, &count, &lp| {
                        if count == F::zero() {
                            acc
                        } else {
                            acc + count * lp
                        }
                    });
            }
        }

        jll
    }
}

impl<F: Float, D> PredictInplace<ArrayBase<D, Ix2>, Array1<F>> for MultinomialNb<F>
where
    D: Data<Elem = F>,
{
    // Thin wrapper around the corresponding method of NaiveBayes
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.ncols(),
            self.feature_log_prob.ncols(),
            "The number of features must match the number of features seen during fitting."
        );
        NaiveBayes::predict_inplace(self, x, y);
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float> FeatureDim for MultinomialNb<F> {
    fn nfeatures(&self) -> usize {
        self.feature_log_prob.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::{MultinomialNb, NaiveBayes, Result};
    use sylva::{
        traits::{Fit, Predict},
        Dataset,
    };

    use crate::{MultinomialNbParams, MultinomialNbValidParams};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<MultinomialNb<f64>>();
        has_autotraits::<MultinomialNbParams<f64>>();
        has_autotraits::<MultinomialNbValidParams<f64>>();
    }

    #[test]
    fn test_multinomial_nb() -> Result<()> {
        let x = array![
            [1., 0.],
            [2., 0.],
            [3., 0.],
            [0., 1.],
            [0., 2.],
            [0., 3.]
        ];
        let y = array![1., 1., 1., 2., 2., 2.];

        let data = Dataset::new(x.clone(), y.clone());
        let fitted_clf = MultinomialNb::params().fit(&data)?;

        assert_eq!(fitted_clf.predict(&x), y);
        assert_eq!(fitted_clf.classes(), &[1., 2.]);

        // class 1 counts [6, 0] smoothed to [7, 1] out of 8
        let expected = array![
            [(7f64 / 8.).ln(), (1f64 / 8.).ln()],
            [(1f64 / 8.).ln(), (7f64 / 8.).ln()]
        ];
        assert_abs_diff_eq!(fitted_clf.feature_log_prob(), &expected, epsilon = 1e-12);

        let jll = fitted_clf.joint_log_likelihood(array![[2., 1.]].view());
        let class_one = 0.5f64.ln() + 2. * (7f64 / 8.).ln() + (1f64 / 8.).ln();
        assert_abs_diff_eq!(jll[(0, 0)], class_one, epsilon = 1e-12);

        let proba = fitted_clf.predict_proba(array![[2., 1.], [0., 0.]].view());
        assert_abs_diff_eq!(proba.row(0).sum(), 1.0, epsilon = 1e-12);
        assert!(proba[(0, 0)] > proba[(0, 1)]);
        // no counts at all leave only the priors
        assert_abs_diff_eq!(proba.row(1), array![0.5, 0.5], epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn zero_alpha_does_not_poison_absent_features() -> Result<()> {
        let data = Dataset::new(array![[2., 0.], [0., 3.]], array![0., 1.]);
        let model = MultinomialNbParams::new().alpha(0.).fit(&data)?;

        assert_eq!(model.predict(&array![[1., 0.], [0., 1.]]), array![0., 1.]);

        Ok(())
    }

    #[test]
    fn ties_resolve_to_smallest_class() -> Result<()> {
        let data = Dataset::new(array![[1., 1.], [1., 1.]], array![3., 2.]);
        let model = MultinomialNb::params().fit(&data)?;

        assert_eq!(model.predict(&array![[4., 2.]]), array![2.]);

        Ok(())
    }
}
