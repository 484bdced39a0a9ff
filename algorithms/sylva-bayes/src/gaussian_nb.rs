use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix2, Zip};
use serde::{Deserialize, Serialize};
use sylva::dataset::{AsSingleTargets, DatasetBase};
use sylva::traits::{FeatureDim, Fit, PredictInplace};
use sylva::Float;
use tracing::debug;

use crate::base_nb::{group_by_class, NaiveBayes};
use crate::error::{NaiveBayesError, Result};
use crate::hyperparams::{GaussianNbParams, GaussianNbValidParams};

impl<F, D, T> Fit<ArrayBase<D, Ix2>, T, NaiveBayesError> for GaussianNbValidParams<F>
where
    F: Float,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = F>,
{
    type Object = GaussianNb<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.check_shapes()?;

        let x = dataset.records();
        let (classes, class_rows) = group_by_class(dataset.as_single_targets());
        if classes.is_empty() {
            return Err(sylva::Error::NotEnoughSamples.into());
        }

        let nsamples = class_rows.iter().map(Vec::len).sum::<usize>();
        let shape = (classes.len(), x.ncols());
        let (mut theta, mut sigma) = (Array2::zeros(shape), Array2::zeros(shape));
        let mut priors = Array1::zeros(classes.len());

        for (idx, rows) in class_rows.iter().enumerate() {
            // We filter for records that correspond to the current class
            let xclass = x.select(Axis(0), rows);
            let mean = xclass
                .mean_axis(Axis(0))
                .ok_or(sylva::Error::NotEnoughSamples)?;
            let var = xclass.var_axis(Axis(0), F::zero());

            theta.row_mut(idx).assign(&mean);
            sigma
                .row_mut(idx)
                .assign(&var.mapv(|v| v + self.var_smoothing()));
            priors[idx] = F::cast(rows.len()) / F::cast(nsamples);
        }

        debug!(
            classes = classes.len(),
            nsamples, "fitted gaussian naive bayes"
        );

        Ok(GaussianNb {
            classes,
            priors,
            theta,
            sigma,
        })
    }
}

/// Fitted Gaussian Naive Bayes classifier.
///
/// See [GaussianNbParams] for more information on the hyper-parameters.
///
/// # Model assumptions
///
/// The family of Naive Bayes classifiers assume independence between variables. They do not model
/// moments between variables and lack therefore in modelling capability. The advantage is a linear
/// fitting time with maximum-likelihood training in a closed form.
///
/// Every feature of a class is modelled as a normal distribution with the mean and (population)
/// variance of that feature among the samples of the class. The predicted class maximizes
///
/// `ln(prior) + sum_j [ -ln(2 pi var_j) / 2 - (x_j - mean_j)^2 / (2 var_j) ]`
///
/// where the variances include the smoothing term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNb<F> {
    classes: Vec<F>,
    priors: Array1<F>,
    theta: Array2<F>,
    sigma: Array2<F>,
}

impl<F: Float> GaussianNb<F> {
    /// Construct a new set of hyperparameters
    pub fn params() -> GaussianNbParams<F> {
        GaussianNbParams::new()
    }

    /// Fraction of training samples in every class
    pub fn priors(&self) -> &Array1<F> {
        &self.priors
    }

    /// Per-class feature means, one row per class
    pub fn means(&self) -> &Array2<F> {
        &self.theta
    }

    /// Per-class feature variances including the smoothing term, one row per class
    pub fn variances(&self) -> &Array2<F> {
        &self.sigma
    }
}

impl<F: Float> NaiveBayes<F> for GaussianNb<F> {
    fn classes(&self) -> &[F] {
        &self.classes
    }

    fn joint_log_likelihood(&self, x: ArrayView2<F>) -> Array2<F> {
        let half = F::cast(0.5);
        let two_pi = F::cast(2. * std::f64::consts::PI);
        let mut jll = Array2::zeros((x.nrows(), self.classes.len()));

        for (idx, mut column) in jll.columns_mut().into_iter().enumerate() {
            let (mean, var) = (self.theta.row(idx), self.sigma.row(idx));
            let log_prior = self.priors[idx].ln();
            let norm = var.iter().map(|&v| (two_pi * v).ln()).sum::<F>() * half;

            for (row, out) in x.rows().into_iter().zip(column.iter_mut()) {
                let deviation = Zip::from(&row)
                    .and(&mean)
                    .and(&var)
                    .fold(F::zero(), |acc, &xj, &mu, &v| {
                        acc + (xj - mu) * (xj - mu) / (v + v)
                    });

                *out = log_prior - norm - deviation;
            }
        }

        jll
    }
}

impl<F: Float, D> PredictInplace<ArrayBase<D, Ix2>, Array1<F>> for GaussianNb<F>
where
    D: Data<Elem = F>,
{
    // Thin wrapper around the corresponding method of NaiveBayes
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.ncols(),
            self.theta.ncols(),
            "The number of features must match the number of features seen during fitting."
        );
        NaiveBayes::predict_inplace(self, x, y);
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float> FeatureDim for GaussianNb<F> {
    fn nfeatures(&self) -> usize {
        self.theta.ncols()
    }
}
