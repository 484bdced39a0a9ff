//! # Logistic Regression
//!
//! ## The Big Picture
//!
//! `sylva-logistic` is a crate in the `sylva` workspace, a small toolkit of classical supervised
//! learning algorithms sharing one fit/predict contract.
//!
//! ## Current state
//! `sylva-logistic` provides a pure Rust implementation of a two class [logistic regression
//! model](LogisticRegression) and of a [multiclass model](MultiLogisticRegression) which trains
//! one two class model per label (one-vs-rest).
//!
//! Both are trained with full-batch gradient descent: a column of ones is prepended to the
//! records and the parameters start at zero. Every iteration moves them against the gradient of
//! the mean log loss, scaled by the learning rate.
//!
//! ## Example
//!
//! ```rust
//! use sylva::prelude::*;
//! use sylva_logistic::LogisticRegression;
//! use ndarray::array;
//!
//! let dataset = Dataset::new(
//!     array![[-3.], [-2.], [-1.], [1.], [2.], [3.]],
//!     array![0., 0., 0., 1., 1., 1.],
//! );
//! let model = LogisticRegression::default().fit(&dataset).unwrap();
//!
//! assert_eq!(
//!     model.predict_classes(dataset.records(), 0.5),
//!     array![0., 0., 0., 1., 1., 1.]
//! );
//! ```
mod error;
mod hyperparams;

use ndarray::{s, Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix1, Ix2};
use serde::{Deserialize, Serialize};
use sylva::dataset::{AsSingleTargets, DatasetBase};
use sylva::linalg::add_bias_column;
use sylva::traits::{FeatureDim, Fit, PredictInplace};
use sylva::Float;
use tracing::debug;

pub use error::{LogisticError, Result};
pub use hyperparams::{
    LogisticRegression, LogisticRegressionEstimator, LogisticRegressionParams,
    LogisticRegressionValidParams, MultiLogisticRegression, MultiLogisticRegressionEstimator,
};

impl<F: Float, D: Data<Elem = F>, T: AsSingleTargets<Elem = F>>
    Fit<ArrayBase<D, Ix2>, T, LogisticError> for LogisticRegressionValidParams<F, Ix1>
{
    type Object = FittedLogisticRegression<F>;

    /// Given a 2-dimensional feature matrix array `x` with shape
    /// (n_samples, n_features) and an array of targets in `{0, 1}` with
    /// shape n_samples, `fit` runs gradient descent on the mean log loss
    /// and returns a `FittedLogisticRegression`.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let (x, y) = validate_data(dataset)?;
        if let Some(&label) = y.iter().find(|&&y| y != F::zero() && y != F::one()) {
            return Err(LogisticError::InvalidLabels(
                label.to_f64().unwrap_or(f64::NAN),
            ));
        }

        let theta = gradient_descent(&x, y.view(), self.learning_rate, self.iterations);
        debug!(
            nsamples = x.nrows(),
            nfeatures = x.ncols() - 1,
            loss = %log_loss(&x.dot(&theta), y.view()),
            "fitted logistic regression"
        );

        Ok(FittedLogisticRegression {
            intercept: theta[0],
            params: theta.slice(s![1..]).to_owned(),
        })
    }
}

impl<F: Float, D: Data<Elem = F>, T: AsSingleTargets<Elem = F>>
    Fit<ArrayBase<D, Ix2>, T, LogisticError> for LogisticRegressionValidParams<F, Ix2>
{
    type Object = MultiFittedLogisticRegression<F>;

    /// Fits one two class model per distinct label, each separating its label from all others.
    /// The labels are kept in ascending order.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let (x, y) = validate_data(dataset)?;
        let classes = sorted_labels(y.view());

        let mut intercept = Array1::zeros(classes.len());
        let mut params = Array2::zeros((x.ncols() - 1, classes.len()));
        for (idx, &class) in classes.iter().enumerate() {
            let binary = y.mapv(|label| if label == class { F::one() } else { F::zero() });
            let theta = gradient_descent(&x, binary.view(), self.learning_rate, self.iterations);

            debug!(
                class = %class,
                loss = %log_loss(&x.dot(&theta), binary.view()),
                "fitted one-vs-rest model"
            );
            intercept[idx] = theta[0];
            params.column_mut(idx).assign(&theta.slice(s![1..]));
        }

        debug!(
            nsamples = x.nrows(),
            nclasses = classes.len(),
            "fitted multiclass logistic regression"
        );

        Ok(MultiFittedLogisticRegression {
            classes,
            intercept,
            params,
        })
    }
}

/// Checks the dataset and returns the records with a leading column of ones and the targets
fn validate_data<F, D, T>(
    dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
) -> Result<(Array2<F>, Array1<F>)>
where
    F: Float,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = F>,
{
    dataset.check_shapes()?;

    let x = dataset.records();
    let y = dataset.as_single_targets();
    if x.nrows() == 0 {
        return Err(sylva::Error::NotEnoughSamples.into());
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(LogisticError::InvalidValues);
    }

    Ok((add_bias_column(x), y.to_owned()))
}

/// Full-batch gradient descent on the mean log loss, starting from zero
///
/// The gradient of the mean log loss is `x^T (sigma(x theta) - y) / n`.
fn gradient_descent<F: Float>(
    x: &Array2<F>,
    y: ArrayView1<F>,
    learning_rate: F,
    iterations: usize,
) -> Array1<F> {
    let n = F::cast(x.nrows());
    let mut theta = Array1::zeros(x.ncols());

    for _ in 0..iterations {
        let residual = x.dot(&theta).mapv_into(logistic) - &y;
        let grad = x.t().dot(&residual) / n;
        theta.scaled_add(-learning_rate, &grad);
    }

    theta
}

/// Distinct labels in ascending order
fn sorted_labels<F: Float>(y: ArrayView1<F>) -> Vec<F> {
    let mut classes = y.to_vec();
    classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    classes.dedup();

    classes
}

/// The logistic function
fn logistic<F: Float>(x: F) -> F {
    F::one() / (F::one() + (-x).exp())
}

/// A numerically stable version of the log of the logistic function.
///
/// Taken from scikit-learn
/// https://github.com/scikit-learn/scikit-learn/blob/0.23.1/sklearn/utils/_logistic_sigmoid.pyx
fn log_logistic<F: Float>(x: F) -> F {
    if x > F::zero() {
        -(F::one() + (-x).exp()).ln()
    } else {
        x - (F::one() + x.exp()).ln()
    }
}

/// Mean log loss of the linear predictions `z` for targets in `{0, 1}`
fn log_loss<F: Float>(z: &Array1<F>, y: ArrayView1<F>) -> F {
    let total = z
        .iter()
        .zip(y.iter())
        .map(|(&z, &y)| y * log_logistic(z) + (F::one() - y) * log_logistic(-z))
        .sum::<F>();

    -total / F::cast(z.len())
}

/// A fitted two class logistic regression
///
/// Predictions through [`Predict`](sylva::traits::Predict) are probabilities of the class `1`,
/// use [`predict_classes`](Self::predict_classes) for hard labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedLogisticRegression<F> {
    intercept: F,
    params: Array1<F>,
}

impl<F: Float> FittedLogisticRegression<F> {
    /// Get the model intercept
    pub fn intercept(&self) -> F {
        self.intercept
    }

    /// Get the model parameters
    pub fn params(&self) -> &Array1<F> {
        &self.params
    }

    /// Given a feature matrix, predict the probabilities that a sample
    /// should be classified as the positive class.
    pub fn predict_probabilities<A: Data<Elem = F>>(&self, x: &ArrayBase<A, Ix2>) -> Array1<F> {
        (x.dot(&self.params) + self.intercept).mapv_into(logistic)
    }

    /// Label every sample `1` if its probability reaches `threshold`, otherwise `0`
    pub fn predict_classes<A: Data<Elem = F>>(
        &self,
        x: &ArrayBase<A, Ix2>,
        threshold: F,
    ) -> Array1<F> {
        self.predict_probabilities(x)
            .mapv_into(|p| if p >= threshold { F::one() } else { F::zero() })
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for FittedLogisticRegression<F>
{
    /// Given a feature matrix, predict the probability of the positive class for every sample
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.params.len(),
            "Number of data features must match the number of features the model was trained with."
        );

        y.assign(&self.predict_probabilities(x));
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float> FeatureDim for FittedLogisticRegression<F> {
    fn nfeatures(&self) -> usize {
        self.params.len()
    }
}

/// A fitted one-vs-rest logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiFittedLogisticRegression<F> {
    classes: Vec<F>,
    intercept: Array1<F>,
    params: Array2<F>,
}

impl<F: Float> MultiFittedLogisticRegression<F> {
    /// The labels seen during fitting, in ascending order
    pub fn classes(&self) -> &[F] {
        &self.classes
    }

    /// One intercept per class
    pub fn intercept(&self) -> &Array1<F> {
        &self.intercept
    }

    /// Parameters with one column per class
    pub fn params(&self) -> &Array2<F> {
        &self.params
    }

    /// Probability of every class reported by its own two class model
    ///
    /// The columns follow [`classes`](Self::classes). Each model is fitted independently, so rows
    /// do not sum to one.
    pub fn predict_probabilities<A: Data<Elem = F>>(&self, x: &ArrayBase<A, Ix2>) -> Array2<F> {
        (x.dot(&self.params) + &self.intercept).mapv_into(logistic)
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for MultiFittedLogisticRegression<F>
{
    /// Predict the label whose model reports the highest probability, the smallest label wins ties
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.params.nrows(),
            "Number of data features must match the number of features the model was trained with."
        );

        let probabilities = self.predict_probabilities(x);
        for (row, target) in probabilities.axis_iter(Axis(0)).zip(y.iter_mut()) {
            let (best, _) = row.iter().enumerate().fold(
                (0, F::neg_infinity()),
                |(best, best_prob), (idx, &prob)| {
                    if prob > best_prob {
                        (idx, prob)
                    } else {
                        (best, best_prob)
                    }
                },
            );
            *target = self.classes[best];
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float> FeatureDim for MultiFittedLogisticRegression<F> {
    fn nfeatures(&self) -> usize {
        self.params.nrows()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sylva::prelude::*;

    #[test]
    fn test_logistic() {
        assert_abs_diff_eq!(logistic(0.), 0.5);
        assert_abs_diff_eq!(logistic(2.) + logistic(-2.), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(log_logistic(3.), logistic(3f64).ln(), epsilon = 1e-12);
        // stays finite where the naive form underflows
        assert_abs_diff_eq!(log_logistic(-800f64), -800.0);
    }

    #[test]
    fn test_log_loss() {
        let z = array![0., 0.];
        assert_abs_diff_eq!(log_loss(&z, array![0., 1.].view()), 2f64.ln());

        let z = array![2., -1.];
        let expected = -(logistic(2f64).ln() + logistic(1f64).ln()) / 2.;
        assert_abs_diff_eq!(
            log_loss(&z, array![1., 0.].view()),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn first_step_follows_mean_gradient() {
        // from zero all probabilities are 0.5, so the gradient is the mean of x^T (0.5 - y)
        let x = add_bias_column(&array![[1.], [3.]]);
        let theta = gradient_descent(&x, array![1., 0.].view(), 1.0, 1);

        assert_abs_diff_eq!(theta, array![0., -0.5], epsilon = 1e-12);
    }

    #[test]
    fn symmetric_data_has_zero_intercept() {
        let dataset = Dataset::new(
            array![[-3.], [-2.], [-1.], [1.], [2.], [3.]],
            array![0., 0., 0., 1., 1., 1.],
        );
        let model = LogisticRegression::default().fit(&dataset).unwrap();

        assert_abs_diff_eq!(model.intercept(), 0.0, epsilon = 1e-10);
        assert!(model.params()[0] > 1.0);
        assert_eq!(
            &model.predict_classes(dataset.records(), 0.5),
            dataset.targets()
        );

        let probabilities = model.predict(dataset.records());
        assert!(probabilities.iter().all(|p| *p > 0. && *p < 1.));
        assert_abs_diff_eq!(probabilities[0] + probabilities[5], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn simple_example_1() {
        let dataset = Dataset::new(
            array![[-1.0], [-0.01], [0.01], [1.0]],
            array![0., 0., 1., 1.],
        );
        let model = LogisticRegression::default().fit(&dataset).unwrap();

        assert_abs_diff_eq!(model.intercept(), 0.0, epsilon = 1e-10);
        assert!(model.params()[0] > 0.);
        assert_eq!(
            &model.predict_classes(dataset.records(), 0.5),
            dataset.targets()
        );
    }

    #[test]
    fn works_with_f32() {
        let dataset = Dataset::new(
            array![[-2f32], [-1.], [1.], [2.]],
            array![0f32, 0., 1., 1.],
        );
        let model = LogisticRegression::default().fit(&dataset).unwrap();

        assert_eq!(
            model.predict_classes(&array![[-1.5f32], [1.5]], 0.5),
            array![0f32, 1.]
        );
    }

    #[test]
    fn threshold_moves_decision() {
        let dataset = Dataset::new(array![[-1.], [1.]], array![0., 1.]);
        let model = LogisticRegression::default().fit(&dataset).unwrap();

        let x = array![[0.5]];
        assert_eq!(model.predict_classes(&x, 0.5), array![1.]);
        assert_eq!(model.predict_classes(&x, 0.99), array![0.]);
    }

    #[test]
    fn rejects_non_binary_labels() {
        let dataset = Dataset::new(array![[0.], [1.]], array![0., 2.]);

        assert!(matches!(
            LogisticRegression::default().fit(&dataset),
            Err(LogisticError::InvalidLabels(l)) if l == 2.
        ));
    }

    #[test]
    fn rejects_mismatching_x_y() {
        let dataset = Dataset::new(array![[-1.], [0.], [1.]], array![0., 1.]);

        assert!(matches!(
            LogisticRegression::default().fit(&dataset),
            Err(LogisticError::BaseCrate(sylva::Error::MismatchedShapes(3, 2)))
        ));
    }

    #[test]
    fn rejects_inf_values() {
        let infs = [f64::INFINITY, f64::NEG_INFINITY, f64::NAN];
        for inf in &infs {
            let dataset = Dataset::new(array![[-1.], [*inf]], array![0., 1.]);
            assert!(matches!(
                LogisticRegression::default().fit(&dataset),
                Err(LogisticError::InvalidValues)
            ));

            let dataset = Dataset::new(array![[-1.], [1.]], array![*inf, 1.]);
            assert!(matches!(
                MultiLogisticRegression::default().fit(&dataset),
                Err(LogisticError::InvalidValues)
            ));
        }
    }

    #[test]
    fn rejects_empty_dataset() {
        let dataset = Dataset::new(Array2::<f64>::zeros((0, 2)), Array1::zeros(0));

        assert!(matches!(
            LogisticRegression::default().fit(&dataset),
            Err(LogisticError::BaseCrate(sylva::Error::NotEnoughSamples))
        ));
    }

    #[test]
    fn one_vs_rest_separates_clusters() {
        let dataset = Dataset::new(
            array![
                [-5., 0.],
                [-6., 1.],
                [-5., -1.],
                [5., 0.],
                [6., 1.],
                [5., -1.],
                [0., 5.],
                [1., 6.],
                [-1., 5.]
            ],
            array![0., 0., 0., 1., 1., 1., 2., 2., 2.],
        );
        let model = MultiLogisticRegression::default().fit(&dataset).unwrap();

        assert_eq!(model.classes(), &[0., 1., 2.]);
        assert_eq!(model.params().dim(), (2, 3));
        assert_eq!(model.intercept().len(), 3);
        assert_eq!(&model.predict(dataset.records()), dataset.targets());
        assert_eq!(
            model.predict(&array![[-5.5, 0.5], [5.5, -0.5], [0., 6.]]),
            array![0., 1., 2.]
        );
    }

    #[test]
    fn one_vs_rest_keeps_arbitrary_labels() {
        let dataset = Dataset::new(
            array![[-2.], [-1.], [1.], [2.]],
            array![7., 7., 3., 3.],
        );
        let model = MultiLogisticRegression::default().fit(&dataset).unwrap();

        assert_eq!(model.classes(), &[3., 7.]);
        assert_eq!(model.predict(&array![[-3.], [3.]]), array![7., 3.]);
    }

    #[test]
    fn single_class_predicts_that_class() {
        let dataset = Dataset::new(array![[0.], [1.]], array![4., 4.]);
        let model = MultiLogisticRegression::default().fit(&dataset).unwrap();

        assert_eq!(model.predict(&array![[-10.], [10.]]), array![4., 4.]);
    }
}
