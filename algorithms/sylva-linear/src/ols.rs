//! Ordinary Least Squares
#![allow(non_snake_case)]
use std::marker::PhantomData;

use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use sylva::dataset::{AsSingleTargets, DatasetBase};
use sylva::linalg::{add_bias_column, lstsq};
use sylva::param_map::get_bool;
use sylva::traits::{FeatureDim, Fit, PredictInplace};
use sylva::{Dataset, Estimator, EstimatorParams, Float, ParamMap};

use crate::error::{LinearError, Result};

/// An ordinary least squares linear regression model.
///
/// LinearRegression fits a linear model to minimize the residual sum of
/// squares between the observed targets in the dataset, and the targets
/// predicted by the linear approximation.
///
/// Ordinary least squares regression solves the overconstrainted model
///
/// y = Ax + b
///
/// by finding x and b which minimize the L_2 norm ||y - Ax - b||_2.
///
/// It solves the normal equations `(A^T A) x = A^T y`, where a column of ones is prepended to `A`
/// when an intercept is fitted. Collinear features make `A^T A` singular, which is reported as
/// [`sylva::Error::SingularMatrix`].
///
/// ## Examples
///
/// ```rust
/// use sylva::traits::{Fit, Predict};
/// use sylva::Dataset;
/// use sylva_linear::LinearRegression;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[0f64], [1.], [2.]], array![0f64, 0., 2.]);
/// let model = LinearRegression::default().fit(&dataset).unwrap();
///
/// assert!((model.intercept() + 1. / 3.).abs() < 1e-12);
/// assert!((model.params()[0] - 1.).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression<F> {
    fit_intercept: bool,

    float_marker: PhantomData<F>,
}

/// A fitted linear regression model which can be used for making predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedLinearRegression<F> {
    intercept: F,
    params: Array1<F>,
}

impl<F: Float> Default for LinearRegression<F> {
    fn default() -> Self {
        LinearRegression::new()
    }
}

/// Configure and fit a linear regression model
impl<F: Float> LinearRegression<F> {
    /// Create a default linear regression model.
    /// By default, an intercept will be fitted.
    pub fn new() -> LinearRegression<F> {
        LinearRegression {
            fit_intercept: true,
            float_marker: PhantomData,
        }
    }

    /// Configure the linear regression model to fit an intercept.
    pub fn with_intercept(mut self, intercept: bool) -> Self {
        self.fit_intercept = intercept;
        self
    }

    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }
}

impl<F: Float, D: Data<Elem = F>, T: AsSingleTargets<Elem = F>>
    Fit<ArrayBase<D, Ix2>, T, LinearError> for LinearRegression<F>
{
    type Object = FittedLinearRegression<F>;

    /// Fit a linear regression model given a feature matrix `X` and a target
    /// variable `y`.
    ///
    /// The feature matrix `X` must have shape `(n_samples, n_features)`
    ///
    /// The target variable `y` must have shape `(n_samples)`
    ///
    /// Returns a `FittedLinearRegression` object which contains the fitted
    /// parameters and can be used to `predict` values of the target variable
    /// for new feature values.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.check_shapes()?;

        let X = dataset.records();
        let y = dataset.as_single_targets().to_owned();
        if X.nrows() == 0 {
            return Err(LinearError::NotEnoughSamples);
        }

        let model = if self.fit_intercept {
            let theta = lstsq(&add_bias_column(X), &y)?;

            FittedLinearRegression {
                intercept: theta[0],
                params: theta.slice(s![1..]).to_owned(),
            }
        } else {
            FittedLinearRegression {
                intercept: F::zero(),
                params: lstsq(&X.to_owned(), &y)?,
            }
        };

        debug!(
            nsamples = X.nrows(),
            nfeatures = X.ncols(),
            intercept = %model.intercept,
            "fitted ordinary least squares"
        );

        Ok(model)
    }
}

/// View the fitted parameters and make predictions with a fitted
/// linear regresssion model.
impl<F: Float> FittedLinearRegression<F> {
    /// Get the fitted parameters
    pub fn params(&self) -> &Array1<F> {
        &self.params
    }

    /// Get the fitted intercept, 0. if no intercept was fitted
    pub fn intercept(&self) -> F {
        self.intercept
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for FittedLinearRegression<F>
{
    /// Given an input matrix `X`, with shape `(n_samples, n_features)`,
    /// `predict` returns the target variable according to linear model
    /// learned from the training data distribution.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        *y = x.dot(&self.params) + self.intercept;
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float> FeatureDim for FittedLinearRegression<F> {
    fn nfeatures(&self) -> usize {
        self.params.len()
    }
}

impl<F: Float> EstimatorParams for LinearRegression<F> {
    type Float = F;
    type Object = FittedLinearRegression<F>;
    type Error = LinearError;

    fn fit_dataset(&self, dataset: &Dataset<F>) -> Result<FittedLinearRegression<F>> {
        <Self as Fit<Array2<F>, Array1<F>, LinearError>>::fit(self, dataset)
    }

    fn get_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert(
            "fit_intercept".to_string(),
            Value::from(self.fit_intercept),
        );

        params
    }

    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        if let Some(fit_intercept) = get_bool(params, "fit_intercept")? {
            self.fit_intercept = fit_intercept;
        }

        Ok(())
    }
}

/// An ordinary least squares model behind the uniform estimator interface
pub type LinearRegressionEstimator<F> = Estimator<LinearRegression<F>>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sylva::{traits::Predict, Dataset};

    #[test]
    fn fits_a_line_through_two_dots() {
        let lin_reg = LinearRegression::new();
        let dataset = Dataset::new(array![[0f64], [1.]], array![1., 2.]);
        let model = lin_reg.fit(&dataset).unwrap();
        let result = model.predict(dataset.records());

        assert_abs_diff_eq!(result, &array![1., 2.], epsilon = 1e-12);
    }

    /// When `with_intercept` is set to false, the
    /// fitted line runs through the origin. For a perfect
    /// fit we only need to provide one point.
    #[test]
    fn without_intercept_fits_line_through_origin() {
        let lin_reg = LinearRegression::new().with_intercept(false);
        let dataset = Dataset::new(array![[1.]], array![1.]);
        let model = lin_reg.fit(&dataset).unwrap();
        let result = model.predict(&array![[0.], [1.]]);

        assert_abs_diff_eq!(result, &array![0., 1.], epsilon = 1e-12);
    }

    /// We can't fit a line through two points without fitting the
    /// intercept in general. In this case we should find the solution
    /// that minimizes the squares. Fitting a line without intercept through
    /// the points (-1, 1), (1, 1) has the least-squares solution
    /// f(x) = 0
    #[test]
    fn fits_least_squares_line_through_two_dots() {
        let lin_reg = LinearRegression::new().with_intercept(false);
        let dataset = Dataset::new(array![[-1.], [1.]], array![1., 1.]);
        let model = lin_reg.fit(&dataset).unwrap();
        let result = model.predict(dataset.records());

        assert_abs_diff_eq!(result, &array![0., 0.], epsilon = 1e-12);
    }

    /// We can't fit a line through three points in general
    /// - in this case we should find the solution that minimizes
    /// the squares. Fitting a line with intercept through the
    /// points (0, 0), (1, 0), (2, 2) has the least-squares solution
    /// f(x) = -1./3. + x
    #[test]
    fn fits_least_squares_line_through_three_dots() {
        let lin_reg = LinearRegression::new();
        let dataset = Dataset::new(array![[0.], [1.], [2.]], array![0., 0., 2.]);
        let model = lin_reg.fit(&dataset).unwrap();
        let actual = model.predict(dataset.records());

        assert_abs_diff_eq!(actual, array![-1. / 3., 2. / 3., 5. / 3.], epsilon = 1e-12);
    }

    /// Check that the linear regression prefectly fits three datapoints for
    /// the model
    /// f(x) = (x + 1)^2 = x^2 + 2x + 1
    #[test]
    fn fits_three_parameters_through_three_dots() {
        let lin_reg = LinearRegression::new();
        let dataset = Dataset::new(array![[0f64, 0.], [1., 1.], [2., 4.]], array![1., 4., 9.]);
        let model = lin_reg.fit(&dataset).unwrap();

        assert_abs_diff_eq!(model.params(), &array![2., 1.], epsilon = 1e-10);
        assert_abs_diff_eq!(model.intercept(), 1., epsilon = 1e-10);
    }

    /// Check that the linear regression prefectly fits four datapoints for
    /// the model
    /// f(x) = (x + 1)^3 = x^3 + 3x^2 + 3x + 1
    #[test]
    fn fits_four_parameters_through_four_dots() {
        let lin_reg = LinearRegression::new();
        let dataset = Dataset::new(
            array![[0f64, 0., 0.], [1., 1., 1.], [2., 4., 8.], [3., 9., 27.]],
            array![1., 8., 27., 64.],
        );
        let model = lin_reg.fit(&dataset).unwrap();

        assert_abs_diff_eq!(model.params(), &array![3., 3., 1.], epsilon = 1e-8);
        assert_abs_diff_eq!(model.intercept(), 1., epsilon = 1e-8);
    }

    /// Check that the linear regression prefectly fits three datapoints for
    /// the model
    /// f(x) = (x + 1)^2 = x^2 + 2x + 1
    #[test]
    fn fits_three_parameters_through_three_dots_f32() {
        let lin_reg = LinearRegression::new();
        let dataset = Dataset::new(array![[0f32, 0.], [1., 1.], [2., 4.]], array![1f32, 4., 9.]);
        let model = lin_reg.fit(&dataset).unwrap();

        assert_abs_diff_eq!(model.params(), &array![2., 1.], epsilon = 1e-3);
        assert_abs_diff_eq!(model.intercept(), 1., epsilon = 1e-3);
    }

    #[test]
    fn collinear_features_are_singular() {
        let dataset = Dataset::new(array![[1., 1.], [2., 2.], [3., 3.]], array![1., 2., 3.]);
        let res = LinearRegression::new().fit(&dataset);

        assert!(matches!(
            res,
            Err(LinearError::BaseCrate(sylva::Error::SingularMatrix))
        ));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let dataset = Dataset::new(Array2::<f64>::zeros((0, 1)), Array1::zeros(0));

        assert!(matches!(
            LinearRegression::new().fit(&dataset),
            Err(LinearError::NotEnoughSamples)
        ));
    }

    #[test]
    fn intercept_flag_through_map() -> Result<()> {
        let mut params = LinearRegression::<f64>::new();
        let mut map = ParamMap::new();
        map.insert("fit_intercept".to_string(), Value::from(false));

        params.set_params(&map)?;
        assert!(!params.fit_intercept());
        assert_eq!(params.get_params(), map);

        map.insert("fit_intercept".to_string(), Value::from("no"));
        assert!(params.set_params(&map).is_err());

        Ok(())
    }
}
