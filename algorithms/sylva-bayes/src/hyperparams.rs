use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use sylva::{
    param_map::{float_value, get_float},
    traits::Fit,
    Dataset, Estimator, EstimatorParams, Float, ParamGuard, ParamMap,
};

use crate::error::{NaiveBayesError, Result};
use crate::{GaussianNb, MultinomialNb};

/// A verified hyper-parameter set ready for the estimation of a Gaussian Naive Bayes model
///
/// See [`GaussianNbParams`](crate::GaussianNbParams) for more information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianNbValidParams<F> {
    var_smoothing: F,
}

impl<F: Float> GaussianNbValidParams<F> {
    /// Get the variance smoothing
    pub fn var_smoothing(&self) -> F {
        self.var_smoothing
    }
}

/// A hyper-parameter set during construction
///
/// The parameter set can be verified into a
/// [`GaussianNbValidParams`](crate::GaussianNbValidParams) by calling
/// [ParamGuard::check](Self::check). It is also possible to directly fit a model with
/// [Fit::fit](sylva::traits::Fit::fit) which implicitely verifies the parameter set prior to the
/// model estimation and forwards any error.
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [var_smoothing](Self::var_smoothing) | `1e-9` | Added to every variance to keep the likelihood finite for constant features | `[0, inf)` |
///
/// # Errors
///
/// Returns [`InvalidSmoothing`](NaiveBayesError::InvalidSmoothing) if the smoothing
/// parameter is negative or not finite.
///
/// # Example
///
/// ```rust
/// use sylva_bayes::{GaussianNbParams, Result};
/// use sylva::prelude::*;
/// use ndarray::array;
///
/// let x = array![
///     [-2., -1.],
///     [-1., -1.],
///     [-1., -2.],
///     [1., 1.],
///     [1., 2.],
///     [2., 1.]
/// ];
/// let y = array![1., 1., 1., 2., 2., 2.];
/// let ds = Dataset::new(x, y);
///
/// // create a new parameter set with variance smoothing equals `1e-5`
/// let unchecked_params = GaussianNbParams::new()
///     .var_smoothing(1e-5);
///
/// // fit model with unchecked parameter set
/// let model = unchecked_params.fit(&ds)?;
///
/// // transform into a verified parameter set
/// let checked_params = unchecked_params.check()?;
///
/// // fit again, this only returns errors originating from the fitting process
/// let model = checked_params.fit(&ds)?;
/// assert_eq!(model.predict(&array![[-1.5, -1.5]]), array![1.]);
/// # Result::Ok(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianNbParams<F>(GaussianNbValidParams<F>);

impl<F: Float> Default for GaussianNbParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> GaussianNbParams<F> {
    /// Create new [GaussianNbParams] set with default values for its parameters
    pub fn new() -> Self {
        Self(GaussianNbValidParams {
            var_smoothing: F::cast(1e-9),
        })
    }

    /// Specifies the amount added to the variance of every feature
    pub fn var_smoothing(mut self, var_smoothing: F) -> Self {
        self.0.var_smoothing = var_smoothing;
        self
    }
}

impl<F: Float> ParamGuard for GaussianNbParams<F> {
    type Checked = GaussianNbValidParams<F>;
    type Error = NaiveBayesError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        check_smoothing(self.0.var_smoothing)?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> EstimatorParams for GaussianNbParams<F> {
    type Float = F;
    type Object = GaussianNb<F>;
    type Error = NaiveBayesError;

    fn fit_dataset(&self, dataset: &Dataset<F>) -> Result<GaussianNb<F>> {
        <Self as Fit<Array2<F>, Array1<F>, NaiveBayesError>>::fit(self, dataset)
    }

    fn get_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert(
            "var_smoothing".to_string(),
            float_value(self.0.var_smoothing),
        );

        params
    }

    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        if let Some(var_smoothing) = get_float(params, "var_smoothing")? {
            self.0.var_smoothing = var_smoothing;
        }
        self.check_ref()?;

        Ok(())
    }
}

/// A verified hyper-parameter set ready for the estimation of a Multinomial Naive Bayes model
///
/// See [`MultinomialNbParams`](crate::MultinomialNbParams) for more information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNbValidParams<F> {
    alpha: F,
}

impl<F: Float> MultinomialNbValidParams<F> {
    /// Get the smoothing parameter
    pub fn alpha(&self) -> F {
        self.alpha
    }
}

/// A hyper-parameter set during construction
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [alpha](Self::alpha) | `1` | Additive (Laplace/Lidstone) smoothing parameter. Regularizes log probabilities if certain feature/class combinations don't occur | `[0, inf)` |
///
/// # Errors
///
/// Returns [`InvalidSmoothing`](NaiveBayesError::InvalidSmoothing) if the smoothing
/// parameter is negative or not finite.
///
/// # Example
///
/// ```rust
/// use sylva_bayes::{MultinomialNbParams, Result};
/// use sylva::prelude::*;
/// use ndarray::array;
///
/// let x = array![
///     [1., 0.],
///     [2., 0.],
///     [3., 0.],
///     [0., 1.],
///     [0., 2.],
///     [0., 3.]
/// ];
/// let y = array![1., 1., 1., 2., 2., 2.];
/// let ds = Dataset::new(x, y);
///
/// let model = MultinomialNbParams::new().alpha(0.5).fit(&ds)?;
/// assert_eq!(model.predict(&array![[5., 1.], [0., 4.]]), array![1., 2.]);
/// # Result::Ok(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNbParams<F>(MultinomialNbValidParams<F>);

impl<F: Float> Default for MultinomialNbParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> MultinomialNbParams<F> {
    /// Create new [MultinomialNbParams] set with default values for its parameters
    pub fn new() -> Self {
        Self(MultinomialNbValidParams { alpha: F::one() })
    }

    /// Specifies the additive smoothing of feature counts
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }
}

impl<F: Float> ParamGuard for MultinomialNbParams<F> {
    type Checked = MultinomialNbValidParams<F>;
    type Error = NaiveBayesError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        check_smoothing(self.0.alpha)?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> EstimatorParams for MultinomialNbParams<F> {
    type Float = F;
    type Object = MultinomialNb<F>;
    type Error = NaiveBayesError;

    fn fit_dataset(&self, dataset: &Dataset<F>) -> Result<MultinomialNb<F>> {
        <Self as Fit<Array2<F>, Array1<F>, NaiveBayesError>>::fit(self, dataset)
    }

    fn get_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("alpha".to_string(), float_value(self.0.alpha));

        params
    }

    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        if let Some(alpha) = get_float(params, "alpha")? {
            self.0.alpha = alpha;
        }
        self.check_ref()?;

        Ok(())
    }
}

fn check_smoothing<F: Float>(smoothing: F) -> Result<()> {
    if smoothing < F::zero() || !smoothing.is_finite() {
        Err(NaiveBayesError::InvalidSmoothing(
            smoothing.to_f64().unwrap_or(f64::NAN),
        ))
    } else {
        Ok(())
    }
}

/// A Gaussian Naive Bayes model behind the uniform estimator interface
pub type GaussianNbEstimator<F> = Estimator<GaussianNbParams<F>>;

/// A Multinomial Naive Bayes model behind the uniform estimator interface
pub type MultinomialNbEstimator<F> = Estimator<MultinomialNbParams<F>>;
