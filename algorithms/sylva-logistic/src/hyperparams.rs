use std::marker::PhantomData;

use ndarray::{Array1, Array2, Dimension, Ix1, Ix2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sylva::{
    param_map::{float_value, get_float, get_usize},
    traits::Fit,
    Dataset, Estimator, EstimatorParams, Float, ParamGuard, ParamMap,
};

use crate::error::{LogisticError, Result};
use crate::{FittedLogisticRegression, MultiFittedLogisticRegression};

/// A two-class logistic regression, see [`LogisticRegressionParams`]
pub type LogisticRegression<F> = LogisticRegressionParams<F, Ix1>;
/// A one-vs-rest logistic regression over any number of classes
pub type MultiLogisticRegression<F> = LogisticRegressionParams<F, Ix2>;

/// A verified hyper-parameter set ready for gradient descent
///
/// The dimension `D` selects the model: `Ix1` fits a single parameter vector for two classes,
/// `Ix2` fits one parameter column per class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionValidParams<F, D: Dimension> {
    pub(crate) learning_rate: F,
    pub(crate) iterations: usize,
    pub(crate) marker: PhantomData<D>,
}

impl<F: Float, D: Dimension> LogisticRegressionValidParams<F, D> {
    pub fn learning_rate(&self) -> F {
        self.learning_rate
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// A logistic regression hyper-parameter set during construction
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [learning_rate](Self::learning_rate) | `0.1` | Step size of every gradient descent update | `(0, inf)` |
/// | [iterations](Self::iterations) | `1000` | Number of full-batch updates | `[1, inf)` |
///
/// # Errors
///
/// Checking fails with [`InvalidLearningRate`](LogisticError::InvalidLearningRate) for a
/// non-positive or non-finite step size and with [`ZeroIterations`](LogisticError::ZeroIterations)
/// if no update would be made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionParams<F, D: Dimension>(LogisticRegressionValidParams<F, D>);

impl<F: Float, D: Dimension> Default for LogisticRegressionParams<F, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, D: Dimension> LogisticRegressionParams<F, D> {
    /// Creates a new parameter set with the defaults
    pub fn new() -> Self {
        Self(LogisticRegressionValidParams {
            learning_rate: F::cast(0.1),
            iterations: 1000,
            marker: PhantomData,
        })
    }

    /// Sets the step size of gradient descent
    pub fn learning_rate(mut self, learning_rate: F) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    /// Sets the number of gradient descent updates
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.0.iterations = iterations;
        self
    }
}

impl<F: Float, D: Dimension> ParamGuard for LogisticRegressionParams<F, D> {
    type Checked = LogisticRegressionValidParams<F, D>;
    type Error = LogisticError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let learning_rate = self.0.learning_rate;
        if learning_rate <= F::zero() || !learning_rate.is_finite() {
            return Err(LogisticError::InvalidLearningRate(
                learning_rate.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if self.0.iterations == 0 {
            return Err(LogisticError::ZeroIterations);
        }

        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, D: Dimension> LogisticRegressionParams<F, D> {
    fn param_map(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert(
            "learning_rate".to_string(),
            float_value(self.0.learning_rate),
        );
        params.insert("iterations".to_string(), Value::from(self.0.iterations));

        params
    }

    fn apply_param_map(&mut self, params: &ParamMap) -> Result<()> {
        let mut updated = self.clone();
        if let Some(learning_rate) = get_float(params, "learning_rate")? {
            updated.0.learning_rate = learning_rate;
        }
        if let Some(iterations) = get_usize(params, "iterations")? {
            updated.0.iterations = iterations;
        }
        updated.check_ref()?;
        *self = updated;

        Ok(())
    }
}

impl<F: Float> EstimatorParams for LogisticRegression<F> {
    type Float = F;
    type Object = FittedLogisticRegression<F>;
    type Error = LogisticError;

    fn fit_dataset(&self, dataset: &Dataset<F>) -> Result<FittedLogisticRegression<F>> {
        <Self as Fit<Array2<F>, Array1<F>, LogisticError>>::fit(self, dataset)
    }

    fn get_params(&self) -> ParamMap {
        self.param_map()
    }

    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        self.apply_param_map(params)
    }
}

impl<F: Float> EstimatorParams for MultiLogisticRegression<F> {
    type Float = F;
    type Object = MultiFittedLogisticRegression<F>;
    type Error = LogisticError;

    fn fit_dataset(&self, dataset: &Dataset<F>) -> Result<MultiFittedLogisticRegression<F>> {
        <Self as Fit<Array2<F>, Array1<F>, LogisticError>>::fit(self, dataset)
    }

    fn get_params(&self) -> ParamMap {
        self.param_map()
    }

    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        self.apply_param_map(params)
    }
}

/// A two-class logistic regression behind the uniform estimator interface
pub type LogisticRegressionEstimator<F> = Estimator<LogisticRegression<F>>;
/// A one-vs-rest logistic regression behind the uniform estimator interface
pub type MultiLogisticRegressionEstimator<F> = Estimator<MultiLogisticRegression<F>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param_map(value: Value) -> ParamMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn defaults() {
        let params = LogisticRegression::<f64>::default().check_unwrap();
        assert_eq!(params.learning_rate(), 0.1);
        assert_eq!(params.iterations(), 1000);
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(matches!(
            LogisticRegression::<f64>::new().learning_rate(0.).check(),
            Err(LogisticError::InvalidLearningRate(_))
        ));
        assert!(matches!(
            MultiLogisticRegression::<f32>::new()
                .learning_rate(f32::NAN)
                .check(),
            Err(LogisticError::InvalidLearningRate(_))
        ));
        assert!(matches!(
            LogisticRegression::<f64>::new().iterations(0).check(),
            Err(LogisticError::ZeroIterations)
        ));
    }

    #[test]
    fn params_round_trip_through_map() -> Result<()> {
        let mut params = MultiLogisticRegression::<f64>::new();
        assert_eq!(
            params.get_params(),
            param_map(json!({"learning_rate": 0.1, "iterations": 1000}))
        );

        params.set_params(&param_map(json!({"learning_rate": 0.5, "k": 3})))?;
        assert_eq!(params.check_ref()?.learning_rate(), 0.5);
        assert_eq!(params.check_ref()?.iterations(), 1000);

        Ok(())
    }

    #[test]
    fn failed_update_keeps_params() {
        let mut params = LogisticRegression::<f64>::new();

        assert!(params
            .set_params(&param_map(json!({"learning_rate": 0.2, "iterations": 0})))
            .is_err());
        assert!(params
            .set_params(&param_map(json!({"iterations": "many"})))
            .is_err());
        assert_eq!(params, LogisticRegression::new());
    }
}
