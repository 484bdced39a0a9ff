use std::marker::PhantomData;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sylva::{
    error::{Error, Result},
    param_map::{get_str, get_usize},
    traits::Fit,
    Dataset, Estimator, EstimatorParams, Float, ParamGuard, ParamMap, Task,
};

use crate::DecisionTree;

/// The set of hyperparameters that can be specified for fitting a
/// [decision tree](struct.DecisionTree.html).
///
/// ### Example
///
/// ```rust
/// use sylva_trees::{DecisionTree, Task};
/// use sylva::prelude::*;
/// use ndarray::array;
///
/// // Initialize the default set of parameters and tune them
/// let params = DecisionTree::params().task(Task::Classification).max_depth(3);
///
/// let dataset = Dataset::new(array![[0.], [1.], [2.], [3.]], array![0., 0., 1., 1.]);
/// let tree = params.fit(&dataset).unwrap();
///
/// assert_eq!(tree.predict(&array![[0.5], [2.5]]), array![0., 1.]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeValidParams<F> {
    task: Task,
    max_depth: usize,
    min_size: usize,

    float_marker: PhantomData<F>,
}

impl<F: Float> DecisionTreeValidParams<F> {
    pub fn task(&self) -> Task {
        self.task
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeParams<F>(DecisionTreeValidParams<F>);

impl<F: Float> DecisionTreeParams<F> {
    pub fn new() -> Self {
        Self(DecisionTreeValidParams {
            task: Task::Classification,
            max_depth: 10,
            min_size: 2,
            float_marker: PhantomData,
        })
    }

    /// Sets the kind of target, either classification or regression
    pub fn task(mut self, task: Task) -> Self {
        self.0.task = task;
        self
    }

    /// Sets the depth at which growth stops, the root has depth zero
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the number of samples at or below which a node becomes a leaf
    pub fn min_size(mut self, min_size: usize) -> Self {
        self.0.min_size = min_size;
        self
    }
}

impl<F: Float> Default for DecisionTreeParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> DecisionTree<F> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `task = Task::Classification`
    /// * `max_depth = 10`
    /// * `min_size = 2`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams<F> {
        DecisionTreeParams::new()
    }

    /// Default parameters for regression trees
    pub fn regressor() -> DecisionTreeParams<F> {
        DecisionTreeParams::new().task(Task::Regression)
    }
}

impl<F: Float> ParamGuard for DecisionTreeParams<F> {
    type Checked = DecisionTreeValidParams<F>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.max_depth == 0 {
            Err(Error::Parameters(
                "maximal depth should be at least one".to_string(),
            ))
        } else if self.0.min_size == 0 {
            Err(Error::Parameters(
                "minimal node size should be at least one".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> EstimatorParams for DecisionTreeParams<F> {
    type Float = F;
    type Object = DecisionTree<F>;
    type Error = Error;

    fn fit_dataset(&self, dataset: &Dataset<F>) -> Result<DecisionTree<F>> {
        <Self as Fit<Array2<F>, Array1<F>, Error>>::fit(self, dataset)
    }

    fn get_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("max_depth".to_string(), Value::from(self.0.max_depth));
        params.insert("min_size".to_string(), Value::from(self.0.min_size));
        params.insert("task".to_string(), Value::from(self.0.task.to_string()));

        params
    }

    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        if let Some(max_depth) = get_usize(params, "max_depth")? {
            self.0.max_depth = max_depth;
        }
        if let Some(min_size) = get_usize(params, "min_size")? {
            self.0.min_size = min_size;
        }
        if let Some(task) = get_str(params, "task")? {
            self.0.task = task.parse()?;
        }
        self.check_ref()?;

        Ok(())
    }
}

/// A decision tree behind the uniform estimator interface
pub type DecisionTreeEstimator<F> = Estimator<DecisionTreeParams<F>>;

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
        let params = DecisionTree::<f64>::params().check_unwrap();

        assert_eq!(params.task(), Task::Classification);
        assert_eq!(params.max_depth(), 10);
        assert_eq!(params.min_size(), 2);
        assert_eq!(
            DecisionTree::<f32>::regressor().check_unwrap().task(),
            Task::Regression
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(DecisionTree::<f64>::params().max_depth(0).check().is_err());
        assert!(DecisionTree::<f64>::params().min_size(0).check().is_err());
        assert!("forest".parse::<Task>().is_err());
    }

    #[test]
    fn params_round_trip_through_map() -> Result<()> {
        let mut params = DecisionTree::<f64>::params();
        assert_eq!(
            params.get_params(),
            param_map(json!({"max_depth": 10, "min_size": 2, "task": "classification"}))
        );

        params.set_params(&param_map(
            json!({"max_depth": 3, "task": "regression", "learning_rate": 0.1}),
        ))?;
        let checked = params.check_ref()?;
        assert_eq!(checked.max_depth(), 3);
        assert_eq!(checked.min_size(), 2);
        assert_eq!(checked.task(), Task::Regression);

        Ok(())
    }

    #[test]
    fn wrongly_typed_values_are_rejected() {
        let mut params = DecisionTree::<f64>::params();

        assert!(params
            .set_params(&param_map(json!({"max_depth": "deep"})))
            .is_err());
        assert!(params
            .set_params(&param_map(json!({"min_size": -1})))
            .is_err());
        assert!(params
            .set_params(&param_map(json!({"task": "clustering"})))
            .is_err());
        assert!(params
            .set_params(&param_map(json!({"max_depth": 0})))
            .is_err());
    }
}
