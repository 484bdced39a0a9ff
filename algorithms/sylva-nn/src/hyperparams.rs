use std::marker::PhantomData;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sylva::{
    param_map::{get_str, get_usize},
    traits::Fit,
    Dataset, Estimator, EstimatorParams, Float, ParamGuard, ParamMap, Task,
};

use crate::error::{NnError, Result};
use crate::KNearestNeighbours;

/// Checked hyperparameters of a [k-nearest neighbour model](crate::KNearestNeighbours)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnnValidParams<F> {
    k: usize,
    task: Task,

    float_marker: PhantomData<F>,
}

impl<F: Float> KnnValidParams<F> {
    /// Number of neighbours consulted for every prediction
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn task(&self) -> Task {
        self.task
    }
}

/// Hyperparameters of a k-nearest neighbour model
///
/// ```rust
/// use sylva::prelude::*;
/// use sylva_nn::KNearestNeighbours;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[0.], [1.], [9.], [10.]], array![0., 0., 1., 1.]);
/// let model = KNearestNeighbours::params().k(3).fit(&dataset).unwrap();
///
/// assert_eq!(model.predict(&array![[2.], [8.]]), array![0., 1.]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnnParams<F>(KnnValidParams<F>);

impl<F: Float> KnnParams<F> {
    pub fn new() -> Self {
        Self(KnnValidParams {
            k: 5,
            task: Task::Classification,
            float_marker: PhantomData,
        })
    }

    /// Sets the number of neighbours
    pub fn k(mut self, k: usize) -> Self {
        self.0.k = k;
        self
    }

    /// Sets whether neighbours vote on a label or average their targets
    pub fn task(mut self, task: Task) -> Self {
        self.0.task = task;
        self
    }
}

impl<F: Float> Default for KnnParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> KNearestNeighbours<F> {
    /// Defaults are `k = 5` and `task = Task::Classification`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> KnnParams<F> {
        KnnParams::new()
    }

    /// Default parameters for regression
    pub fn regressor() -> KnnParams<F> {
        KnnParams::new().task(Task::Regression)
    }
}

impl<F: Float> ParamGuard for KnnParams<F> {
    type Checked = KnnValidParams<F>;
    type Error = NnError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.k == 0 {
            Err(NnError::ZeroNeighbours)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> EstimatorParams for KnnParams<F> {
    type Float = F;
    type Object = KNearestNeighbours<F>;
    type Error = NnError;

    fn fit_dataset(&self, dataset: &Dataset<F>) -> Result<KNearestNeighbours<F>> {
        <Self as Fit<Array2<F>, Array1<F>, NnError>>::fit(self, dataset)
    }

    fn get_params(&self) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("k".to_string(), Value::from(self.0.k));
        params.insert("task".to_string(), Value::from(self.0.task.to_string()));

        params
    }

    fn set_params(&mut self, params: &ParamMap) -> Result<()> {
        if let Some(k) = get_usize(params, "k")? {
            self.0.k = k;
        }
        if let Some(task) = get_str(params, "task")? {
            self.0.task = task.parse()?;
        }
        self.check_ref()?;

        Ok(())
    }
}

/// A k-nearest neighbour model behind the uniform estimator interface
pub type KnnEstimator<F> = Estimator<KnnParams<F>>;
