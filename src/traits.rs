//! Provide traits for different classes of algorithms
//!

use crate::dataset::{DatasetBase, Records};

/// Transformation algorithms
///
/// A transformer takes a dataset and transforms it into a different one. It has no concept of
/// state and provides therefore no method to predict new data. A typical example are scalers
/// once they have been fitted, or stateless helpers like one-hot encoding.
pub trait Transformer<R, T> {
    fn transform(&self, x: R) -> T;
}

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For example
/// in *KMeans* this would be the mean values for each class, or in *DecisionTree* the fitted
/// tree of splits. The trait is implemented on the (checked) hyperparameters and produces the
/// fitted model as a separate object.
pub trait Fit<R: Records, T, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E>;
}

/// Predict with model into a mutable reference of targets.
pub trait PredictInplace<R: Records, T> {
    /// Predict something in place
    fn predict_inplace<'a>(&'a self, x: &'a R, y: &mut T);

    /// Create targets that `predict_inplace` works with.
    fn default_target(&self, x: &R) -> T;
}

/// Predict with model
///
/// This trait assumes the `PredictInplace` implementation and provides additional input/output
/// combinations.
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

/// Models which remember the dimensionality of the records they were fitted on
pub trait FeatureDim {
    /// Number of features every record passed to the model must have
    fn nfeatures(&self) -> usize;
}

impl<'a, R: Records, T, O: PredictInplace<R, T>> Predict<&'a R, T> for O {
    fn predict(&self, records: &'a R) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}
