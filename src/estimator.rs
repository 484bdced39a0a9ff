//! Uniform estimator interface
//!
//! Every algorithm in this workspace exposes the same life cycle through [`Estimator`]: it is
//! created from its hyperparameters, fitted on a [`Dataset`], then used to predict and score
//! unseen records. The hyperparameters can be read and updated as a [`ParamMap`] and the whole
//! estimator, including a fitted model, can be stored to disk and restored later.
//!
//! Snapshots are written with `bincode`, prefixed by a small header so that foreign or truncated
//! files are rejected with [`Error::Persistence`] instead of producing garbage.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::{Dataset, Float};
use crate::error::{Error, Result};
use crate::param_map::ParamMap;
use crate::traits::{FeatureDim, Predict, PredictInplace};

const SNAPSHOT_MAGIC: [u8; 4] = *b"SYLV";
const SNAPSHOT_VERSION: u32 = 1;

/// Hyperparameters which can be turned into a fitted model
///
/// This is the seam between the generic [`Estimator`] and a concrete algorithm. Implementations
/// live next to the hyperparameters of each algorithm and usually forward `fit_dataset` to the
/// algorithm's `Fit` implementation.
pub trait EstimatorParams: Clone {
    /// Element type of records and targets
    type Float: Float;
    /// Fitted model produced by `fit_dataset`
    type Object: PredictInplace<Array2<Self::Float>, Array1<Self::Float>> + FeatureDim;
    /// Error type of the algorithm
    type Error: std::error::Error + From<Error>;

    /// Validate the hyperparameters and fit a model
    fn fit_dataset(
        &self,
        dataset: &Dataset<Self::Float>,
    ) -> std::result::Result<Self::Object, Self::Error>;

    /// Current hyperparameters as a map
    fn get_params(&self) -> ParamMap;

    /// Apply all recognized keys of `params`
    ///
    /// Unknown keys are ignored. The resulting hyperparameters have to be valid, otherwise an
    /// error is returned. The caller is responsible for discarding a partially updated value.
    fn set_params(&mut self, params: &ParamMap) -> std::result::Result<(), Self::Error>;
}

#[derive(Serialize, Deserialize)]
struct SnapshotHeader {
    magic: [u8; 4],
    version: u32,
}

impl SnapshotHeader {
    fn current() -> Self {
        SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(Error::Persistence("not an estimator snapshot".to_string()));
        }
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::Persistence(format!(
                "unsupported snapshot version {}, expected {}",
                self.version, SNAPSHOT_VERSION
            )));
        }

        Ok(())
    }
}

fn persistence_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Persistence(err.to_string())
}

/// An estimator with its hyperparameters and an optional fitted model
///
/// ```rust,ignore
/// let mut estimator = Estimator::new(DecisionTree::params().max_depth(3));
/// estimator.fit(&train)?;
/// let accuracy = estimator.score(&test, |truth, pred| pred.accuracy(&truth))?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize, P::Object: Serialize",
    deserialize = "P: DeserializeOwned, P::Object: DeserializeOwned"
))]
pub struct Estimator<P: EstimatorParams> {
    params: P,
    model: Option<P::Object>,
}

impl<P: EstimatorParams> Estimator<P> {
    /// Create an unfitted estimator
    pub fn new(params: P) -> Self {
        Estimator {
            params,
            model: None,
        }
    }

    /// Hyperparameters of this estimator
    pub fn params(&self) -> &P {
        &self.params
    }

    /// Fitted model, `None` before the first successful `fit`
    pub fn model(&self) -> Option<&P::Object> {
        self.model.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Fit a new model on `dataset`
    ///
    /// A previously fitted model is only replaced if fitting succeeds.
    pub fn fit(&mut self, dataset: &Dataset<P::Float>) -> std::result::Result<(), P::Error> {
        dataset.check_shapes()?;
        debug!(
            nsamples = dataset.nsamples(),
            nfeatures = dataset.nfeatures(),
            "fitting estimator"
        );

        let model = self.params.fit_dataset(dataset)?;
        self.model = Some(model);

        Ok(())
    }

    /// Predict one value per row of `records`
    pub fn predict(
        &self,
        records: &Array2<P::Float>,
    ) -> std::result::Result<Array1<P::Float>, P::Error> {
        let model = self.model.as_ref().ok_or(Error::NotFitted)?;
        if records.ncols() != model.nfeatures() {
            return Err(Error::FeatureMismatch {
                expected: model.nfeatures(),
                actual: records.ncols(),
            }
            .into());
        }

        Ok(model.predict(records))
    }

    /// Predict the records of `dataset` and compare them with its targets
    ///
    /// The metric is called with the true targets first and the predictions second.
    pub fn score<M>(
        &self,
        dataset: &Dataset<P::Float>,
        metric: M,
    ) -> std::result::Result<P::Float, P::Error>
    where
        M: Fn(ArrayView1<'_, P::Float>, ArrayView1<'_, P::Float>) -> Result<P::Float>,
    {
        dataset.check_shapes()?;
        let predictions = self.predict(dataset.records())?;

        Ok(metric(dataset.targets().view(), predictions.view())?)
    }

    pub fn get_params(&self) -> ParamMap {
        self.params.get_params()
    }

    /// Update the hyperparameters from a map
    ///
    /// Either all recognized keys are applied or, on error, none of them. A fitted model is kept
    /// and will be replaced by the next call to `fit`.
    pub fn set_params(&mut self, params: &ParamMap) -> std::result::Result<(), P::Error> {
        let mut updated = self.params.clone();
        updated.set_params(params)?;
        self.params = updated;

        Ok(())
    }

    /// Write the hyperparameters and the fitted model, if any, to `path`
    pub fn save<Q: AsRef<Path>>(&self, path: Q) -> std::result::Result<(), P::Error>
    where
        P: Serialize,
        P::Object: Serialize,
    {
        let path = path.as_ref();
        let file = File::create(path).map_err(persistence_error)?;
        let mut writer = BufWriter::new(file);

        bincode::serialize_into(&mut writer, &SnapshotHeader::current())
            .map_err(persistence_error)?;
        bincode::serialize_into(&mut writer, self).map_err(persistence_error)?;
        writer.flush().map_err(persistence_error)?;

        info!(path = %path.display(), fitted = self.is_fitted(), "saved estimator");

        Ok(())
    }

    /// Replace this estimator with the snapshot stored at `path`
    ///
    /// On error the estimator is left untouched.
    pub fn load<Q: AsRef<Path>>(&mut self, path: Q) -> std::result::Result<(), P::Error>
    where
        P: DeserializeOwned,
        P::Object: DeserializeOwned,
    {
        *self = Self::from_file(path)?;

        Ok(())
    }

    /// Restore an estimator from the snapshot stored at `path`
    pub fn from_file<Q: AsRef<Path>>(path: Q) -> std::result::Result<Self, P::Error>
    where
        P: DeserializeOwned,
        P::Object: DeserializeOwned,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(persistence_error)?;
        let mut reader = BufReader::new(file);

        let header: SnapshotHeader =
            bincode::deserialize_from(&mut reader).map_err(persistence_error)?;
        header.validate()?;
        let estimator: Self = bincode::deserialize_from(&mut reader).map_err(persistence_error)?;

        info!(path = %path.display(), fitted = estimator.is_fitted(), "loaded estimator");

        Ok(estimator)
    }
}
