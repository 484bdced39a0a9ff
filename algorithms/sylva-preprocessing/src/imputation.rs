//! Handling of missing values
//!
//! Missing values are stored as `NaN`. They can either be replaced with a per-feature statistic
//! learned by an [`Imputer`], or the affected observations can be removed with [`drop_nan`].
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2, Zip};
use serde::{Deserialize, Serialize};
use sylva::dataset::{AsSingleTargets, DatasetBase, Float};
use sylva::traits::{Fit, Transformer};
use sylva::Dataset;
use tracing::{debug, warn};

use crate::error::{PreprocessingError, Result};

/// The statistic which replaces missing values of a feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Mean of the observed values
    Mean,
    /// Median of the observed values, the mean of both middle values for an even count
    Median,
    /// Always zero
    Zero,
}

impl fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImputeStrategy::Mean => write!(f, "mean"),
            ImputeStrategy::Median => write!(f, "median"),
            ImputeStrategy::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for ImputeStrategy {
    type Err = sylva::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mean" => Ok(ImputeStrategy::Mean),
            "median" => Ok(ImputeStrategy::Median),
            "zero" => Ok(ImputeStrategy::Zero),
            other => Err(sylva::Error::Parameters(format!(
                "unknown imputation strategy `{}`",
                other
            ))),
        }
    }
}

/// Learns one replacement value per feature
///
/// Statistics are computed over the observed (non-`NaN`) values of every column. A column
/// without any observed value is replaced by zero.
///
/// ### Example
///
/// ```rust
/// use sylva::traits::{Fit, Transformer};
/// use sylva::Dataset;
/// use sylva_preprocessing::imputation::{ImputeStrategy, Imputer};
/// use ndarray::{array, Array2};
///
/// let nan = f64::NAN;
/// let dataset = Dataset::new(array![[1., nan], [nan, 4.], [3., 8.]], array![0., 1., 0.]);
///
/// let imputer = Imputer::new(ImputeStrategy::Mean).fit(&dataset).unwrap();
/// let imputed: Array2<f64> = imputer.transform(dataset.records().clone());
/// assert_eq!(imputed, array![[1., 6.], [2., 4.], [3., 8.]]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Imputer<F> {
    strategy: ImputeStrategy,
    float_marker: PhantomData<F>,
}

impl<F: Float> Imputer<F> {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Imputer {
            strategy,
            float_marker: PhantomData,
        }
    }

    pub fn mean() -> Self {
        Self::new(ImputeStrategy::Mean)
    }

    pub fn median() -> Self {
        Self::new(ImputeStrategy::Median)
    }

    pub fn zero() -> Self {
        Self::new(ImputeStrategy::Zero)
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }
}

impl<F: Float, D: Data<Elem = F>, T> Fit<ArrayBase<D, Ix2>, T, PreprocessingError> for Imputer<F> {
    type Object = FittedImputer<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let records = dataset.records();
        if records.nrows() == 0 {
            return Err(sylva::Error::NotEnoughSamples.into());
        }

        let statistics = records.map_axis(Axis(0), |col| column_statistic(col, self.strategy));
        let empty_columns = records
            .axis_iter(Axis(1))
            .filter(|col| col.iter().all(|x| x.is_nan()))
            .count();
        if empty_columns > 0 {
            warn!(empty_columns, "features without observed values are imputed with zero");
        }
        debug!(
            nfeatures = statistics.len(),
            strategy = %self.strategy,
            "fitted imputer"
        );

        Ok(FittedImputer {
            statistics,
            strategy: self.strategy,
        })
    }
}

fn column_statistic<F: Float>(col: ArrayView1<F>, strategy: ImputeStrategy) -> F {
    let mut observed = col.iter().copied().filter(|x| !x.is_nan()).collect::<Vec<_>>();
    if observed.is_empty() {
        return F::zero();
    }

    match strategy {
        ImputeStrategy::Mean => observed.iter().copied().sum::<F>() / F::cast(observed.len()),
        ImputeStrategy::Median => {
            observed.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            let mid = observed.len() / 2;
            if observed.len() % 2 == 0 {
                (observed[mid - 1] + observed[mid]) / F::cast(2)
            } else {
                observed[mid]
            }
        }
        ImputeStrategy::Zero => F::zero(),
    }
}

/// Replaces missing values with the statistics of the fitted dataset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedImputer<F> {
    statistics: Array1<F>,
    strategy: ImputeStrategy,
}

impl<F: Float> FittedImputer<F> {
    /// Replacement value of every feature
    pub fn statistics(&self) -> &Array1<F> {
        &self.statistics
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }
}

impl<F: Float> Transformer<Array2<F>, Array2<F>> for FittedImputer<F> {
    /// Replaces every `NaN` with the statistic of its column.
    /// Panics if the number of features differs from the fitted dataset.
    fn transform(&self, x: Array2<F>) -> Array2<F> {
        if x.is_empty() {
            return x;
        }
        assert_eq!(
            x.ncols(),
            self.statistics.len(),
            "The number of features must match the number of features seen during fitting."
        );

        let mut x = x;
        Zip::from(x.columns_mut())
            .and(&self.statistics)
            .for_each(|mut col, &stat| {
                col.mapv_inplace(|el| if el.is_nan() { stat } else { el });
            });

        x
    }
}

impl<F: Float, D: Data<Elem = F>, T>
    Transformer<DatasetBase<ArrayBase<D, Ix2>, T>, DatasetBase<Array2<F>, T>> for FittedImputer<F>
{
    fn transform(&self, x: DatasetBase<ArrayBase<D, Ix2>, T>) -> DatasetBase<Array2<F>, T> {
        let imputed = self.transform(x.records.to_owned());
        x.with_records(imputed)
    }
}

/// Removes every observation with at least one missing feature
///
/// Targets are kept aligned with their records. Missing targets are not checked.
pub fn drop_nan<F, D, T>(dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Dataset<F>>
where
    F: Float,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = F>,
{
    dataset.check_shapes()?;

    let complete = dataset
        .records()
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, row)| row.iter().all(|x| !x.is_nan()))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();
    debug!(
        dropped = dataset.nsamples() - complete.len(),
        kept = complete.len(),
        "dropped observations with missing values"
    );

    Ok(dataset.select(&complete))
}
