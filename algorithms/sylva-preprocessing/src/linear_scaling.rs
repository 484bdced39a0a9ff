//! Linear Scaling methods

use crate::error::{PreprocessingError, Result};
use approx::abs_diff_eq;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2, Zip};
use serde::{Deserialize, Serialize};
use sylva::dataset::{DatasetBase, Float};
use sylva::traits::{Fit, Transformer};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
/// Possible scaling methods for [LinearScaler](struct.LinearScaler.html)
///
/// * Standard: subtracts the mean of each feature and scales it by the inverse of its population
///   standard deviation
/// * MinMax (min, max): scales each feature to fit in the range [min,max], default values are [0,1]
///
/// Features without spread carry no information: they are mapped to `0` by the standard scaler
/// and to `min` by the min-max scaler.
pub enum ScalingMethod<F> {
    Standard,
    MinMax(F, F),
}

impl<F: Float> std::fmt::Display for ScalingMethod<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalingMethod::Standard => write!(f, "Standard scaler"),
            ScalingMethod::MinMax(min, max) => {
                write!(f, "Min-Max scaler (min = {}, max = {})", min, max)
            }
        }
    }
}

/// Linear Scaler: learns scaling parameters, according to the specified [method](enum.ScalingMethod.html), from a dataset, producing a [fitted linear scaler](struct.FittedLinearScaler.html)
/// that can be used to scale different datasets using the same parameters.
///
/// The records should not contain `NaN`, use an [`Imputer`](crate::imputation::Imputer) first.
///
/// ### Example
///
/// ```rust
/// use sylva::traits::{Fit, Transformer};
/// use sylva::Dataset;
/// use sylva_preprocessing::linear_scaling::LinearScaler;
/// use ndarray::array;
///
/// let train = Dataset::new(array![[0., 10.], [5., 20.], [10., 30.]], array![0., 1., 0.]);
/// // Learn scaling parameters
/// let scaler = LinearScaler::min_max().fit(&train).unwrap();
/// // scale another dataset according to parameters
/// let scaled: ndarray::Array2<f64> = scaler.transform(array![[5., 40.]]);
/// assert_eq!(scaled, array![[0.5, 1.5]]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearScaler<F> {
    method: ScalingMethod<F>,
}

impl<F: Float> LinearScaler<F> {
    /// Initializes the scaler with the specified method.
    pub fn new(method: ScalingMethod<F>) -> Self {
        Self { method }
    }

    /// Setter for the scaler method
    pub fn method(mut self, method: ScalingMethod<F>) -> Self {
        self.method = method;
        self
    }

    /// Initializes a Standard scaler
    pub fn standard() -> Self {
        Self {
            method: ScalingMethod::Standard,
        }
    }

    /// Initializes a MinMax scaler with range [0,1]
    pub fn min_max() -> Self {
        Self {
            method: ScalingMethod::MinMax(F::zero(), F::one()),
        }
    }

    /// Initializes a MinMax scaler with the specified minimum and maximum values for the range.
    ///
    /// If `min` is bigger than `max` then fitting will return an error on any input.
    pub fn min_max_range(min: F, max: F) -> Self {
        Self {
            method: ScalingMethod::MinMax(min, max),
        }
    }
}

impl<F: Float, D: Data<Elem = F>, T> Fit<ArrayBase<D, Ix2>, T, PreprocessingError>
    for LinearScaler<F>
{
    type Object = FittedLinearScaler<F>;

    /// Fits the input dataset according to the scaler [method](enum.ScalingMethod.html). Will return an error
    /// if the dataset does not contain any samples or (in the case of MinMax scaling) if the specified range is not valid.
    fn fit(&self, x: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let scaler = match self.method {
            ScalingMethod::Standard => FittedLinearScaler::standard(x.records()),
            ScalingMethod::MinMax(min, max) => FittedLinearScaler::min_max(x.records(), min, max),
        }?;

        debug!(
            nfeatures = scaler.offsets.len(),
            method = %self.method,
            "fitted linear scaler"
        );

        Ok(scaler)
    }
}

/// The result of fitting a [linear scaler](struct.LinearScaler.html).
/// Scales datasets with the parameters learned during fitting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedLinearScaler<F> {
    offsets: Array1<F>,
    scales: Array1<F>,
    method: ScalingMethod<F>,
}

impl<F: Float> FittedLinearScaler<F> {
    pub(crate) fn standard<D: Data<Elem = F>>(records: &ArrayBase<D, Ix2>) -> Result<Self> {
        let means = records
            .mean_axis(Axis(0))
            .ok_or(sylva::Error::NotEnoughSamples)?;
        let scales = records.std_axis(Axis(0), F::zero()).mapv(|s| {
            if abs_diff_eq!(s, F::zero()) {
                F::zero()
            } else {
                F::one() / s
            }
        });

        Ok(Self {
            offsets: means,
            scales,
            method: ScalingMethod::Standard,
        })
    }

    pub(crate) fn min_max<D: Data<Elem = F>>(
        records: &ArrayBase<D, Ix2>,
        min: F,
        max: F,
    ) -> Result<Self> {
        if records.nrows() == 0 {
            return Err(sylva::Error::NotEnoughSamples.into());
        }
        if min > max {
            return Err(PreprocessingError::FlippedMinMaxRange);
        }
        let mins = records.fold_axis(
            Axis(0),
            F::infinity(),
            |&x, &prev| if x < prev { x } else { prev },
        );
        let mut scales =
            records.fold_axis(
                Axis(0),
                F::neg_infinity(),
                |&x, &prev| if x > prev { x } else { prev },
            );
        Zip::from(&mut scales).and(&mins).for_each(|max, min| {
            if abs_diff_eq!(*max - *min, F::zero()) {
                *max = F::zero();
            } else {
                *max = F::one() / (*max - *min);
            }
        });

        Ok(Self {
            offsets: mins,
            scales,
            method: ScalingMethod::MinMax(min, max),
        })
    }

    /// Array of size `n_features` that contains the offset that will be subtracted to each feature
    pub fn offsets(&self) -> &Array1<F> {
        &self.offsets
    }

    /// Array of size `n_features` that contains the scale that will be applied to each feature
    pub fn scales(&self) -> &Array1<F> {
        &self.scales
    }

    /// Returns the method used for fitting. Useful for printing, since [ScalingMethod](enum.ScalingMethod.html) implements `Display`
    pub fn method(&self) -> &ScalingMethod<F> {
        &self.method
    }
}

impl<F: Float> Transformer<Array2<F>, Array2<F>> for FittedLinearScaler<F> {
    /// Scales an array of size (nsamples, nfeatures) according to the scaler's `offsets` and `scales`.
    /// Panics if the shape of the input array is not compatible with the shape of the dataset used for fitting.
    fn transform(&self, x: Array2<F>) -> Array2<F> {
        if x.is_empty() {
            return x;
        }
        assert_eq!(
            x.ncols(),
            self.offsets.len(),
            "The number of features must match the number of features seen during fitting."
        );

        let mut x = x;
        Zip::from(x.columns_mut())
            .and(self.offsets())
            .and(self.scales())
            .for_each(|mut col, &offset, &scale| {
                col.mapv_inplace(|el| (el - offset) * scale);
            });
        match self.method {
            ScalingMethod::MinMax(min, max) => x * (max - min) + min,
            ScalingMethod::Standard => x,
        }
    }
}

impl<F: Float, D: Data<Elem = F>, T>
    Transformer<DatasetBase<ArrayBase<D, Ix2>, T>, DatasetBase<Array2<F>, T>>
    for FittedLinearScaler<F>
{
    /// Substitutes the records of the dataset with their scaled version.
    /// Panics if the shape of the records is not compatible with the shape of the dataset used for fitting.
    fn transform(&self, x: DatasetBase<ArrayBase<D, Ix2>, T>) -> DatasetBase<Array2<F>, T> {
        let transformed_records = self.transform(x.records.to_owned());
        x.with_records(transformed_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sylva::Dataset;

    fn dataset(records: Array2<f64>) -> Dataset<f64> {
        let targets = Array1::zeros(records.nrows());
        Dataset::new(records, targets)
    }

    #[test]
    fn test_standard_scaler() {
        let dataset = dataset(array![[1., -1., 2.], [2., 0., 0.], [0., 1., -1.]]);
        let scaler = LinearScaler::standard().fit(&dataset).unwrap();
        assert_abs_diff_eq!(*scaler.offsets(), array![1., 0., 1. / 3.]);
        assert_abs_diff_eq!(
            *scaler.scales(),
            array![1. / 0.81, 1. / 0.81, 1. / 1.24],
            epsilon = 1e-2
        );
        let transformed = scaler.transform(dataset);
        let means = transformed.records().mean_axis(Axis(0)).unwrap();
        let std_devs = transformed.records().std_axis(Axis(0), 0.);
        assert_abs_diff_eq!(means, array![0., 0., 0.], epsilon = 1e-12);
        assert_abs_diff_eq!(std_devs, array![1., 1., 1.], epsilon = 1e-12);
    }

    #[test]
    fn test_standard_scaler_constant_feature() {
        let dataset = dataset(array![[1., 5.], [3., 5.]]);
        let scaler = LinearScaler::standard().fit(&dataset).unwrap();

        // population standard deviation of [1, 3] is 1
        assert_abs_diff_eq!(*scaler.scales(), array![1., 0.]);
        assert_abs_diff_eq!(
            scaler.transform(array![[2., 5.], [5., 100.]]),
            array![[0., 0.], [3., 0.]]
        );
    }

    #[test]
    fn test_min_max_scaler() {
        let dataset = dataset(array![[1., -1., 2.], [2., 0., 0.], [0., 1., -1.]]);
        let scaler = LinearScaler::min_max().fit(&dataset).unwrap();
        assert_abs_diff_eq!(*scaler.offsets(), array![0., -1., -1.]);
        assert_abs_diff_eq!(*scaler.scales(), array![1. / 2., 1. / 2., 1. / 3.]);
        let transformed = scaler.transform(dataset);
        let mins = transformed
            .records()
            .fold_axis(
                Axis(0),
                f64::INFINITY,
                |&x, &prev| if x < prev { x } else { prev },
            );
        let maxes = transformed
            .records()
            .fold_axis(
                Axis(0),
                f64::NEG_INFINITY,
                |&x, &prev| if x > prev { x } else { prev },
            );
        assert_abs_diff_eq!(maxes, array![1., 1., 1.]);
        assert_abs_diff_eq!(mins, array![0., 0., 0.]);
    }

    #[test]
    fn test_min_max_scaler_range() {
        let dataset = dataset(array![[1., -1., 2.], [2., 0., 0.], [0., 1., -1.]]);
        let scaler = LinearScaler::min_max_range(5., 10.).fit(&dataset).unwrap();
        let transformed = scaler.transform(dataset.records().clone());

        assert_abs_diff_eq!(transformed.row(0), array![7.5, 5., 10.]);
        assert_abs_diff_eq!(transformed.row(2), array![5., 10., 5.]);
    }

    #[test]
    fn test_min_max_constant_feature() {
        let dataset = dataset(array![[1., 4.], [1., 8.]]);
        let scaler = LinearScaler::min_max().fit(&dataset).unwrap();

        assert_abs_diff_eq!(
            scaler.transform(array![[1., 6.], [7., 4.]]),
            array![[0., 0.5], [0., 0.]]
        );
    }

    #[test]
    fn test_min_max_wrong_range() {
        let dataset = dataset(array![[1.], [2.]]);

        assert!(matches!(
            LinearScaler::min_max_range(10., 5.).fit(&dataset),
            Err(PreprocessingError::FlippedMinMaxRange)
        ));
    }

    #[test]
    fn test_empty_input() {
        let empty = dataset(Array2::zeros((0, 3)));

        assert!(matches!(
            LinearScaler::standard().fit(&empty),
            Err(PreprocessingError::BaseCrate(sylva::Error::NotEnoughSamples))
        ));
        assert!(matches!(
            LinearScaler::min_max().fit(&empty),
            Err(PreprocessingError::BaseCrate(sylva::Error::NotEnoughSamples))
        ));

        let scaler = LinearScaler::min_max().fit(&dataset(array![[1.], [2.]])).unwrap();
        assert_eq!(scaler.transform(Array2::zeros((0, 1))).dim(), (0, 1));
    }

    #[test]
    fn test_transform_keeps_targets() {
        let dataset =
            Dataset::new(array![[1.], [3.]], array![4., 2.]).with_feature_names(vec!["a"]);
        let scaler = LinearScaler::standard().fit(&dataset).unwrap();
        let transformed = scaler.transform(dataset);

        assert_eq!(transformed.targets(), &array![4., 2.]);
        assert_eq!(transformed.feature_names(), vec!["a".to_string()]);
        assert_abs_diff_eq!(*transformed.records(), array![[-1.], [1.]]);
    }

    #[test]
    #[should_panic]
    fn test_transform_wrong_features() {
        let scaler = LinearScaler::standard().fit(&dataset(array![[1.], [3.]])).unwrap();
        let _: Array2<f64> = scaler.transform(array![[1., 2.]]);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(LinearScaler::<f64>::standard().method.to_string(), "Standard scaler");
        assert_eq!(
            LinearScaler::<f64>::min_max().method.to_string(),
            "Min-Max scaler (min = 0, max = 1)"
        );
    }
}
