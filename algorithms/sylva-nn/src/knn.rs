use std::cmp::Ordering;

use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sylva::{dataset::AsSingleTargets, traits::*, DatasetBase, Float, Task};

use crate::error::{NnError, Result};
use crate::{KnnValidParams, LinearSearch};

/// A fitted k-nearest neighbour model
///
/// Fitting only stores the training samples. A prediction looks up the `k` training samples
/// closest to the record in Euclidean distance, or all of them if there are fewer than `k`.
/// Classification returns the most frequent label among them, preferring the smaller label on a
/// tie, and regression returns their mean target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNearestNeighbours<F> {
    records: Array2<F>,
    targets: Array1<F>,
    k: usize,
    task: Task,
}

impl<F: Float> KNearestNeighbours<F> {
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn task(&self) -> Task {
        self.task
    }

    /// Number of stored training samples
    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    fn vote(&self, neighbours: &[usize]) -> F {
        let mut labels = neighbours
            .iter()
            .map(|&idx| self.targets[idx])
            .collect::<Vec<_>>();
        labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut best: Option<(F, usize)> = None;
        let mut current: Option<(F, usize)> = None;
        for label in labels {
            current = match current {
                Some((last, count)) if last == label => Some((last, count + 1)),
                _ => Some((label, 1)),
            };
            if let Some((label, count)) = current {
                if best.map_or(true, |(_, best_count)| count > best_count) {
                    best = Some((label, count));
                }
            }
        }

        best.map(|(label, _)| label).unwrap_or_else(F::zero)
    }

    fn average(&self, neighbours: &[usize]) -> F {
        let sum = neighbours.iter().map(|&idx| self.targets[idx]).sum::<F>();
        sum / F::cast(neighbours.len())
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for KNearestNeighbours<F>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.records.ncols(),
            "The number of features must match the number of features seen during fitting."
        );

        let search = LinearSearch::from_batch(&self.records);
        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            let neighbours = search.k_nearest(&row, self.k);
            *target = match self.task {
                Task::Classification => self.vote(&neighbours),
                Task::Regression => self.average(&neighbours),
            };
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float> FeatureDim for KNearestNeighbours<F> {
    fn nfeatures(&self) -> usize {
        self.records.ncols()
    }
}

impl<F: Float, D, T> Fit<ArrayBase<D, Ix2>, T, NnError> for KnnValidParams<F>
where
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = F>,
{
    type Object = KNearestNeighbours<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.check_shapes()?;
        if dataset.nsamples() == 0 {
            return Err(sylva::Error::NotEnoughSamples.into());
        }

        debug!(
            k = self.k(),
            nsamples = dataset.nsamples(),
            "stored training samples for nearest neighbour search"
        );

        Ok(KNearestNeighbours {
            records: dataset.records().to_owned(),
            targets: dataset.as_single_targets().to_owned(),
            k: self.k(),
            task: self.task(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sylva::{Dataset, ParamGuard};

    #[test]
    fn majority_vote() -> Result<()> {
        let dataset = Dataset::new(
            array![[0.], [1.], [2.], [10.], [11.], [12.]],
            array![0., 0., 1., 1., 1., 1.],
        );
        let model = KNearestNeighbours::params().k(3).fit(&dataset)?;

        assert_eq!(model.predict(&array![[0.5], [11.5], [2.1]]), array![0., 1., 0.]);
        assert_eq!(model.nsamples(), 6);

        Ok(())
    }

    #[test]
    fn vote_ties_prefer_smaller_label() -> Result<()> {
        let dataset = Dataset::new(array![[0.], [1.]], array![2., 1.]);
        let model = KNearestNeighbours::params().k(2).fit(&dataset)?;

        assert_eq!(model.predict(&array![[0.]]), array![1.]);

        Ok(())
    }

    #[test]
    fn regression_mean_of_neighbours() -> Result<()> {
        let dataset = Dataset::new(array![[0.], [1.], [2.], [100.]], array![1., 2., 3., 50.]);
        let model = KNearestNeighbours::regressor().k(2).fit(&dataset)?;

        assert_abs_diff_eq!(model.predict(&array![[0.4]]), array![1.5]);
        assert_abs_diff_eq!(model.predict(&array![[99.]]), array![26.5]);

        Ok(())
    }

    #[test]
    fn k_larger_than_training_set() -> Result<()> {
        let dataset = Dataset::new(array![[0.], [1.], [2.]], array![1., 2., 6.]);
        let model = KNearestNeighbours::regressor().k(10).fit(&dataset)?;

        assert_abs_diff_eq!(model.predict(&array![[5.]]), array![3.]);

        Ok(())
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let dataset = Dataset::new(Array2::<f64>::zeros((0, 2)), Array1::zeros(0));
        let res = KNearestNeighbours::params().check_unwrap().fit(&dataset);

        assert!(matches!(
            res,
            Err(NnError::BaseCrate(sylva::Error::NotEnoughSamples))
        ));
    }

    #[test]
    #[should_panic]
    fn panic_on_feature_mismatch() {
        let dataset = Dataset::new(array![[0., 1.], [1., 0.]], array![0., 1.]);
        let model = KNearestNeighbours::params().check_unwrap().fit(&dataset).unwrap();

        model.predict(&array![[0.]]);
    }
}
