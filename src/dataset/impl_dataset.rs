use ndarray::{s, ArrayBase, Axis, Data, Ix2};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{AsSingleTargets, Dataset, DatasetBase, DatasetView, Float, Records};
use crate::error::{Error, Result};

impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// The alignment of records and targets is not checked here; estimators validate it when
    /// fitting with [`check_shapes`](DatasetBase::check_shapes).
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Return references to the records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Return references to the targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Updates the records of a dataset, keeping targets and feature names
    pub fn with_records<R2: Records>(self, records: R2) -> DatasetBase<R2, T> {
        DatasetBase {
            records,
            targets: self.targets,
            feature_names: self.feature_names,
        }
    }

    pub fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    pub fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// correlation analysis or feature importance. If no names were set, `feature-<index>` is
    /// used for every column.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }
}

impl<F: Float, D: Data<Elem = F>, T: AsSingleTargets<Elem = F>> DatasetBase<ArrayBase<D, Ix2>, T> {
    /// Check that there is exactly one target per record
    pub fn check_shapes(&self) -> Result<()> {
        let (nrecords, ntargets) = (self.records.nrows(), self.targets.as_single_targets().len());

        if nrecords != ntargets {
            Err(Error::MismatchedShapes(nrecords, ntargets))
        } else {
            Ok(())
        }
    }

    /// Distinct target values in ascending order
    pub fn labels(&self) -> Vec<F> {
        let mut labels = self.targets.as_single_targets().to_vec();
        labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Greater));
        labels.dedup();

        labels
    }

    /// Creates a view of a dataset
    pub fn view(&self) -> DatasetView<'_, F> {
        DatasetBase::new(self.records.view(), self.targets.as_single_targets())
            .with_feature_names(self.feature_names.clone())
    }

    /// Shuffle the order of the observations, keeping records and targets paired
    pub fn shuffle<Rn: Rng>(&self, rng: &mut Rn) -> Result<Dataset<F>> {
        self.check_shapes()?;

        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        Ok(self.select(&indices))
    }

    /// Split dataset into two disjoint chunks
    ///
    /// This function splits the observations in a dataset into two disjoint chunks. The splitting
    /// threshold is calculated with the `ratio`. For example a ratio of `0.9` allocates 90% to the
    /// first chunk and 10% to the second. This is often used in training, validation splitting
    /// procedures. The order of the observations is kept.
    pub fn split_with_ratio(&self, ratio: f32) -> (Dataset<F>, Dataset<F>) {
        let n = (self.nsamples() as f32 * ratio).ceil() as usize;
        let targets = self.targets.as_single_targets();

        let first = DatasetBase::new(
            self.records.slice(s![..n, ..]).to_owned(),
            targets.slice(s![..n]).to_owned(),
        )
        .with_feature_names(self.feature_names.clone());
        let second = DatasetBase::new(
            self.records.slice(s![n.., ..]).to_owned(),
            targets.slice(s![n..]).to_owned(),
        )
        .with_feature_names(self.feature_names.clone());

        (first, second)
    }

    /// Shuffle and split the dataset into a training and a test set
    ///
    /// `test_size` is the fraction of observations in the test set and has to lie strictly
    /// between zero and one. The test set receives `floor(nsamples * test_size)` observations.
    pub fn train_test_split<Rn: Rng>(
        &self,
        test_size: f32,
        rng: &mut Rn,
    ) -> Result<(Dataset<F>, Dataset<F>)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(Error::Parameters(format!(
                "test size should lie in (0, 1), but was {}",
                test_size
            )));
        }

        let shuffled = self.shuffle(rng)?;
        let ntest = (shuffled.nsamples() as f32 * test_size).floor() as usize;
        let (test, train) = shuffled.split_at(ntest);

        Ok((train, test))
    }

    /// Copy the observations at `indices` into a new dataset, in the given order
    pub fn select(&self, indices: &[usize]) -> Dataset<F> {
        DatasetBase::new(
            self.records.select(Axis(0), indices),
            self.targets.as_single_targets().select(Axis(0), indices),
        )
        .with_feature_names(self.feature_names.clone())
    }

    fn split_at(&self, idx: usize) -> (Dataset<F>, Dataset<F>) {
        let (first, second): (Vec<usize>, Vec<usize>) =
            (0..self.nsamples()).partition(|i| *i < idx);

        (self.select(&first), self.select(&second))
    }
}
