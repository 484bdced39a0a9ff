//! Datasets
//!
//! This module implements the dataset struct and various helper traits to extend its
//! functionality.
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Ix1, Ix2, OwnedRepr, ScalarOperand};
use num_traits::{AsPrimitive, FromPrimitive, NumAssignOps, NumCast};
use serde::{de::DeserializeOwned, Serialize};

use std::fmt;
use std::iter::Sum;

mod impl_dataset;
mod impl_records;
mod impl_targets;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in records of a dataset and
/// in the targets as well, where classification labels are stored as integral floats.
///
/// Every float is serializable, so that any model built on top of it can be persisted.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Sum
    + NumAssignOps
    + AsPrimitive<usize>
    + ScalarOperand
    + approx::AbsDiffEq
    + Serialize
    + DeserializeOwned
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// DatasetBase
///
/// This is the fundamental structure of a dataset. It contains a number of records about the data
/// and the targets, which must be aligned row by row with the records, plus optional feature
/// names.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures)
/// * `targets`: a one-dimensional array with dimensionality (nsamples)
/// * `feature_names`: optional descriptive feature names with dimensionality (nfeatures)
///
/// # Trait bounds
///
/// * `R: Records`: generic over owned feature matrices and views
/// * `T`: generic over any `ndarray` vector which can be used as targets. The `AsSingleTargets`
/// trait bound is omitted here to avoid some repetition in `src/dataset/impl_dataset.rs`
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<R, T>
where
    R: Records,
{
    pub records: R,
    pub targets: T,

    feature_names: Vec<String>,
}

/// Dataset
///
/// The most commonly used type of dataset. It contains a number of records stored as an
/// `Array2` and a single target per record stored as an `Array1`.
pub type Dataset<F> = DatasetBase<ArrayBase<OwnedRepr<F>, Ix2>, ArrayBase<OwnedRepr<F>, Ix1>>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a, F> = DatasetBase<ArrayView2<'a, F>, ArrayView1<'a, F>>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

/// Return a view on a single target variable
pub trait AsSingleTargets {
    type Elem;

    fn as_single_targets(&self) -> ArrayView1<'_, Self::Elem>;
}
