//! `sylva-nn` provides nearest neighbour search and a k-nearest neighbour estimator.
//!
//! The estimator keeps the training samples and, for every record, consults the `k` samples
//! closest to it in Euclidean distance. Classification takes a majority vote, regression the mean
//! target. [`KnnEstimator`] wraps the model in the uniform `sylva` estimator interface.
//!
//! ```rust
//! use sylva::prelude::*;
//! use sylva_nn::{KNearestNeighbours, KnnEstimator};
//! use ndarray::array;
//!
//! let dataset = Dataset::new(array![[0., 0.], [0., 1.], [5., 5.], [6., 5.]], array![0., 0., 1., 1.]);
//!
//! let mut estimator = KnnEstimator::new(KNearestNeighbours::params().k(1));
//! estimator.fit(&dataset).unwrap();
//!
//! assert_eq!(estimator.predict(&array![[5.5, 4.]]).unwrap(), array![1.]);
//! ```
mod error;
mod heap_elem;
mod hyperparams;
mod knn;
mod linear;

pub use error::{NnError, Result};
pub use hyperparams::{KnnEstimator, KnnParams, KnnValidParams};
pub use knn::KNearestNeighbours;
pub use linear::{sq_l2_dist, LinearSearch};
pub use sylva::Task;
