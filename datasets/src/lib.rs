//! `sylva-datasets` reads datasets from CSV files and generates synthetic ones for tests and
//! benchmarks.
//!
//! ## The Big Picture
//!
//! `sylva-datasets` is a crate in the `sylva` workspace, a small toolkit of classical supervised
//! learning algorithms sharing one fit/predict contract.
//!
//! ## Current State
//!
//! * [`load_csv`] reads a numeric CSV file into a [`sylva::Dataset`]. The last column holds the
//!   targets, all other columns the features.
//! * [`generate::blobs`] samples labelled points around a set of centroids.
//!
//! ## Loading a dataset
//!
//! ```ignore
//! let (train, valid) = sylva_datasets::load_csv("winequality.csv", true)?
//!     .split_with_ratio(0.8);
//! ```

mod dataset;
mod error;
pub mod generate;

pub use dataset::{load_csv, load_csv_from_reader};
pub use error::{DatasetError, Result};
