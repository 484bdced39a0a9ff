//!
//! # Decision tree learning
//! `sylva-trees` provides a pure Rust implementation of classification and regression trees
//! (CART).
//!
//! # The big picture
//!
//! `sylva-trees` is a crate in the `sylva` workspace, a small toolkit of classical supervised
//! learning algorithms sharing one fit/predict contract.
//!
//! Decision Trees (DTs) are a non-parametric supervised learning method used for classification and regression.
//! The goal is to create a model that predicts the value of a target variable by learning simple decision rules
//! inferred from the data features.
//!
//! # Current state
//!
//! `sylva-trees` provides an [implementation](DecisionTree) of single-tree fitting for
//! classification, with Gini impurity, and for regression, with the sum of squared deviations.
//! Fitted trees can be inspected node by node and, through the
//! [`DecisionTreeEstimator`], be scored, reconfigured and stored to disk.
//!

mod decision_trees;

pub use decision_trees::*;

pub use sylva::error::Result;
