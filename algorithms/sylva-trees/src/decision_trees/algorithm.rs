//! Classification and regression trees
//!
use std::cmp::Ordering;
use std::collections::BTreeSet;

use ndarray::{Array1, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::split::{best_split, SplitTarget};
use super::NodeIter;
use super::{DecisionTreeValidParams, Task};
use sylva::{
    dataset::AsSingleTargets,
    error::{Error, Result},
    traits::*,
    DatasetBase, Float,
};

/// Occurrences of every label in a leaf, sorted by label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCounts<F> {
    counts: Vec<(F, usize)>,
}

impl<F: Float> LabelCounts<F> {
    fn from_labels(labels: impl Iterator<Item = F>) -> Self {
        let mut labels = labels.collect::<Vec<_>>();
        labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mut counts: Vec<(F, usize)> = Vec::new();
        for label in labels {
            match counts.last_mut() {
                Some((last, count)) if *last == label => *count += 1,
                _ => counts.push((label, 1)),
            }
        }

        LabelCounts { counts }
    }

    /// Pairs of label and number of occurrences, in ascending label order
    pub fn counts(&self) -> &[(F, usize)] {
        &self.counts
    }

    /// Number of occurrences of `label`
    pub fn count(&self, label: F) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Number of samples which reached the leaf
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// The most frequent label. If two labels have the same frequency, the smaller one is
    /// returned.
    pub fn majority(&self) -> F {
        self.counts
            .iter()
            .fold(None, |best: Option<(F, usize)>, &(label, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((label, count)),
            })
            .map(|(label, _)| label)
            .unwrap_or_else(F::zero)
    }
}

/// Content of a leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Leaf<F> {
    /// Label frequencies of a classification leaf
    Classes(LabelCounts<F>),
    /// Mean target of a regression leaf
    Mean(F),
}

impl<F: Float> Leaf<F> {
    /// The value predicted for every sample reaching this leaf
    pub fn prediction(&self) -> F {
        match self {
            Leaf::Classes(counts) => counts.majority(),
            Leaf::Mean(mean) => *mean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind<F> {
    /// Samples with `x[feature_idx] < threshold` continue left, all others right
    Split {
        feature_idx: usize,
        threshold: F,
        left: Box<TreeNode<F>>,
        right: Box<TreeNode<F>>,
    },
    Leaf(Leaf<F>),
}

/// A node in the decision tree
///
/// Every node owns its children. Internal nodes always have two children, built from non-empty
/// disjoint subsets of the samples of their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode<F> {
    depth: usize,
    nsamples: usize,
    kind: NodeKind<F>,
}

impl<F: Float> TreeNode<F> {
    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Returns the depth of the node in the decision tree, the root has depth zero
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of training samples which reached this node
    pub fn nsamples(&self) -> usize {
        self.nsamples
    }

    pub fn kind(&self) -> &NodeKind<F> {
        &self.kind
    }

    /// Returns `Some(prediction)` for leaf nodes and `None` for internal nodes.
    pub fn prediction(&self) -> Option<F> {
        self.leaf().map(Leaf::prediction)
    }

    /// Returns the content of leaf nodes and `None` for internal nodes
    pub fn leaf(&self) -> Option<&Leaf<F>> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split { .. } => None,
        }
    }

    /// Returns the split (feature index, threshold) of internal nodes
    pub fn split(&self) -> Option<(usize, F)> {
        match &self.kind {
            NodeKind::Split {
                feature_idx,
                threshold,
                ..
            } => Some((*feature_idx, *threshold)),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Returns both children, first left then right
    pub fn children(&self) -> Option<(&TreeNode<F>, &TreeNode<F>)> {
        match &self.kind {
            NodeKind::Split { left, right, .. } => Some((left.as_ref(), right.as_ref())),
            NodeKind::Leaf(_) => None,
        }
    }
}

/// Grows a tree on a fixed training set
struct TreeBuilder<'a, F: Float> {
    records: ArrayView2<'a, F>,
    labels: ArrayView1<'a, F>,
    target: SplitTarget<'a, F>,
    params: &'a DecisionTreeValidParams<F>,
}

impl<'a, F: Float> TreeBuilder<'a, F> {
    fn new(
        records: ArrayView2<'a, F>,
        labels: ArrayView1<'a, F>,
        params: &'a DecisionTreeValidParams<F>,
    ) -> Self {
        let target = match params.task() {
            Task::Classification => SplitTarget::classes(labels),
            Task::Regression => SplitTarget::values(labels),
        };

        TreeBuilder {
            records,
            labels,
            target,
            params,
        }
    }

    /// Build the subtree for `rows`, or nothing if there are no rows
    fn build(&self, rows: &[usize], depth: usize) -> Option<TreeNode<F>> {
        if rows.is_empty() {
            None
        } else {
            Some(self.grow(rows, depth))
        }
    }

    /// Recursively fits the node of a non-empty set of rows
    fn grow(&self, rows: &[usize], depth: usize) -> TreeNode<F> {
        if depth >= self.params.max_depth()
            || rows.len() <= self.params.min_size()
            || self.is_pure(rows)
        {
            return self.leaf(rows, depth);
        }

        let split = match best_split(&self.records, &self.target, rows) {
            Some(split) => split,
            None => return self.leaf(rows, depth),
        };
        trace!(
            depth,
            feature = split.feature_idx,
            threshold = %split.threshold,
            score = %split.score,
            "split node"
        );

        TreeNode {
            depth,
            nsamples: rows.len(),
            kind: NodeKind::Split {
                feature_idx: split.feature_idx,
                threshold: split.threshold,
                left: Box::new(self.grow(&split.left, depth + 1)),
                right: Box::new(self.grow(&split.right, depth + 1)),
            },
        }
    }

    /// All labels are exactly equal, regardless of the task
    fn is_pure(&self, rows: &[usize]) -> bool {
        let first = self.labels[rows[0]];
        rows.iter().all(|&row| self.labels[row] == first)
    }

    fn leaf(&self, rows: &[usize], depth: usize) -> TreeNode<F> {
        let labels = rows.iter().map(|&row| self.labels[row]);
        let leaf = match self.params.task() {
            Task::Classification => Leaf::Classes(LabelCounts::from_labels(labels)),
            Task::Regression => {
                let sum = labels.fold(F::zero(), |sum, y| sum + y);
                Leaf::Mean(sum / F::cast(rows.len()))
            }
        };

        TreeNode {
            depth,
            nsamples: rows.len(),
            kind: NodeKind::Leaf(leaf),
        }
    }
}

/// A fitted decision tree model for classification or regression.
///
/// ### Structure
/// A decision tree structure is a binary tree where:
/// * Each internal node specifies a decision, represented by a choice of a feature and a
///   threshold. Samples with a feature value below the threshold continue in the left subtree,
///   all others in the right one.
/// * Each leaf node makes a prediction. Classification leaves keep the frequencies of the labels
///   of the training samples that reached them and predict the most frequent one. Regression
///   leaves predict the mean target of those samples.
///
/// ### Algorithm
/// Starting at the root with all training samples, every node tries each distinct value of
/// every feature as threshold and keeps the split with the lowest impurity. Growth stops when
/// the maximal depth is reached, when a node holds at most `min_size` samples, when all targets
/// of a node are equal or when no threshold separates the samples.
///
/// ### Predictions
/// To make predictions for a new sample, the tree is traversed from the root following the
/// decisions of the internal nodes, and the prediction of the reached leaf is returned.
///
/// ### Example
///
/// ```rust
/// use sylva_trees::DecisionTree;
/// use sylva::prelude::*;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[1.], [2.], [3.], [10.]], array![1., 2., 3., 10.]);
/// let tree = DecisionTree::regressor().max_depth(1).fit(&dataset).unwrap();
///
/// assert_eq!(tree.root_node().split(), Some((0, 10.)));
/// assert_eq!(tree.predict(&array![[0.], [12.]]), array![2., 10.]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree<F> {
    root_node: TreeNode<F>,
    task: Task,
    num_features: usize,
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>> for DecisionTree<F> {
    /// Make predictions for each row of a matrix of features `x`.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.num_features,
            "The number of features must match the number of features seen during fitting."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = make_prediction(&row, &self.root_node);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float> FeatureDim for DecisionTree<F> {
    fn nfeatures(&self) -> usize {
        self.num_features
    }
}

impl<F: Float, D, T> Fit<ArrayBase<D, Ix2>, T, Error> for DecisionTreeValidParams<F>
where
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = F>,
{
    type Object = DecisionTree<F>;

    /// Fit a decision tree using `hyperparamters` on the dataset consisting of
    /// a matrix of features `x` and an array of targets `y`.
    ///
    /// Targets have to be finite, `NaN` or infinite values are rejected with
    /// [`Error::Parameters`].
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.check_shapes()?;

        let labels = dataset.as_single_targets();
        if let Some(row) = labels.iter().position(|y| !y.is_finite()) {
            return Err(Error::Parameters(format!(
                "target of sample {} is not a finite number",
                row
            )));
        }
        let builder = TreeBuilder::new(dataset.records().view(), labels, self);
        let all_rows = (0..dataset.nsamples()).collect::<Vec<_>>();

        let root_node = builder.build(&all_rows, 0).ok_or(Error::NotEnoughSamples)?;
        let tree = DecisionTree {
            root_node,
            task: self.task(),
            num_features: dataset.nfeatures(),
        };

        debug!(
            task = %tree.task,
            nodes = tree.num_nodes(),
            leaves = tree.num_leaves(),
            depth = tree.max_depth(),
            "fitted decision tree"
        );
        if tree.root_node.is_leaf() && !builder.is_pure(&all_rows) {
            warn!(
                nsamples = all_rows.len(),
                "decision tree consists of a single leaf, no split separates the samples"
            );
        }

        Ok(tree)
    }
}

impl<F: Float> DecisionTree<F> {
    /// Create a node iterator in depth-first pre-order
    pub fn iter_nodes(&self) -> NodeIter<'_, F> {
        // stack of nodes yet to explore
        let stack = vec![&self.root_node];

        NodeIter::new(stack)
    }

    /// Return the indices of all features used in a split, in ascending order
    pub fn features(&self) -> Vec<usize> {
        self.iter_nodes()
            .filter_map(|node| node.split().map(|(feature_idx, _)| feature_idx))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &TreeNode<F> {
        &self.root_node
    }

    /// Return max depth of the tree
    pub fn max_depth(&self) -> usize {
        self.iter_nodes()
            .fold(0, |max, node| usize::max(max, node.depth))
    }

    /// Return the number of leaves in this tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    /// Return the number of nodes in this tree, internal nodes and leaves
    pub fn num_nodes(&self) -> usize {
        self.iter_nodes().count()
    }

    /// Number of features the tree was fitted on
    pub fn nfeatures(&self) -> usize {
        self.num_features
    }

    pub fn task(&self) -> Task {
        self.task
    }
}

/// Predict a single sample by following the splits from `node` down to a leaf
fn make_prediction<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix1>, node: &TreeNode<F>) -> F {
    let mut node = node;
    loop {
        match &node.kind {
            NodeKind::Leaf(leaf) => return leaf.prediction(),
            NodeKind::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                node = if x[*feature_idx] < *threshold {
                    left.as_ref()
                } else {
                    right.as_ref()
                };
            }
        }
    }
}
