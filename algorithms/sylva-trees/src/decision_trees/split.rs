//! Impurity measures and the search for the best split of a node
//!
use std::cmp::Ordering;

use ndarray::{ArrayView1, ArrayView2};
use sylva::Float;

/// Gini impurity `1 - sum_c p_c^2` of a set given by its class counts
///
/// An empty set has zero impurity.
pub fn gini_impurity<F: Float>(class_counts: &[usize]) -> F {
    let total = class_counts.iter().sum::<usize>();
    if total == 0 {
        return F::zero();
    }

    let total = F::cast(total);
    let purity = class_counts
        .iter()
        .map(|&count| F::cast(count) / total)
        .map(|p| p * p)
        .sum::<F>();

    F::one() - purity
}

/// Gini impurity of both sides of a split, weighted by their share of the samples
pub fn weighted_gini<F: Float>(left_counts: &[usize], right_counts: &[usize]) -> F {
    let nleft = left_counts.iter().sum::<usize>();
    let nright = right_counts.iter().sum::<usize>();
    let n = F::cast(nleft + nright);
    if n == F::zero() {
        return F::zero();
    }

    F::cast(nleft) / n * gini_impurity::<F>(left_counts)
        + F::cast(nright) / n * gini_impurity::<F>(right_counts)
}

/// Sum of squared deviations from the mean, zero for an empty set
pub fn sum_squared_deviations<F: Float, I>(values: I) -> F
where
    I: IntoIterator<Item = F>,
    I::IntoIter: Clone,
{
    let values = values.into_iter();
    let (sum, count) = values
        .clone()
        .fold((F::zero(), 0usize), |(sum, count), y| (sum + y, count + 1));
    if count == 0 {
        return F::zero();
    }

    let mean = sum / F::cast(count);
    values.map(|y| (y - mean) * (y - mean)).sum()
}

/// Unnormalized regression score of a split
///
/// Both sides are scored independently against their own mean. The score is not divided by the
/// number of samples, which is identical for all candidates of a node.
pub fn regression_score<F: Float>(left: &[F], right: &[F]) -> F {
    sum_squared_deviations(left.iter().copied()) + sum_squared_deviations(right.iter().copied())
}

/// Classification score of a split on raw labels
pub fn classification_score<F: Float>(left: &[F], right: &[F]) -> F {
    let classes = sorted_distinct(left.iter().chain(right.iter()).copied());
    let counts = |side: &[F]| {
        let mut counts = vec![0; classes.len()];
        for label in side {
            if let Some(idx) = class_index(&classes, *label) {
                counts[idx] += 1;
            }
        }
        counts
    };

    weighted_gini(&counts(left), &counts(right))
}

/// Distinct values in ascending order, NaNs are dropped
pub(crate) fn sorted_distinct<F: Float>(values: impl Iterator<Item = F>) -> Vec<F> {
    let mut values = values.filter(|x| !x.is_nan()).collect::<Vec<_>>();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values.dedup();

    values
}

pub(crate) fn class_index<F: Float>(classes: &[F], label: F) -> Option<usize> {
    classes
        .binary_search_by(|class| class.partial_cmp(&label).unwrap_or(Ordering::Less))
        .ok()
}

/// The targets of a training set, prepared for repeated scoring
pub(crate) enum SplitTarget<'a, F> {
    /// Every sample mapped to the index of its class, `None` for NaN labels
    Classes {
        class_idx: Vec<Option<usize>>,
        nclasses: usize,
    },
    Values(ArrayView1<'a, F>),
}

impl<'a, F: Float> SplitTarget<'a, F> {
    pub(crate) fn classes(labels: ArrayView1<'a, F>) -> Self {
        let classes = sorted_distinct(labels.iter().copied());
        let class_idx = labels
            .iter()
            .map(|label| class_index(&classes, *label))
            .collect();

        SplitTarget::Classes {
            class_idx,
            nclasses: classes.len(),
        }
    }

    pub(crate) fn values(labels: ArrayView1<'a, F>) -> Self {
        SplitTarget::Values(labels)
    }

    /// Score a partition of samples, lower is better
    fn score(&self, left: &[usize], right: &[usize]) -> F {
        match self {
            SplitTarget::Classes {
                class_idx,
                nclasses,
            } => {
                let counts = |rows: &[usize]| {
                    let mut counts = vec![0; *nclasses];
                    for idx in rows.iter().filter_map(|&row| class_idx[row]) {
                        counts[idx] += 1;
                    }
                    counts
                };

                weighted_gini(&counts(left), &counts(right))
            }
            SplitTarget::Values(y) => {
                sum_squared_deviations(left.iter().map(|&row| y[row]))
                    + sum_squared_deviations(right.iter().map(|&row| y[row]))
            }
        }
    }
}

/// An accepted split of a node, both sides are non-empty
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Split<F> {
    pub feature_idx: usize,
    pub threshold: F,
    pub score: F,
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

/// Partition `rows` into samples with `x[feature] < threshold` and the rest
fn partition<F: Float>(
    records: &ArrayView2<F>,
    rows: &[usize],
    feature_idx: usize,
    threshold: F,
    left: &mut Vec<usize>,
    right: &mut Vec<usize>,
) {
    left.clear();
    right.clear();

    for &row in rows {
        if records[(row, feature_idx)] < threshold {
            left.push(row);
        } else {
            right.push(row);
        }
    }
}

/// Find the split of `rows` with the lowest score
///
/// Every distinct value of every feature is tried as threshold, features in column order and
/// values in ascending order. A candidate replaces the current best only if its score is strictly
/// lower, so the first candidate wins ties. Candidates which leave one side empty are skipped.
/// Returns `None` if no candidate separates the samples.
pub(crate) fn best_split<F: Float>(
    records: &ArrayView2<F>,
    target: &SplitTarget<F>,
    rows: &[usize],
) -> Option<Split<F>> {
    let mut best: Option<(usize, F, F)> = None;
    let (mut left, mut right) = (Vec::with_capacity(rows.len()), Vec::with_capacity(rows.len()));

    for feature_idx in 0..records.ncols() {
        let thresholds = sorted_distinct(rows.iter().map(|&row| records[(row, feature_idx)]));

        // the smallest value always leaves the left side empty
        for &threshold in thresholds.iter().skip(1) {
            partition(records, rows, feature_idx, threshold, &mut left, &mut right);
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let score = target.score(&left, &right);
            let improves = match best {
                None => true,
                Some((_, _, best_score)) => score < best_score,
            };
            if improves {
                best = Some((feature_idx, threshold, score));
            }
        }
    }

    best.map(|(feature_idx, threshold, score)| {
        partition(records, rows, feature_idx, threshold, &mut left, &mut right);

        Split {
            feature_idx,
            threshold,
            score,
            left,
            right,
        }
    })
}
