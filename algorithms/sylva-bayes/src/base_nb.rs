use std::cmp::Ordering;

use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix2};
use sylva::Float;

/// Common functionality of fitted Naive Bayes models
///
/// Classes are kept in ascending order, and every per-class matrix returned by this trait has one
/// column per class in that order.
pub trait NaiveBayes<F: Float> {
    /// Labels seen during fitting, in ascending order
    fn classes(&self) -> &[F];

    /// Compute the unnormalized posterior log probabilities, one row per sample and one column
    /// per class
    fn joint_log_likelihood(&self, x: ArrayView2<F>) -> Array2<F>;

    #[doc(hidden)]
    fn predict_inplace<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        let joint_log_likelihood = self.joint_log_likelihood(x.view());
        let classes = self.classes();

        for (scores, target) in joint_log_likelihood.rows().into_iter().zip(y.iter_mut()) {
            *target = classes[first_argmax(&scores)];
        }
    }

    /// Compute log-probability estimates for each sample wrt classes
    fn predict_log_proba(&self, x: ArrayView2<F>) -> Array2<F> {
        let mut log_prob = self.joint_log_likelihood(x);

        for mut row in log_prob.rows_mut() {
            let max = row.fold(F::neg_infinity(), |max, &v| max.max(v));
            let log_norm = max + row.mapv(|v| (v - max).exp()).sum().ln();
            row.mapv_inplace(|v| v - log_norm);
        }

        log_prob
    }

    /// Compute probability estimates for each sample wrt classes
    fn predict_proba(&self, x: ArrayView2<F>) -> Array2<F> {
        self.predict_log_proba(x).mapv(|v| v.exp())
    }
}

/// Index of the largest score, the first one on a tie
///
/// NaN scores are never selected. If no score is larger than negative infinity the first class
/// is returned.
pub(crate) fn first_argmax<F: Float>(scores: &ArrayView1<F>) -> usize {
    scores
        .iter()
        .enumerate()
        .fold(
            (0, F::neg_infinity()),
            |(best, best_score), (idx, &score)| {
                if score > best_score {
                    (idx, score)
                } else {
                    (best, best_score)
                }
            },
        )
        .0
}

/// Distinct labels in ascending order together with the rows carrying each of them
///
/// Rows with a NaN label belong to no class.
pub(crate) fn group_by_class<F: Float>(labels: ArrayView1<F>) -> (Vec<F>, Vec<Vec<usize>>) {
    let mut classes = labels
        .iter()
        .copied()
        .filter(|x| !x.is_nan())
        .collect::<Vec<_>>();
    classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    classes.dedup();

    let mut rows = vec![Vec::new(); classes.len()];
    for (row, label) in labels.iter().enumerate() {
        let idx = classes
            .binary_search_by(|class| class.partial_cmp(label).unwrap_or(Ordering::Less));
        if let Ok(idx) = idx {
            rows[idx].push(row);
        }
    }

    (classes, rows)
}
