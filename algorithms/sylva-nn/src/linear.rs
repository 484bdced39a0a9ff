use std::collections::BinaryHeap;

use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2, Zip};
use sylva::Float;

use crate::heap_elem::MinHeapElem;

/// Squared Euclidean distance between two points of equal dimension
pub fn sq_l2_dist<F: Float>(a: &ArrayView1<F>, b: &ArrayView1<F>) -> F {
    Zip::from(a).and(b).fold(F::zero(), |acc, &x, &y| {
        let diff = x - y;
        acc + diff * diff
    })
}

/// Brute-force nearest neighbour search over the rows of a matrix
///
/// Every query computes the distance to all stored points, which makes the search exact and
/// independent of the dimensionality, at the cost of linear time per query.
pub struct LinearSearch<'a, F: Float>(ArrayView2<'a, F>);

impl<'a, F: Float> LinearSearch<'a, F> {
    pub fn from_batch<D: Data<Elem = F>>(batch: &'a ArrayBase<D, Ix2>) -> Self {
        Self(batch.view())
    }

    /// Indices of the `min(k, n)` stored points closest to `point`, closest first
    ///
    /// Points at the same distance are returned in the order they were stored.
    pub fn k_nearest<D: Data<Elem = F>>(
        &self,
        point: &ArrayBase<D, Ix1>,
        k: usize,
    ) -> Vec<usize> {
        let point = point.view();
        let mut heap = self
            .0
            .rows()
            .into_iter()
            .enumerate()
            .map(|(idx, pt)| MinHeapElem::new(sq_l2_dist(&point, &pt), idx))
            .collect::<BinaryHeap<_>>();

        let k = k.min(heap.len());
        std::iter::from_fn(|| heap.pop().map(|e| e.elem))
            .take(k)
            .collect()
    }
}
