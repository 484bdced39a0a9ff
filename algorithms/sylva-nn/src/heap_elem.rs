use std::cmp::{Ordering, Reverse};

use noisy_float::{checkers::NumChecker, NoisyFloat};
use sylva::Float;

/// Heap entry ordered by its distance only
pub(crate) struct HeapElem<D: Ord, T> {
    pub(crate) dist: D,
    pub(crate) elem: T,
}

impl<D: Ord, T> PartialEq for HeapElem<D, T> {
    fn eq(&self, other: &Self) -> bool {
        self.dist.eq(&other.dist)
    }
}
impl<D: Ord, T> Eq for HeapElem<D, T> {}

impl<D: Ord, T> PartialOrd for HeapElem<D, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.dist.partial_cmp(&other.dist)
    }
}

impl<D: Ord, T> Ord for HeapElem<D, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.cmp(&other.dist)
    }
}

/// Pops the smallest distance first, equal distances in ascending sample order
pub(crate) type MinHeapElem<F> = HeapElem<Reverse<(NoisyFloat<F, NumChecker>, usize)>, usize>;

impl<F: Float> MinHeapElem<F> {
    pub(crate) fn new(dist: F, idx: usize) -> Self {
        // NaN distances come from NaN features and rank behind every real sample
        let dist = if dist.is_nan() { F::infinity() } else { dist };

        Self {
            dist: Reverse((NoisyFloat::new(dist), idx)),
            elem: idx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn pops_closest_then_lowest_index() {
        let mut heap = BinaryHeap::new();
        heap.push(MinHeapElem::new(2.0f64, 0));
        heap.push(MinHeapElem::new(f64::NAN, 1));
        heap.push(MinHeapElem::new(1.0, 3));
        heap.push(MinHeapElem::new(1.0, 2));

        let order = std::iter::from_fn(|| heap.pop().map(|e| e.elem)).collect::<Vec<_>>();
        assert_eq!(order, vec![2, 3, 0, 1]);
    }
}
