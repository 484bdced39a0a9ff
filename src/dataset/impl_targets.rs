use super::{AsSingleTargets, DatasetBase, Records};
use ndarray::{ArrayBase, ArrayView1, Data, Ix1};

/// A NdArray can act as targets
impl<L, S: Data<Elem = L>> AsSingleTargets for ArrayBase<S, Ix1> {
    type Elem = L;

    fn as_single_targets(&self) -> ArrayView1<'_, L> {
        self.view()
    }
}

/// A dataset forwards to its targets
impl<R: Records, T: AsSingleTargets> AsSingleTargets for DatasetBase<R, T> {
    type Elem = T::Elem;

    fn as_single_targets(&self) -> ArrayView1<'_, Self::Elem> {
        self.targets.as_single_targets()
    }
}
