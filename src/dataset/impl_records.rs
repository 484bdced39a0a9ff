use super::Records;
use ndarray::{ArrayBase, Data, Ix2};

/// Implement records for NdArrays
impl<F, S: Data<Elem = F>> Records for ArrayBase<S, Ix2> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.nrows()
    }

    fn nfeatures(&self) -> usize {
        self.ncols()
    }
}

/// Implement records for references
impl<R: Records> Records for &R {
    type Elem = R::Elem;

    fn nsamples(&self) -> usize {
        (*self).nsamples()
    }

    fn nfeatures(&self) -> usize {
        (*self).nfeatures()
    }
}
