//! Encoding of class labels
use ndarray::{Array2, ArrayBase, Data, Ix1};
use sylva::dataset::Float;

use crate::error::{PreprocessingError, Result};

/// Encodes integer class labels as rows of indicator values
///
/// Label `c` becomes a row with a one in column `c` and zeros elsewhere. The matrix has
/// `max(labels) + 1` columns, so classes which never occur still get a column. An empty input
/// gives an empty matrix with a single column.
///
/// # Errors
///
/// Returns [`InvalidLabel`](PreprocessingError::InvalidLabel) if a label is negative, fractional
/// or not finite.
///
/// ```rust
/// use sylva_preprocessing::encoding::one_hot;
/// use ndarray::array;
///
/// let encoded = one_hot(&array![0., 2., 1.]).unwrap();
/// assert_eq!(encoded, array![[1., 0., 0.], [0., 0., 1.], [0., 1., 0.]]);
/// ```
pub fn one_hot<F: Float, D: Data<Elem = F>>(labels: &ArrayBase<D, Ix1>) -> Result<Array2<F>> {
    let classes = labels
        .iter()
        .map(|&label| {
            let class = if label.fract() == F::zero() {
                label.to_usize()
            } else {
                None
            };
            class.ok_or_else(|| {
                PreprocessingError::InvalidLabel(label.to_f64().unwrap_or(f64::NAN))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let nclasses = classes.iter().copied().max().unwrap_or(0) + 1;
    let mut encoded = Array2::zeros((classes.len(), nclasses));
    for (row, class) in classes.into_iter().enumerate() {
        encoded[(row, class)] = F::one();
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn encodes_labels() {
        let encoded = one_hot(&array![1., 0., 1., 3.]).unwrap();

        assert_eq!(
            encoded,
            array![
                [0., 1., 0., 0.],
                [1., 0., 0., 0.],
                [0., 1., 0., 0.],
                [0., 0., 0., 1.]
            ]
        );
    }

    #[test]
    fn empty_labels() {
        let encoded = one_hot(&Array1::<f32>::zeros(0)).unwrap();
        assert_eq!(encoded.dim(), (0, 1));
    }

    #[test]
    fn rejects_invalid_labels() {
        for label in [-1., 0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                one_hot(&array![0., label]),
                Err(PreprocessingError::InvalidLabel(_))
            ));
        }
    }
}
