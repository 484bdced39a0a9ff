//! Small dense linear algebra helpers
//!
//! Pure Rust routines for the normal equations of least squares. Everything else is provided by
//! `ndarray` directly.
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix2};

use crate::dataset::Float;
use crate::error::{Error, Result};

/// Invert a square matrix
///
/// Uses Gauss-Jordan elimination with partial pivoting. Returns [`Error::SingularMatrix`] if a
/// pivot vanishes, i.e. its magnitude is below `n * eps * max|a_ij|`.
pub fn inverse<F: Float, D: Data<Elem = F>>(a: &ArrayBase<D, Ix2>) -> Result<Array2<F>> {
    let (n, m) = a.dim();
    if n != m {
        return Err(Error::Parameters(format!(
            "only square matrices can be inverted, got {}x{}",
            n, m
        )));
    }

    let scale = a.iter().fold(F::zero(), |acc, x| acc.max(x.abs()));
    let tolerance = F::cast(n) * F::epsilon() * scale;

    let mut lhs = a.to_owned();
    let mut inv = Array2::eye(n);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                lhs[(i, col)]
                    .abs()
                    .partial_cmp(&lhs[(j, col)].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        let pivot = lhs[(pivot_row, col)];
        if pivot.is_nan() || pivot.abs() <= tolerance {
            return Err(Error::SingularMatrix);
        }

        if pivot_row != col {
            swap_rows(&mut lhs, pivot_row, col);
            swap_rows(&mut inv, pivot_row, col);
        }

        lhs.row_mut(col).mapv_inplace(|x| x / pivot);
        inv.row_mut(col).mapv_inplace(|x| x / pivot);

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = lhs[(row, col)];
            if factor == F::zero() {
                continue;
            }

            let lhs_pivot = lhs.row(col).to_owned();
            let inv_pivot = inv.row(col).to_owned();
            lhs.row_mut(row).scaled_add(-factor, &lhs_pivot);
            inv.row_mut(row).scaled_add(-factor, &inv_pivot);
        }
    }

    Ok(inv)
}

fn swap_rows<F: Float>(a: &mut Array2<F>, i: usize, j: usize) {
    for col in 0..a.ncols() {
        a.swap((i, col), (j, col));
    }
}

/// Prepend a column of ones to the records
pub fn add_bias_column<F: Float, D: Data<Elem = F>>(x: &ArrayBase<D, Ix2>) -> Array2<F> {
    let mut out = Array2::ones((x.nrows(), x.ncols() + 1));
    out.slice_mut(s![.., 1..]).assign(x);

    out
}

/// Solve the least squares problem `min |x b - y|^2` through the normal equations
pub fn lstsq<F: Float>(x: &Array2<F>, y: &Array1<F>) -> Result<Array1<F>> {
    if x.nrows() != y.len() {
        return Err(Error::MismatchedShapes(x.nrows(), y.len()));
    }

    let gram = x.t().dot(x);
    let rhs = x.t().dot(y);

    Ok(inverse(&gram)?.dot(&rhs))
}
