//! Polynomial basis expansion.
//!
//! A scalar feature `x` becomes the design row `[1, x, x², …, x^d]`. The bias
//! column comes first so coefficient `i` multiplies `x^i`.

use nalgebra::DMatrix;

/// Fill `out` with `[1, x, …, x^(out.len()-1)]`.
///
/// Powers are built by repeated multiplication so each entry is exact for
/// small integer-valued inputs.
pub fn fill_poly_row(x: f64, out: &mut [f64]) {
    let mut p = 1.0;
    for slot in out.iter_mut() {
        *slot = p;
        p *= x;
    }
}

/// Design matrix with one row per `x` and `degree + 1` columns.
pub fn poly_design(xs: &[f64], degree: usize) -> DMatrix<f64> {
    let cols = degree + 1;
    let mut data = vec![0.0; xs.len() * cols];
    for (row, &x) in data.chunks_exact_mut(cols).zip(xs) {
        fill_poly_row(x, row);
    }
    DMatrix::from_row_slice(xs.len(), cols, &data)
}
