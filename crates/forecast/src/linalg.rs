//! Dense solver for the small normal-equation systems of the lagged regressions.

/// Pivots smaller than this fraction of the largest diagonal entry are treated as zero.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Solve `a · x = b` for a square row-major `a` of order `b.len()`.
///
/// Gaussian elimination with partial pivoting. Returns `None` when the system is
/// numerically singular.
pub(crate) fn solve(mut a: Vec<f64>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    debug_assert_eq!(a.len(), n * n);

    let scale = (0..n).map(|i| a[i * n + i].abs()).fold(0.0_f64, f64::max);
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    let tolerance = scale * SINGULAR_TOLERANCE;

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&r1, &r2| {
            a[r1 * n + col]
                .abs()
                .total_cmp(&a[r2 * n + col].abs())
        })?;
        if a[pivot_row * n + col].abs() <= tolerance {
            return None;
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap(col * n + k, pivot_row * n + k);
            }
            b.swap(col, pivot_row);
        }

        let pivot = a[col * n + col];
        for row in (col + 1)..n {
            let factor = a[row * n + col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row * n + k] -= factor * a[col * n + k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row * n + k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row * n + row];
    }
    Some(x)
}
