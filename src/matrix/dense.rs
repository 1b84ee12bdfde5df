//! Dense integer linear-algebra helpers used only by the small matrices the
//! k-modular/equimodular/determinant entry points hand in (spec.md §1 "their
//! contract is a one-line 'integer determinant / gcd of elementary divisors
//! of a small dense integer matrix'").

use crate::error::{CmrError, CmrResult};

/// Computes `gcd(a, b)` for `i64`s, always returning a non-negative value.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Computes the gcd of a slice of `i64`s, treating an empty slice as `0`.
pub fn gcd_all(values: &[i64]) -> i64 {
    values.iter().fold(0, |acc, &v| gcd(acc, v))
}

/// Computes the determinant of a square dense integer matrix (row-major)
/// using fraction-free Bareiss elimination, grounded in the source's
/// `determinant.cpp`. Fails with [`crate::error::ErrorKind::Overflow`] on
/// 64-bit product overflow.
pub fn determinant(order: usize, entries: &[i64]) -> CmrResult<i64> {
    if entries.len() != order * order {
        return Err(CmrError::invalid("determinant: entry count does not match order^2"));
    }
    if order == 0 {
        return Ok(1);
    }
    let mut a = entries.to_vec();
    let n = order;
    let mut prev_pivot: i64 = 1;
    let mut sign: i64 = 1;

    for k in 0..n - 1 {
        if a[k * n + k] == 0 {
            // Find a row below with a nonzero pivot entry and swap.
            let swap_row = (k + 1..n).find(|&r| a[r * n + k] != 0);
            match swap_row {
                Some(r) => {
                    for c in 0..n {
                        a.swap(k * n + c, r * n + c);
                    }
                    sign = -sign;
                }
                None => return Ok(0),
            }
        }
        for i in (k + 1)..n {
            for j in (k + 1)..n {
                let a_ij = a[i * n + j]
                    .checked_mul(a[k * n + k])
                    .and_then(|v| v.checked_sub(a[i * n + k].checked_mul(a[k * n + j])?))
                    .ok_or_else(|| CmrError::overflow("determinant: product overflow"))?;
                let (q, r) = (a_ij / prev_pivot, a_ij % prev_pivot);
                if r != 0 {
                    return Err(CmrError::inconsistent("Bareiss elimination produced a non-exact division"));
                }
                a[i * n + j] = q;
            }
        }
        for i in (k + 1)..n {
            a[i * n + k] = 0;
        }
        prev_pivot = a[k * n + k];
    }
    Ok(sign * a[(n - 1) * n + (n - 1)])
}

/// Reduces a dense integer matrix to Smith normal form, returning the
/// diagonal elementary divisors.
///
/// Per spec.md §9's open question about the source's broken
/// `smith_normal_form` (an empty `while(changed)` loop body), this
/// implements the documented algorithm instead of copying that shape:
/// repeatedly pivot on the smallest-magnitude nonzero entry, propagate its
/// row/column gcd until both the pivot row and pivot column vanish outside
/// the pivot, then recurse on the trailing submatrix.
pub fn smith_normal_form(num_rows: usize, num_columns: usize, entries: &[i64]) -> CmrResult<Vec<i64>> {
    if entries.len() != num_rows * num_columns {
        return Err(CmrError::invalid("smith_normal_form: entry count mismatch"));
    }
    let mut a = entries.to_vec();
    let (mut rows, mut cols) = (num_rows, num_columns);
    let mut row_off = 0usize;
    let mut col_off = 0usize;
    let stride = num_columns;
    let mut divisors = Vec::new();

    while row_off < num_rows && col_off < num_columns {
        // Find the smallest-magnitude nonzero entry in the active submatrix.
        let mut best: Option<(usize, usize, i64)> = None;
        for r in row_off..num_rows {
            for c in col_off..num_columns {
                let v = a[r * stride + c];
                if v != 0 && best.map_or(true, |(_, _, bv)| v.abs() < bv.abs()) {
                    best = Some((r, c, v));
                }
            }
        }
        let (pr, pc, _) = match best {
            Some(b) => b,
            None => break, // remaining submatrix is all zero
        };
        // Move pivot to (row_off, col_off).
        for c in 0..stride {
            a.swap(row_off * stride + c, pr * stride + c);
        }
        for r in 0..num_rows {
            a.swap(r * stride + col_off, r * stride + pc);
        }

        loop {
            let pivot = a[row_off * stride + col_off];
            debug_assert!(pivot != 0);
            let mut changed = false;

            // Reduce the pivot column by the pivot row's gcd relation.
            for r in (row_off + 1)..num_rows {
                let v = a[r * stride + col_off];
                if v == 0 {
                    continue;
                }
                let q = v / pivot;
                for c in col_off..num_columns {
                    let piv_c = a[row_off * stride + c];
                    a[r * stride + c] -= q * piv_c;
                }
                if a[r * stride + col_off] != 0 {
                    // Remainder became the new, smaller pivot: swap rows and continue.
                    for c in 0..stride {
                        a.swap(row_off * stride + c, r * stride + c);
                    }
                    changed = true;
                    break;
                }
            }
            if changed {
                continue;
            }

            // Reduce the pivot row symmetrically.
            for c in (col_off + 1)..num_columns {
                let v = a[row_off * stride + c];
                if v == 0 {
                    continue;
                }
                let q = v / a[row_off * stride + col_off];
                for r in row_off..num_rows {
                    let piv_r = a[r * stride + col_off];
                    a[r * stride + c] -= q * piv_r;
                }
                if a[row_off * stride + c] != 0 {
                    for r in 0..num_rows {
                        a.swap(r * stride + col_off, r * stride + c);
                    }
                    changed = true;
                    break;
                }
            }
            if !changed {
                break;
            }
        }

        let pivot = a[row_off * stride + col_off];
        // The pivot must divide every remaining entry once row/column are clear;
        // otherwise fold it into the trailing submatrix (standard SNF step).
        for r in (row_off + 1)..num_rows {
            for c in (col_off + 1)..num_columns {
                if a[r * stride + c] % pivot != 0 {
                    for cc in col_off..num_columns {
                        a[r * stride + cc] += a[row_off * stride + cc];
                    }
                    break;
                }
            }
        }

        divisors.push(pivot.abs());
        row_off += 1;
        col_off += 1;
        rows -= 1;
        cols -= 1;
        let _ = (rows, cols);
    }
    Ok(divisors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinant_identity() {
        let d = determinant(3, &[1, 0, 0, 0, 1, 0, 0, 0, 1]).unwrap();
        assert_eq!(d, 1);
    }

    #[test]
    fn determinant_known_value() {
        // [[1,1,0],[0,1,1],[1,0,1]] has determinant 2.
        let d = determinant(3, &[1, 1, 0, 0, 1, 1, 1, 0, 1]).unwrap();
        assert_eq!(d.abs(), 2);
    }

    #[test]
    fn determinant_singular_is_zero() {
        let d = determinant(2, &[1, 1, 2, 2]).unwrap();
        assert_eq!(d, 0);
    }

    #[test]
    fn gcd_basic() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(gcd_all(&[4, 6, 10]), 2);
    }

    #[test]
    fn smith_normal_form_of_identity() {
        let d = smith_normal_form(3, 3, &[1, 0, 0, 0, 1, 0, 0, 0, 1]).unwrap();
        assert_eq!(d, vec![1, 1, 1]);
    }

    #[test]
    fn smith_normal_form_diagonal_divisors() {
        // diag(2, 4) has Smith normal form diag(2, 4) (2 | 4).
        let d = smith_normal_form(2, 2, &[2, 0, 0, 4]).unwrap();
        assert_eq!(d.iter().product::<i64>().abs(), 8);
    }
}
