//! Sparse integer matrix primitives (spec.md §4.1, component C1).
//!
//! [`Matrix<T>`] stores its entries in compressed-row form, generalizing the
//! `nalgebra-sparse` CSR layout from floating point to the small signed
//! integer types (`i8`, `i32`, `i64`) this library actually needs. A matrix
//! is immutable after construction: every transforming operation
//! (`transpose`, `pivot`, `zoom`) allocates and returns a fresh matrix.

pub mod dense;

use crate::error::{CmrError, CmrResult};
use std::cmp::Ordering;
use std::collections::HashMap;

/// The entry type a [`Matrix`] can be built over.
///
/// `i8` is the common case (0/1 or 0/±1 support matrices); `i32`/`i64` back
/// the dense determinant/k-modular helpers in [`dense`].
pub trait Entry: Copy + Eq + std::ops::Neg<Output = Self> + num_traits::Zero + num_traits::One + std::fmt::Debug {
    fn to_i64(self) -> i64;
    fn from_i64(v: i64) -> Self;
}

macro_rules! impl_entry {
    ($t:ty) => {
        impl Entry for $t {
            fn to_i64(self) -> i64 {
                self as i64
            }
            fn from_i64(v: i64) -> Self {
                v as $t
            }
        }
    };
}
impl_entry!(i8);
impl_entry!(i32);
impl_entry!(i64);

/// A matrix stored in compressed-row form.
///
/// Invariants (spec.md §3 "Matrix"): `row_slice[0] == 0`,
/// `row_slice[num_rows] == entry_values.len()`, no stored zero values, and
/// within a row column indices are strictly increasing and lie in
/// `[0, num_columns)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix<T: Entry> {
    num_rows: usize,
    num_columns: usize,
    row_slice: Vec<usize>,
    entry_columns: Vec<usize>,
    entry_values: Vec<T>,
}

/// A reference to a submatrix of some named parent matrix: a pair of sorted
/// index sequences (spec.md §3 "Submatrix reference").
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SubmatrixRef {
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
}

impl SubmatrixRef {
    pub fn new(mut rows: Vec<usize>, mut columns: Vec<usize>) -> Self {
        rows.sort_unstable();
        columns.sort_unstable();
        SubmatrixRef { rows, columns }
    }
}

impl<T: Entry> Matrix<T> {
    /// Builds a matrix from a dense row-major slice, dropping zeros.
    pub fn from_dense(num_rows: usize, num_columns: usize, entries: &[T]) -> CmrResult<Self> {
        if entries.len() != num_rows * num_columns {
            return Err(CmrError::invalid("dense entry count does not match dimensions"));
        }
        let mut row_slice = Vec::with_capacity(num_rows + 1);
        let mut entry_columns = Vec::new();
        let mut entry_values = Vec::new();
        row_slice.push(0);
        for r in 0..num_rows {
            for c in 0..num_columns {
                let v = entries[r * num_columns + c];
                if !v.is_zero() {
                    entry_columns.push(c);
                    entry_values.push(v);
                }
            }
            row_slice.push(entry_values.len());
        }
        Ok(Matrix { num_rows, num_columns, row_slice, entry_columns, entry_values })
    }

    /// Builds a matrix from a row-major list of `(row, column, value)` triples, which
    /// need not be sorted or deduplicated-by-construction (the last value for a
    /// repeated `(row, column)` wins, matching the sparse text format of spec.md §6).
    pub fn from_triplets(
        num_rows: usize,
        num_columns: usize,
        triplets: &[(usize, usize, T)],
    ) -> CmrResult<Self> {
        let mut rows: Vec<HashMap<usize, T>> = vec![HashMap::new(); num_rows];
        for &(r, c, v) in triplets {
            if r >= num_rows || c >= num_columns {
                return Err(CmrError::input("triplet index out of bounds"));
            }
            if v.is_zero() {
                rows[r].remove(&c);
            } else {
                rows[r].insert(c, v);
            }
        }
        let mut row_slice = Vec::with_capacity(num_rows + 1);
        let mut entry_columns = Vec::new();
        let mut entry_values = Vec::new();
        row_slice.push(0);
        for row in &rows {
            let mut cols: Vec<usize> = row.keys().copied().collect();
            cols.sort_unstable();
            for c in cols {
                entry_columns.push(c);
                entry_values.push(row[&c]);
            }
            row_slice.push(entry_values.len());
        }
        Ok(Matrix { num_rows, num_columns, row_slice, entry_columns, entry_values })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_nonzeros(&self) -> usize {
        self.entry_values.len()
    }

    /// Iterates over `(column, value)` pairs of row `r` in increasing column order.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let start = self.row_slice[r];
        let end = self.row_slice[r + 1];
        self.entry_columns[start..end]
            .iter()
            .copied()
            .zip(self.entry_values[start..end].iter().copied())
    }

    /// The row-support as a sorted `Vec<usize>` of column indices.
    pub fn row_support(&self, r: usize) -> &[usize] {
        let start = self.row_slice[r];
        let end = self.row_slice[r + 1];
        &self.entry_columns[start..end]
    }

    pub fn get(&self, r: usize, c: usize) -> T {
        match self.row_support(r).binary_search(&c) {
            Ok(idx) => self.entry_values[self.row_slice[r] + idx],
            Err(_) => T::zero(),
        }
    }

    /// Runs the debug consistency audit (spec.md §7 "Consistency checks"),
    /// returning a human-readable explanation on failure.
    pub fn consistency(&self) -> Option<String> {
        if self.row_slice.len() != self.num_rows + 1 {
            return Some("row_slice length does not match num_rows + 1".into());
        }
        if self.row_slice[0] != 0 {
            return Some("row_slice[0] != 0".into());
        }
        if *self.row_slice.last().unwrap() != self.entry_values.len() {
            return Some("row_slice[num_rows] != num_nonzeros".into());
        }
        for r in 0..self.num_rows {
            let cols = self.row_support(r);
            for w in cols.windows(2) {
                if w[0] >= w[1] {
                    return Some(format!("row {r} columns not strictly increasing"));
                }
            }
            if let Some(&last) = cols.last() {
                if last >= self.num_columns {
                    return Some(format!("row {r} has column index out of bounds"));
                }
            }
        }
        for &v in &self.entry_values {
            if v.is_zero() {
                return Some("stored zero value".into());
            }
        }
        None
    }

    /// Transposes the matrix: a fresh allocation, entries emitted by a
    /// counting sort over original column indices (spec.md §4.1).
    pub fn transpose(&self) -> Matrix<T> {
        let mut counts = vec![0usize; self.num_columns + 1];
        for &c in &self.entry_columns {
            counts[c + 1] += 1;
        }
        for i in 1..counts.len() {
            counts[i] += counts[i - 1];
        }
        let row_slice = counts.clone();
        let nnz = self.entry_values.len();
        let mut entry_columns = vec![0usize; nnz];
        let mut entry_values = vec![T::zero(); nnz];
        let mut cursor = counts;
        for r in 0..self.num_rows {
            for (c, v) in self.row(r) {
                let pos = cursor[c];
                entry_columns[pos] = r;
                entry_values[pos] = v;
                cursor[c] += 1;
            }
        }
        Matrix {
            num_rows: self.num_columns,
            num_columns: self.num_rows,
            row_slice,
            entry_columns,
            entry_values,
        }
    }

    /// The 0/1 support matrix: `S[i,j] = 1` iff `M[i,j] != 0`.
    pub fn support(&self) -> Matrix<i8> {
        Matrix {
            num_rows: self.num_rows,
            num_columns: self.num_columns,
            row_slice: self.row_slice.clone(),
            entry_columns: self.entry_columns.clone(),
            entry_values: vec![1i8; self.entry_values.len()],
        }
    }

    /// The {-1,0,+1} signed-support matrix: the sign of each entry.
    pub fn signed_support(&self) -> Matrix<i8> {
        let entry_values = self
            .entry_values
            .iter()
            .map(|v| match v.to_i64().cmp(&0) {
                Ordering::Less => -1i8,
                Ordering::Equal => 0i8,
                Ordering::Greater => 1i8,
            })
            .collect();
        Matrix {
            num_rows: self.num_rows,
            num_columns: self.num_columns,
            row_slice: self.row_slice.clone(),
            entry_columns: self.entry_columns.clone(),
            entry_values,
        }
    }

    /// Extracts the submatrix named by `sub`, preserving row/column order.
    pub fn zoom_submat(&self, sub: &SubmatrixRef) -> Matrix<T> {
        let col_pos: HashMap<usize, usize> =
            sub.columns.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        let mut row_slice = Vec::with_capacity(sub.rows.len() + 1);
        let mut entry_columns = Vec::new();
        let mut entry_values = Vec::new();
        row_slice.push(0);
        for &r in &sub.rows {
            let mut entries: Vec<(usize, T)> = self
                .row(r)
                .filter_map(|(c, v)| col_pos.get(&c).map(|&j| (j, v)))
                .collect();
            entries.sort_by_key(|&(j, _)| j);
            for (j, v) in entries {
                entry_columns.push(j);
                entry_values.push(v);
            }
            row_slice.push(entry_values.len());
        }
        Matrix {
            num_rows: sub.rows.len(),
            num_columns: sub.columns.len(),
            row_slice,
            entry_columns,
            entry_values,
        }
    }

    /// Converts the matrix to a dense row-major `Vec<T>`.
    pub fn to_dense(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.num_rows * self.num_columns];
        for r in 0..self.num_rows {
            for (c, v) in self.row(r) {
                out[r * self.num_columns + c] = v;
            }
        }
        out
    }
}

impl Matrix<i8> {
    /// Applies a GF(2) pivot at `(pivot_row, pivot_column)` (spec.md §4.1).
    ///
    /// Requires `M[pivot_row, pivot_column] = 1`. For `i != pivot_row, j !=
    /// pivot_column`: `M'[i,j] = M[i,j] XOR (M[i,pivot_column] AND
    /// M[pivot_row,j])`.
    pub fn binary_pivot(&self, pivot_row: usize, pivot_column: usize) -> CmrResult<Matrix<i8>> {
        if self.get(pivot_row, pivot_column) != 1 {
            return Err(CmrError::invalid("binary pivot entry is not 1"));
        }
        let mut dense = self.to_dense();
        let nc = self.num_columns;
        let pivot_col_vals: Vec<i8> = (0..self.num_rows).map(|i| dense[i * nc + pivot_column]).collect();
        let pivot_row_vals: Vec<i8> = (0..nc).map(|j| dense[pivot_row * nc + j]).collect();
        for i in 0..self.num_rows {
            if i == pivot_row {
                continue;
            }
            if pivot_col_vals[i] == 0 {
                continue;
            }
            for j in 0..nc {
                if j == pivot_column {
                    continue;
                }
                let bit = dense[i * nc + j] ^ (pivot_col_vals[i] & pivot_row_vals[j]);
                dense[i * nc + j] = bit & 1;
            }
        }
        dense[pivot_row * nc + pivot_column] = 1;
        Matrix::from_dense(self.num_rows, self.num_columns, &dense)
    }

    /// Applies a ternary pivot over GF(3)-folded `{-1,0,+1}` arithmetic at
    /// `(pivot_row, pivot_column)` (spec.md §4.1).
    ///
    /// Requires `M[pivot_row, pivot_column] = ±1`. Fails with
    /// [`crate::error::ErrorKind::Structure`] ("bad-entry" in the source's minor
    /// taxonomy) if an intermediate result leaves `{-1,0,1}`.
    pub fn ternary_pivot(&self, pivot_row: usize, pivot_column: usize) -> CmrResult<Matrix<i8>> {
        let pivot = self.get(pivot_row, pivot_column);
        if pivot != 1 && pivot != -1 {
            return Err(CmrError::invalid("ternary pivot entry is not +-1"));
        }
        let mut dense = self.to_dense();
        let nc = self.num_columns;
        let pivot_col_vals: Vec<i8> = (0..self.num_rows).map(|i| dense[i * nc + pivot_column]).collect();
        let pivot_row_vals: Vec<i8> = (0..nc).map(|j| dense[pivot_row * nc + j]).collect();
        for i in 0..self.num_rows {
            if i == pivot_row {
                continue;
            }
            let a_ic = pivot_col_vals[i];
            if a_ic == 0 {
                continue;
            }
            for j in 0..nc {
                if j == pivot_column {
                    continue;
                }
                let raw = dense[i * nc + j] as i32
                    - (a_ic as i32) * (pivot_row_vals[j] as i32) / (pivot as i32);
                let folded = ((raw % 3) + 3) % 3;
                let value = match folded {
                    0 => 0,
                    1 => 1,
                    2 => -1,
                    _ => unreachable!(),
                };
                if value.abs() > 1 {
                    return Err(CmrError::structure("ternary pivot produced an out-of-range entry"));
                }
                dense[i * nc + j] = value;
            }
        }
        dense[pivot_row * nc + pivot_column] = pivot;
        Matrix::from_dense(self.num_rows, self.num_columns, &dense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: usize, cols: usize, data: &[i8]) -> Matrix<i8> {
        Matrix::from_dense(rows, cols, data).unwrap()
    }

    #[test]
    fn transpose_is_involutive() {
        let a = m(2, 3, &[1, 0, 1, 1, 1, 0]);
        assert_eq!(a.transpose().transpose(), a);
    }

    #[test]
    fn support_is_idempotent() {
        let a = m(2, 2, &[2, 0, -3, 0]);
        assert_eq!(a.support().support(), a.support());
        assert_eq!(a.support().to_dense(), vec![1, 0, 1, 0]);
    }

    #[test]
    fn signed_support_idempotent_and_support_compatible() {
        let a = m(2, 2, &[2, 0, -3, 1]);
        let s = a.signed_support();
        assert_eq!(s.signed_support(), s);
        assert_eq!(s.support().to_dense(), a.support().to_dense());
    }

    #[test]
    fn binary_pivot_is_involutive() {
        let a = m(3, 3, &[1, 1, 0, 0, 1, 1, 1, 0, 1]);
        let b = a.binary_pivot(0, 0).unwrap();
        let c = b.binary_pivot(0, 0).unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn ternary_pivot_is_involutive() {
        let a = m(3, 3, &[1, 1, 0, 0, 1, -1, 1, 0, 1]);
        let b = a.ternary_pivot(0, 0).unwrap();
        let c = b.ternary_pivot(0, 0).unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn zoom_submat_preserves_order() {
        let a = m(3, 3, &[1, 2, 0, 0, 3, 4, 5, 0, 6]);
        let sub = SubmatrixRef::new(vec![0, 2], vec![0, 2]);
        let z = a.zoom_submat(&sub);
        assert_eq!(z.to_dense(), vec![1, 0, 5, 6]);
    }

    #[test]
    fn consistency_detects_nothing_wrong_on_valid_matrix() {
        let a = m(2, 2, &[1, 0, 0, 1]);
        assert!(a.consistency().is_none());
    }
}

/// Generative versions of spec.md §8's "Invariants (for all matrices M)",
/// run over random small dense matrices rather than the single fixed
/// examples in `tests` above.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn transpose_is_always_involutive(entries in proptest::collection::vec(-2i8..=2, 9)) {
            let a = Matrix::from_dense(3, 3, &entries).unwrap();
            prop_assert_eq!(a.transpose().transpose(), a);
        }

        #[test]
        fn support_is_always_idempotent(entries in proptest::collection::vec(-3i8..=3, 12)) {
            let a = Matrix::from_dense(3, 4, &entries).unwrap();
            prop_assert_eq!(a.support().support(), a.support());
        }

        #[test]
        fn signed_support_is_always_idempotent_and_support_compatible(
            entries in proptest::collection::vec(-3i8..=3, 12),
        ) {
            let a = Matrix::from_dense(3, 4, &entries).unwrap();
            let s = a.signed_support();
            prop_assert_eq!(s.signed_support(), s.clone());
            prop_assert_eq!(s.support().to_dense(), a.support().to_dense());
        }

        #[test]
        fn binary_pivot_is_always_involutive(mut entries in proptest::collection::vec(0i8..=1, 9)) {
            entries[0] = 1;
            let a = Matrix::from_dense(3, 3, &entries).unwrap();
            let once = a.binary_pivot(0, 0).unwrap();
            let twice = once.binary_pivot(0, 0).unwrap();
            prop_assert_eq!(twice, a);
        }

        #[test]
        fn ternary_pivot_is_always_involutive(mut entries in proptest::collection::vec(-1i8..=1, 9)) {
            entries[0] = 1;
            let a = Matrix::from_dense(3, 3, &entries).unwrap();
            let once = a.ternary_pivot(0, 0).unwrap();
            let twice = once.ternary_pivot(0, 0).unwrap();
            prop_assert_eq!(twice, a);
        }
    }
}
