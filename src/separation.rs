//! k-separations and the bit-exact sum constructors (spec.md §3
//! "Separation", §4.6 "Sum semantics", §6 "Sum constructors").

use crate::error::{CmrError, CmrResult};
use crate::matrix::{Entry, Matrix};

/// A 1-, 2-, or 3-separation of a matrix into two blocks, with up to two
/// "extra" rows/columns per side identifying the rank-1/2 connectors.
#[derive(Clone, Debug, Default)]
pub struct Separation {
    /// `part_of_row[r] == 0 or 1`: which block row `r` belongs to.
    pub part_of_row: Vec<u8>,
    /// `part_of_column[c] == 0 or 1`: which block column `c` belongs to.
    pub part_of_column: Vec<u8>,
    pub rows: [Vec<usize>; 2],
    pub columns: [Vec<usize>; 2],
    /// `extra_rows[side]`: up to two extra row indices identifying the
    /// connector rank contributed by `side`.
    pub extra_rows: [Vec<usize>; 2],
    pub extra_columns: [Vec<usize>; 2],
}

impl Separation {
    pub fn new(part_of_row: Vec<u8>, part_of_column: Vec<u8>) -> CmrResult<Self> {
        if part_of_row.iter().any(|&p| p > 1) || part_of_column.iter().any(|&p| p > 1) {
            return Err(CmrError::invalid("separation parts must be 0 or 1"));
        }
        let mut rows: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
        for (r, &p) in part_of_row.iter().enumerate() {
            rows[p as usize].push(r);
        }
        let mut columns: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
        for (c, &p) in part_of_column.iter().enumerate() {
            columns[p as usize].push(c);
        }
        Ok(Separation {
            part_of_row,
            part_of_column,
            rows,
            columns,
            extra_rows: [Vec::new(), Vec::new()],
            extra_columns: [Vec::new(), Vec::new()],
        })
    }

    /// Rank of the bottom-left block (rows of part 1, columns of part 0),
    /// inferred from how many extras were recorded for part 0.
    pub fn rank_bottom_left(&self) -> usize {
        self.extra_rows[0].len().min(2)
    }

    /// Rank of the top-right block (rows of part 0, columns of part 1).
    pub fn rank_top_right(&self) -> usize {
        self.extra_rows[1].len().min(2)
    }

    pub fn rank(&self) -> usize {
        self.rank_bottom_left() + self.rank_top_right()
    }
}

/// Constructs the 1-sum (block-diagonal juxtaposition) of `first` and `second`.
pub fn one_sum<T: Entry>(first: &Matrix<T>, second: &Matrix<T>) -> Matrix<T> {
    let num_rows = first.num_rows() + second.num_rows();
    let num_columns = first.num_columns() + second.num_columns();
    let mut triplets = Vec::with_capacity(first.num_nonzeros() + second.num_nonzeros());
    for r in 0..first.num_rows() {
        for (c, v) in first.row(r) {
            triplets.push((r, c, v));
        }
    }
    for r in 0..second.num_rows() {
        for (c, v) in second.row(r) {
            triplets.push((first.num_rows() + r, first.num_columns() + c, v));
        }
    }
    Matrix::from_triplets(num_rows, num_columns, &triplets).expect("one_sum: triplets in bounds by construction")
}

fn mod_characteristic(v: i64, characteristic: i8) -> i64 {
    if characteristic == 3 {
        let r = ((v % 3) + 3) % 3;
        if r == 2 {
            -1
        } else {
            r
        }
    } else {
        v
    }
}

/// Constructs the 2-sum of `first` and `second` via the given marker
/// elements, modulo `characteristic` (`3` yields entries in `{-1,0,+1}`).
pub fn two_sum<T: Entry>(
    first: &Matrix<T>,
    second: &Matrix<T>,
    first_marker: crate::element::Element,
    second_marker: crate::element::Element,
    characteristic: i8,
) -> CmrResult<Matrix<i64>> {
    use crate::element::Element;

    let (a_prime_rows, a_prime_cols, a_row_vec): (Vec<usize>, Vec<usize>, bool);
    if first_marker.is_row() {
        if !second_marker.is_column() {
            return Err(CmrError::invalid("two_sum: marker kind mismatch"));
        }
        a_row_vec = true;
        a_prime_rows = (0..first.num_rows()).filter(|&r| r != first_marker.row_index()).collect();
        a_prime_cols = (0..first.num_columns()).collect();
    } else if first_marker.is_column() {
        if !second_marker.is_row() {
            return Err(CmrError::invalid("two_sum: marker kind mismatch"));
        }
        a_row_vec = false;
        a_prime_rows = (0..first.num_rows()).collect();
        a_prime_cols = (0..first.num_columns()).filter(|&c| c != first_marker.column_index()).collect();
    } else {
        return Err(CmrError::invalid("two_sum: invalid marker"));
    }

    let b_prime_rows: Vec<usize>;
    let b_prime_cols: Vec<usize>;
    if a_row_vec {
        b_prime_rows = (0..second.num_rows()).collect();
        b_prime_cols = (0..second.num_columns()).filter(|&c| c != second_marker.column_index()).collect();
    } else {
        b_prime_rows = (0..second.num_rows()).filter(|&r| r != second_marker.row_index()).collect();
        b_prime_cols = (0..second.num_columns()).collect();
    }

    let num_rows = a_prime_rows.len() + b_prime_rows.len();
    let num_columns = a_prime_cols.len() + b_prime_cols.len();
    let row_offset = a_prime_rows.len();
    let col_offset = a_prime_cols.len();

    let mut triplets: Vec<(usize, usize, i64)> = Vec::new();
    let a_row_index: std::collections::HashMap<usize, usize> =
        a_prime_rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let a_col_index: std::collections::HashMap<usize, usize> =
        a_prime_cols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    for &r in &a_prime_rows {
        for (c, v) in first.row(r) {
            if let Some(&cj) = a_col_index.get(&c) {
                triplets.push((a_row_index[&r], cj, v.to_i64()));
            }
        }
    }
    let b_row_index: std::collections::HashMap<usize, usize> =
        b_prime_rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let b_col_index: std::collections::HashMap<usize, usize> =
        b_prime_cols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    for &r in &b_prime_rows {
        for (c, v) in second.row(r) {
            if let Some(&cj) = b_col_index.get(&c) {
                triplets.push((row_offset + b_row_index[&r], col_offset + cj, v.to_i64()));
            }
        }
    }

    // Rank-1 outer product block.
    if a_row_vec {
        // a^T is the marker row of `first` (restricted to A'); b is the marker column of `second` (restricted to B').
        let a_vec: std::collections::HashMap<usize, i64> = first
            .row(first_marker.row_index())
            .filter_map(|(c, v)| a_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
            .collect();
        let b_vec: Vec<(usize, i64)> = b_prime_rows
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| {
                let v = second.get(r, second_marker.column_index());
                if v.is_zero() { None } else { Some((i, v.to_i64())) }
            })
            .collect();
        for &(bi, bv) in &b_vec {
            for (&aj, &av) in &a_vec {
                let value = mod_characteristic(bv * av, characteristic);
                if value != 0 {
                    triplets.push((row_offset + bi, aj, value));
                }
            }
        }
    } else {
        // a is the marker column of `first`; b^T is the marker row of `second`.
        let a_vec: Vec<(usize, i64)> = a_prime_rows
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| {
                let v = first.get(r, first_marker.column_index());
                if v.is_zero() { None } else { Some((i, v.to_i64())) }
            })
            .collect();
        let b_vec: std::collections::HashMap<usize, i64> = second
            .row(second_marker.row_index())
            .filter_map(|(c, v)| b_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
            .collect();
        for &(ai, av) in &a_vec {
            for (&bj, &bv) in &b_vec {
                let value = mod_characteristic(av * bv, characteristic);
                if value != 0 {
                    triplets.push((ai, col_offset + bj, value));
                }
            }
        }
    }

    Matrix::from_triplets(num_rows, num_columns, &triplets)
}

/// Constructs the 3-sum of `first` and `second` via the four marker elements
/// and the rank-2 outer product `b1 a1^T + b2 a2^T` convention (spec.md §9's
/// resolution of the sign-convention open question), modulo `characteristic`.
#[allow(clippy::too_many_arguments)]
pub fn three_sum<T: Entry>(
    first: &Matrix<T>,
    second: &Matrix<T>,
    first_marker1: crate::element::Element,
    second_marker1: crate::element::Element,
    first_marker2: crate::element::Element,
    second_marker2: crate::element::Element,
    characteristic: i8,
) -> CmrResult<Matrix<i64>> {
    use std::collections::HashMap;

    let markers1_are_rows = first_marker1.is_row();
    if markers1_are_rows != first_marker2.is_row() {
        // Mixed case: first_marker1 row, first_marker2 column (or vice versa).
        return three_sum_mixed(
            first,
            second,
            first_marker1,
            second_marker1,
            first_marker2,
            second_marker2,
            characteristic,
        );
    }

    let first_excl: Vec<usize> = if markers1_are_rows {
        vec![first_marker1.row_index(), first_marker2.row_index()]
    } else {
        vec![first_marker1.column_index(), first_marker2.column_index()]
    };
    let second_excl: Vec<usize> = if markers1_are_rows {
        vec![second_marker1.column_index(), second_marker2.column_index()]
    } else {
        vec![second_marker1.row_index(), second_marker2.row_index()]
    };

    let (a_prime_rows, a_prime_cols): (Vec<usize>, Vec<usize>) = if markers1_are_rows {
        (
            (0..first.num_rows()).filter(|r| !first_excl.contains(r)).collect(),
            (0..first.num_columns()).collect(),
        )
    } else {
        (
            (0..first.num_rows()).collect(),
            (0..first.num_columns()).filter(|c| !first_excl.contains(c)).collect(),
        )
    };
    let (b_prime_rows, b_prime_cols): (Vec<usize>, Vec<usize>) = if markers1_are_rows {
        (
            (0..second.num_rows()).collect(),
            (0..second.num_columns()).filter(|c| !second_excl.contains(c)).collect(),
        )
    } else {
        (
            (0..second.num_rows()).filter(|r| !second_excl.contains(r)).collect(),
            (0..second.num_columns()).collect(),
        )
    };

    let row_offset = a_prime_rows.len();
    let col_offset = a_prime_cols.len();
    let num_rows = a_prime_rows.len() + b_prime_rows.len();
    let num_columns = a_prime_cols.len() + b_prime_cols.len();

    let a_row_index: HashMap<usize, usize> = a_prime_rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let a_col_index: HashMap<usize, usize> = a_prime_cols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    let b_row_index: HashMap<usize, usize> = b_prime_rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let b_col_index: HashMap<usize, usize> = b_prime_cols.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut triplets: Vec<(usize, usize, i64)> = Vec::new();
    for &r in &a_prime_rows {
        for (c, v) in first.row(r) {
            if let Some(&cj) = a_col_index.get(&c) {
                triplets.push((a_row_index[&r], cj, v.to_i64()));
            }
        }
    }
    for &r in &b_prime_rows {
        for (c, v) in second.row(r) {
            if let Some(&cj) = b_col_index.get(&c) {
                triplets.push((row_offset + b_row_index[&r], col_offset + cj, v.to_i64()));
            }
        }
    }

    if markers1_are_rows {
        // bottom-left block = b1 a1^T + b2 a2^T, a_k rows of `first`, b_k columns of `second`.
        let a1: HashMap<usize, i64> = first
            .row(first_marker1.row_index())
            .filter_map(|(c, v)| a_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
            .collect();
        let a2: HashMap<usize, i64> = first
            .row(first_marker2.row_index())
            .filter_map(|(c, v)| a_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
            .collect();
        let b1: Vec<(usize, i64)> = b_prime_rows
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| {
                let v = second.get(r, second_marker1.column_index());
                (!v.is_zero()).then(|| (i, v.to_i64()))
            })
            .collect();
        let b2: Vec<(usize, i64)> = b_prime_rows
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| {
                let v = second.get(r, second_marker2.column_index());
                (!v.is_zero()).then(|| (i, v.to_i64()))
            })
            .collect();
        accumulate_rank2(&mut triplets, row_offset, 0, &b1, &a1, &b2, &a2, characteristic);
    } else {
        let a1: Vec<(usize, i64)> = a_prime_rows
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| {
                let v = first.get(r, first_marker1.column_index());
                (!v.is_zero()).then(|| (i, v.to_i64()))
            })
            .collect();
        let a2: Vec<(usize, i64)> = a_prime_rows
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| {
                let v = first.get(r, first_marker2.column_index());
                (!v.is_zero()).then(|| (i, v.to_i64()))
            })
            .collect();
        let b1: HashMap<usize, i64> = second
            .row(second_marker1.row_index())
            .filter_map(|(c, v)| b_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
            .collect();
        let b2: HashMap<usize, i64> = second
            .row(second_marker2.row_index())
            .filter_map(|(c, v)| b_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
            .collect();
        accumulate_rank2(&mut triplets, 0, col_offset, &a1, &b1, &a2, &b2, characteristic);
    }

    Matrix::from_triplets(num_rows, num_columns, &triplets)
}

fn accumulate_rank2(
    triplets: &mut Vec<(usize, usize, i64)>,
    row_off: usize,
    col_off: usize,
    u1: &[(usize, i64)],
    v1: &std::collections::HashMap<usize, i64>,
    u2: &[(usize, i64)],
    v2: &std::collections::HashMap<usize, i64>,
    characteristic: i8,
) {
    use std::collections::HashMap;
    let mut acc: HashMap<(usize, usize), i64> = HashMap::new();
    for &(ui, uv) in u1 {
        for (&vj, &vv) in v1 {
            *acc.entry((ui, vj)).or_insert(0) += uv * vv;
        }
    }
    for &(ui, uv) in u2 {
        for (&vj, &vv) in v2 {
            *acc.entry((ui, vj)).or_insert(0) += uv * vv;
        }
    }
    for ((i, j), v) in acc {
        let value = mod_characteristic(v, characteristic);
        if value != 0 {
            triplets.push((row_off + i, col_off + j, value));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn three_sum_mixed<T: Entry>(
    first: &Matrix<T>,
    second: &Matrix<T>,
    first_marker1: crate::element::Element,
    second_marker1: crate::element::Element,
    first_marker2: crate::element::Element,
    second_marker2: crate::element::Element,
    characteristic: i8,
) -> CmrResult<Matrix<i64>> {
    use std::collections::HashMap;
    // first_marker1 a row, first_marker2 a column (or vice versa, normalized below).
    let (row_marker_a, col_marker_a, row_marker_b, col_marker_b) = if first_marker1.is_row() {
        (first_marker1, first_marker2, second_marker2, second_marker1)
    } else {
        (first_marker2, first_marker1, second_marker1, second_marker2)
    };

    let a_prime_rows: Vec<usize> =
        (0..first.num_rows()).filter(|&r| r != row_marker_a.row_index()).collect();
    let a_prime_cols: Vec<usize> =
        (0..first.num_columns()).filter(|&c| c != col_marker_a.column_index()).collect();
    let b_prime_rows: Vec<usize> =
        (0..second.num_rows()).filter(|&r| r != row_marker_b.row_index()).collect();
    let b_prime_cols: Vec<usize> =
        (0..second.num_columns()).filter(|&c| c != col_marker_b.column_index()).collect();

    let row_offset = a_prime_rows.len();
    let col_offset = a_prime_cols.len();
    let num_rows = a_prime_rows.len() + b_prime_rows.len();
    let num_columns = a_prime_cols.len() + b_prime_cols.len();

    let a_row_index: HashMap<usize, usize> = a_prime_rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let a_col_index: HashMap<usize, usize> = a_prime_cols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    let b_row_index: HashMap<usize, usize> = b_prime_rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let b_col_index: HashMap<usize, usize> = b_prime_cols.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut triplets: Vec<(usize, usize, i64)> = Vec::new();
    for &r in &a_prime_rows {
        for (c, v) in first.row(r) {
            if let Some(&cj) = a_col_index.get(&c) {
                triplets.push((a_row_index[&r], cj, v.to_i64()));
            }
        }
    }
    for &r in &b_prime_rows {
        for (c, v) in second.row(r) {
            if let Some(&cj) = b_col_index.get(&c) {
                triplets.push((row_offset + b_row_index[&r], col_offset + cj, v.to_i64()));
            }
        }
    }

    // top-right block: a2 b2^T (a2 column of A, b2 row of B)
    let a2: Vec<(usize, i64)> = a_prime_rows
        .iter()
        .enumerate()
        .filter_map(|(i, &r)| {
            let v = first.get(r, col_marker_a.column_index());
            (!v.is_zero()).then(|| (i, v.to_i64()))
        })
        .collect();
    let b2: HashMap<usize, i64> = second
        .row(row_marker_b.row_index())
        .filter_map(|(c, v)| b_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
        .collect();
    for &(ai, av) in &a2 {
        for (&bj, &bv) in &b2 {
            let value = mod_characteristic(av * bv, characteristic);
            if value != 0 {
                triplets.push((ai, col_offset + bj, value));
            }
        }
    }

    // bottom-left block: b1 a1^T (a1 row of A, b1 column of B)
    let a1: HashMap<usize, i64> = first
        .row(row_marker_a.row_index())
        .filter_map(|(c, v)| a_col_index.get(&c).map(|&cj| (cj, v.to_i64())))
        .collect();
    let b1: Vec<(usize, i64)> = b_prime_rows
        .iter()
        .enumerate()
        .filter_map(|(i, &r)| {
            let v = second.get(r, col_marker_b.column_index());
            (!v.is_zero()).then(|| (i, v.to_i64()))
        })
        .collect();
    for &(bi, bv) in &b1 {
        for (&aj, &av) in &a1 {
            let value = mod_characteristic(bv * av, characteristic);
            if value != 0 {
                triplets.push((row_offset + bi, aj, value));
            }
        }
    }

    Matrix::from_triplets(num_rows, num_columns, &triplets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn one_sum_is_block_diagonal() {
        let a = Matrix::from_dense(1, 1, &[1i8]).unwrap();
        let b = Matrix::from_dense(1, 1, &[1i8]).unwrap();
        let c = one_sum(&a, &b);
        assert_eq!(c.to_dense(), vec![1, 0, 0, 1]);
    }

    #[test]
    fn two_sum_row_column_markers() {
        // A = [[1,1]], marker row 0 of A (a^T = [1,1]).
        // B = [[1],[1]], marker column 0 of B (b = [1,1]^T).
        let a = Matrix::from_dense(1, 2, &[1i8, 1]).unwrap();
        let b = Matrix::from_dense(2, 1, &[1i8, 1]).unwrap();
        let c = two_sum(&a, &b, Element::row(0), Element::column(0), 3).unwrap();
        // A' is empty (0 rows), B' is empty (0 cols); result is 2x2 outer product b*a^T.
        assert_eq!(c.num_rows(), 2);
        assert_eq!(c.num_columns(), 2);
        assert_eq!(c.to_dense(), vec![1, 1, 1, 1]);
    }
}
