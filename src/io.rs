//! Text I/O formats (spec.md §6, promoted to in-scope per `SPEC_FULL.md` §6:
//! a recognition *library* needs a way to get a matrix or graph in and out,
//! even though the source's CLI/random-generator/LP-solver bindings are not
//! reproduced here).
//!
//! Three formats, all grounded in the source's `tu`/`regular` CLI tools'
//! documented `--input-format` values:
//!   - dense: a header line `rows cols`, then `rows` lines of `cols`
//!     whitespace-separated entries.
//!   - sparse: a header line `rows cols nnz`, then `nnz` lines of `row col
//!     value` (1-based, matching the source's MatrixMarket-flavored format).
//!   - edge list: a header line `nodes edges`, then `edges` lines of `u v`
//!     (1-based) describing [`crate::graph::Graph`] edges.

use crate::error::{CmrError, CmrResult};
use crate::graph::Graph;
use crate::matrix::{Entry, Matrix};
use std::fmt::Write as _;
use std::io::{BufRead, Write};

fn parse_ints(line: &str) -> CmrResult<Vec<i64>> {
    line.split_whitespace()
        .map(|tok| tok.parse::<i64>().map_err(|e| CmrError::input(format!("bad integer {tok:?}: {e}"))))
        .collect()
}

/// Reads a dense-format matrix from `reader`.
pub fn read_dense<T: Entry, R: BufRead>(mut reader: R) -> CmrResult<Matrix<T>> {
    let mut header = String::new();
    reader
        .read_line(&mut header)
        .map_err(|e| CmrError::input(format!("failed to read header: {e}")))?;
    let dims = parse_ints(&header)?;
    if dims.len() != 2 || dims[0] < 0 || dims[1] < 0 {
        return Err(CmrError::input("dense header must be 'rows cols'"));
    }
    let (num_rows, num_columns) = (dims[0] as usize, dims[1] as usize);
    let mut entries = Vec::with_capacity(num_rows * num_columns);
    for r in 0..num_rows {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| CmrError::input(format!("failed to read row {r}: {e}")))?;
        let values = parse_ints(&line)?;
        if values.len() != num_columns {
            return Err(CmrError::input(format!("row {r} has {} entries, expected {num_columns}", values.len())));
        }
        entries.extend(values.into_iter().map(T::from_i64));
    }
    Matrix::from_dense(num_rows, num_columns, &entries)
}

/// Writes `matrix` in dense format.
pub fn write_dense<T: Entry, W: Write>(matrix: &Matrix<T>, mut writer: W) -> CmrResult<()> {
    writeln!(writer, "{} {}", matrix.num_rows(), matrix.num_columns())
        .map_err(|e| CmrError::output(e.to_string()))?;
    for r in 0..matrix.num_rows() {
        let mut line = String::new();
        for c in 0..matrix.num_columns() {
            if c > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{}", matrix.get(r, c).to_i64());
        }
        writeln!(writer, "{line}").map_err(|e| CmrError::output(e.to_string()))?;
    }
    Ok(())
}

/// Reads a sparse-format matrix (1-based row/column indices in the triplet lines).
pub fn read_sparse<T: Entry, R: BufRead>(mut reader: R) -> CmrResult<Matrix<T>> {
    let mut header = String::new();
    reader
        .read_line(&mut header)
        .map_err(|e| CmrError::input(format!("failed to read header: {e}")))?;
    let dims = parse_ints(&header)?;
    if dims.len() != 3 {
        return Err(CmrError::input("sparse header must be 'rows cols nnz'"));
    }
    let (num_rows, num_columns, nnz) = (dims[0] as usize, dims[1] as usize, dims[2] as usize);
    let mut triplets = Vec::with_capacity(nnz);
    for i in 0..nnz {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| CmrError::input(format!("failed to read triplet {i}: {e}")))?;
        let values = parse_ints(&line)?;
        if values.len() != 3 {
            return Err(CmrError::input(format!("triplet {i} must be 'row col value'")));
        }
        let (r, c, v) = (values[0] - 1, values[1] - 1, values[2]);
        if r < 0 || c < 0 {
            return Err(CmrError::input(format!("triplet {i} has a non-positive 1-based index")));
        }
        triplets.push((r as usize, c as usize, T::from_i64(v)));
    }
    Matrix::from_triplets(num_rows, num_columns, &triplets)
}

/// Writes `matrix` in sparse format (1-based indices).
pub fn write_sparse<T: Entry, W: Write>(matrix: &Matrix<T>, mut writer: W) -> CmrResult<()> {
    writeln!(writer, "{} {} {}", matrix.num_rows(), matrix.num_columns(), matrix.num_nonzeros())
        .map_err(|e| CmrError::output(e.to_string()))?;
    for r in 0..matrix.num_rows() {
        for (c, v) in matrix.row(r) {
            writeln!(writer, "{} {} {}", r + 1, c + 1, v.to_i64()).map_err(|e| CmrError::output(e.to_string()))?;
        }
    }
    Ok(())
}

/// Reads an edge-list graph (1-based node indices in the edge lines).
pub fn read_edge_list<R: BufRead>(mut reader: R) -> CmrResult<Graph> {
    let mut header = String::new();
    reader
        .read_line(&mut header)
        .map_err(|e| CmrError::input(format!("failed to read header: {e}")))?;
    let dims = parse_ints(&header)?;
    if dims.len() != 2 {
        return Err(CmrError::input("edge-list header must be 'nodes edges'"));
    }
    let (num_nodes, num_edges) = (dims[0] as usize, dims[1] as usize);
    let mut graph = Graph::new();
    let nodes: Vec<_> = (0..num_nodes).map(|_| graph.add_node()).collect();
    for i in 0..num_edges {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| CmrError::input(format!("failed to read edge {i}: {e}")))?;
        let values = parse_ints(&line)?;
        if values.len() != 2 {
            return Err(CmrError::input(format!("edge {i} must be 'u v'")));
        }
        let (u, v) = (values[0] - 1, values[1] - 1);
        if u < 0 || v < 0 || u as usize >= num_nodes || v as usize >= num_nodes {
            return Err(CmrError::input(format!("edge {i} references an out-of-range node")));
        }
        graph.add_edge(nodes[u as usize], nodes[v as usize]);
    }
    Ok(graph)
}

/// Writes `graph` as an edge list (1-based node indices), in iteration order.
pub fn write_edge_list<W: Write>(graph: &Graph, mut writer: W) -> CmrResult<()> {
    let mut index = std::collections::HashMap::new();
    for (i, n) in graph.nodes().enumerate() {
        index.insert(n, i + 1);
    }
    writeln!(writer, "{} {}", graph.num_nodes(), graph.num_edges()).map_err(|e| CmrError::output(e.to_string()))?;
    for e in graph.edges() {
        let (u, v) = graph.edge_ends(e);
        writeln!(writer, "{} {}", index[&u], index[&v]).map_err(|e| CmrError::output(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_round_trip() {
        let a: Matrix<i8> = Matrix::from_dense(2, 2, &[1, 0, 0, 1]).unwrap();
        let mut buf = Vec::new();
        write_dense(&a, &mut buf).unwrap();
        let b: Matrix<i8> = read_dense(buf.as_slice()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sparse_round_trip() {
        let a: Matrix<i8> = Matrix::from_triplets(2, 2, &[(0, 0, 1), (1, 1, -1)]).unwrap();
        let mut buf = Vec::new();
        write_sparse(&a, &mut buf).unwrap();
        let b: Matrix<i8> = read_sparse(buf.as_slice()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn edge_list_round_trip() {
        let mut g = Graph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        g.add_edge(a, b);
        g.add_edge(b, c);
        g.add_edge(c, a);
        let mut buf = Vec::new();
        write_edge_list(&g, &mut buf).unwrap();
        let g2 = read_edge_list(buf.as_slice()).unwrap();
        assert_eq!(g2.num_nodes(), 3);
        assert_eq!(g2.num_edges(), 3);
    }
}
