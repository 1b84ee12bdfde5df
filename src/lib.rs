//! `cmr`: recognition of total unimodularity, regularity, and related
//! matrix/matroid properties over small integer matrices.
//!
//! This crate generalizes the classical combinatorial-matrix-theory pipeline
//! — series-parallel reduction, Seymour decomposition, Camion signing, and
//! named-matroid checks — into a single library entry point, [`tu_test`],
//! with each stage also exposed as its own module for direct use.
//!
//! ```no_run
//! use cmr::{matrix::Matrix, params::Params, stats::Statistics};
//!
//! let a: Matrix<i8> = Matrix::from_dense(2, 2, &[1, 1, 0, 1]).unwrap();
//! let mut stats = Statistics::default();
//! let result = cmr::tu_test(&a, Params::default(), &mut stats).unwrap();
//! assert!(result.is_totally_unimodular);
//! ```

pub mod camion;
pub mod decomposition;
pub mod element;
pub mod env;
pub mod error;
pub mod graph;
pub mod io;
pub mod matrix;
pub mod named;
pub mod params;
pub mod properties;
pub mod separation;
pub mod series_parallel;
pub mod stats;
pub mod tdec;

pub use error::{CmrError, CmrResult, ErrorKind};
pub use params::Params;
pub use properties::{CtuResult, TuResult};
pub use stats::Statistics;

/// Tests `matrix` for total unimodularity, tying together series-parallel
/// reduction, Seymour decomposition, and Camion signing (spec.md §1's "one
/// call does the whole pipeline" entry point).
#[tracing::instrument(skip(matrix, stats), fields(rows = matrix.num_rows(), columns = matrix.num_columns()))]
pub fn tu_test<T: matrix::Entry>(
    matrix: &matrix::Matrix<T>,
    params: Params,
    stats: &mut Statistics,
) -> CmrResult<TuResult> {
    tracing::debug!("starting total unimodularity test");
    let result = properties::is_totally_unimodular(matrix, params, stats)?;
    if result.is_totally_unimodular {
        tracing::info!("matrix is totally unimodular");
    } else {
        tracing::info!(violator = ?result.violator, "matrix is not totally unimodular");
    }
    Ok(result)
}
