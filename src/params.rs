//! Consolidated per-subsystem parameters (spec.md §4.7, component C8).
//!
//! Bundles each subsystem's own parameter type the way `tu_test` accepts a
//! single configuration value, mirroring the source's `CMR_TU_PARAMS`.

use crate::decomposition::DecompositionParams;
use crate::series_parallel::SeriesParallelParams;

/// Top-level parameters for [`crate::tu_test`] and friends.
#[derive(Clone, Copy, Debug)]
pub struct Params {
    pub series_parallel: SeriesParallelParams,
    pub decomposition: DecompositionParams,
    /// If `true`, also attempt to Camion-sign the input before TU testing
    /// rather than assuming it is already consistently signed.
    pub sign_matrix: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            series_parallel: SeriesParallelParams::default(),
            decomposition: DecompositionParams::default(),
            sign_matrix: true,
        }
    }
}
