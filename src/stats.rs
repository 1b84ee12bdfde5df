//! Consolidated per-subsystem statistics (spec.md §4.7, component C8).
//!
//! Each subsystem keeps its own counters type (`SeriesParallelStats`,
//! `DecompositionStats`, `CamionStats`); this module just bundles them the
//! way the top-level `tu_test` entry point in [`crate`] wants to report them
//! back to a caller in one shot, mirroring the source's `CMR_TU_STATISTICS`
//! aggregate struct.

use crate::camion::CamionStats;
use crate::decomposition::DecompositionStats;
use crate::series_parallel::SeriesParallelStats;

/// All statistics gathered over one top-level recognition call.
#[derive(Clone, Copy, Debug, Default)]
pub struct Statistics {
    pub series_parallel: SeriesParallelStats,
    pub decomposition: DecompositionStats,
    pub camion: CamionStats,
}
