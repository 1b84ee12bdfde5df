//! The computation [`Environment`] handle.
//!
//! The source threads a process-wide `CMR*` handle through every entry point
//! to own allocation bookkeeping, parameters, and the last error message.
//! Per §9 "Global mutable state" we keep that as an explicit parameter rather
//! than a global singleton, so independent [`Environment`]s can run on
//! separate threads without synchronization (spec.md §5).

use std::time::{Duration, Instant};

/// A deadline computed once at the start of a long-running entry point and
/// checked at the well-defined checkpoints spec.md §5 enumerates.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    instant: Option<Instant>,
}

impl Deadline {
    /// No deadline: the computation may run indefinitely.
    pub fn none() -> Self {
        Deadline { instant: None }
    }

    /// A deadline `limit` from now.
    pub fn from_now(limit: Duration) -> Self {
        Deadline { instant: Some(Instant::now() + limit) }
    }

    /// Returns `true` if the deadline has passed.
    pub fn expired(&self) -> bool {
        match self.instant {
            Some(t) => Instant::now() >= t,
            None => false,
        }
    }
}

/// Per-call computation environment.
///
/// Owns nothing heap-allocated beyond what `Vec`/`String` already manage for
/// us (the source's slab allocators are modeled directly on the relevant
/// data structures, e.g. [`crate::graph::Graph`] and [`crate::tdec::TDecomposition`],
/// rather than through a shared arena — see §9 "Cyclic structures").
#[derive(Debug, Default)]
pub struct Environment {
    last_error: Option<String>,
}

impl Environment {
    pub fn new() -> Self {
        Environment { last_error: None }
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error_message(&mut self) {
        self.last_error = None;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
