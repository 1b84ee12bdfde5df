//! Typed error codes for the library.
//!
//! Mirrors the `CMR_ERROR` enum of the source (`env.h`): every entry point
//! returns a [`Result<T, CmrError>`] instead of an out-parameter return code.

use std::fmt;

/// The kind of failure, independent of the message attached to it.
///
/// Matches the eight non-`ok` exit codes of spec.md §6/§7 one-to-one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed external data (bad text/edge-list input).
    Input,
    /// The result could not be written out.
    Output,
    /// Allocation failure.
    Memory,
    /// API misuse, e.g. mismatched dimensions.
    Invalid,
    /// Numerical overflow (e.g. a 64-bit determinant product).
    Overflow,
    /// The time limit was exceeded.
    Timeout,
    /// The input violated a structural assumption (non-binary, non-ternary,
    /// non-integer entry where one was required).
    Structure,
    /// An internal consistency check failed; always indicates a library bug.
    Inconsistent,
}

impl ErrorKind {
    /// The shell-style exit code from spec.md §6 (`ok=0` is not representable here
    /// since the absence of an error is `Result::Ok`, not a `CmrError` variant).
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Input => 1,
            ErrorKind::Output => 2,
            ErrorKind::Memory => 3,
            ErrorKind::Invalid => 4,
            ErrorKind::Overflow => 5,
            ErrorKind::Timeout => 6,
            ErrorKind::Structure => 7,
            ErrorKind::Inconsistent => 8,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Input => "input",
            ErrorKind::Output => "output",
            ErrorKind::Memory => "memory",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Overflow => "overflow",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Structure => "structure",
            ErrorKind::Inconsistent => "inconsistent",
        };
        f.write_str(s)
    }
}

/// The library's unified error type.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct CmrError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CmrError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CmrError { kind, message: message.into() }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Input, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Output, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message)
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Overflow, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn structure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structure, message)
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Inconsistent, message)
    }
}

/// The library's unified result type.
pub type CmrResult<T> = Result<T, CmrError>;
