// crates/irsweep-core/src/error.rs

use std::fmt;

use thiserror::Error;

use crate::frame::Geometry;

pub type Result<T> = std::result::Result<T, SweepError>;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A hypothesis or search space names an unsupported combination.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("geometry mismatch: expected {expected}, got {actual}")]
    GeometryMismatch { expected: Geometry, actual: Geometry },

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeFailure),
}

/// Why a read ran out of stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exhaustion {
    /// The cursor reached the end of the buffer.
    EndOfStream,
    /// A unary prefix exceeded the configured guard length.
    UnaryGuard,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::EndOfStream => f.write_str("end of stream"),
            Exhaustion::UnaryGuard => f.write_str("unary guard"),
        }
    }
}

/// Failure of a single hypothesis. Never fatal to a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    #[error("stream exhausted at bit {bit} ({cause})")]
    StreamExhausted { bit: u64, cause: Exhaustion },

    #[error("lzss match rejected at bit {bit}: offset={offset} len={len}")]
    BadMatch { bit: u64, offset: u32, len: u32 },

    #[error("step budget of {limit} exceeded at bit {bit}")]
    BudgetExceeded { bit: u64, limit: u64 },

    #[error("frame incomplete: {filled}/{expected} cells")]
    Incomplete { filled: usize, expected: usize },
}

impl DecodeFailure {
    pub(crate) fn eof(bit: u64) -> Self {
        DecodeFailure::StreamExhausted { bit, cause: Exhaustion::EndOfStream }
    }

    /// Bit position at which the failure was detected, when known.
    pub fn bit(&self) -> Option<u64> {
        match *self {
            DecodeFailure::StreamExhausted { bit, .. }
            | DecodeFailure::BadMatch { bit, .. }
            | DecodeFailure::BudgetExceeded { bit, .. } => Some(bit),
            DecodeFailure::Incomplete { .. } => None,
        }
    }

    pub fn is_exhaustion(&self) -> bool {
        matches!(self, DecodeFailure::StreamExhausted { .. })
    }

    /// Short stable tag for reports.
    pub fn tag(&self) -> &'static str {
        match self {
            DecodeFailure::StreamExhausted { cause: Exhaustion::EndOfStream, .. } => "eof",
            DecodeFailure::StreamExhausted { cause: Exhaustion::UnaryGuard, .. } => "unary_guard",
            DecodeFailure::BadMatch { .. } => "bad_match",
            DecodeFailure::BudgetExceeded { .. } => "budget",
            DecodeFailure::Incomplete { .. } => "incomplete",
        }
    }
}
