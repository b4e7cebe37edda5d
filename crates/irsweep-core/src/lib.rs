pub mod error;
pub mod validate;

pub mod bits;
pub mod encode;
pub mod entropy;
pub mod frame;
pub mod hypothesis;
pub mod predict;
pub mod reconstruct;
pub mod score;
pub mod search;

pub use crate::bits::{BitAddress, BitCursor, BitOrder};
pub use crate::error::{DecodeFailure, SweepError};
pub use crate::frame::{Geometry, SampleGrid};
pub use crate::hypothesis::Hypothesis;
pub use crate::reconstruct::{reconstruct, DecodeOutcome, EvalLimits};
pub use crate::search::{Ranking, ScoreRecord, Search};
