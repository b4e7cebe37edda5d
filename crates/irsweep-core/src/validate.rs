// crates/irsweep-core/src/validate.rs

use crate::entropy::rice::MAX_K;
use crate::error::{Result, SweepError};
use crate::frame::Geometry;
use crate::hypothesis::{Hypothesis, ResetPolicy, Scheme};

/// Reject unsupported combinations before a hypothesis reaches a worker.
pub fn validate_hypothesis(h: &Hypothesis, geometry: Geometry) -> Result<()> {
    if h.align > 7 {
        return Err(SweepError::InvalidConfig(format!("align must be 0..=7, got {}", h.align)));
    }

    if !matches!(h.shift, 0 | 2 | 4) {
        return Err(SweepError::InvalidConfig(format!("output shift must be 0, 2 or 4, got {}", h.shift)));
    }

    match h.scheme {
        Scheme::Rice { k } => {
            if k > MAX_K {
                return Err(SweepError::InvalidConfig(format!("rice k must be <= {}, got {}", MAX_K, k)));
            }
        }
        Scheme::RiceParity { even, odd } => {
            if even.max(odd) > MAX_K {
                return Err(SweepError::InvalidConfig(format!(
                    "rice k must be <= {}, got {}/{}",
                    MAX_K, even, odd
                )));
            }
        }
        Scheme::ExpGolomb => {}
        Scheme::Lzss(p) => {
            if !(2..=3).contains(&p.len_base) {
                return Err(SweepError::InvalidConfig(format!(
                    "lzss length base must be 2 or 3, got {}",
                    p.len_base
                )));
            }
        }
        Scheme::Bitplane(_) => {}
    }

    if let ResetPolicy::Tile(t) = h.reset {
        if t.width == 0 || t.height == 0 {
            return Err(SweepError::InvalidConfig(format!(
                "tile must be non-empty, got {}x{}",
                t.width, t.height
            )));
        }
        if t.width > geometry.width || t.height > geometry.height {
            return Err(SweepError::InvalidConfig(format!(
                "tile {}x{} larger than frame {}",
                t.width, t.height, geometry
            )));
        }
    }

    Ok(())
}
