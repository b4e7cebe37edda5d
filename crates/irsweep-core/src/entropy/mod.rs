// crates/irsweep-core/src/entropy/mod.rs
//
// Symbol decode primitives. Each one consumes bits from a BitCursor and yields a
// symbol or a DecodeFailure; none of them produce a partial symbol.
//
// Residual-coded schemes (Rice, Exp-Golomb) yield an unsigned code that a
// SignConvention folds into a signed residual. Word schemes (LZSS, bitplane)
// yield raw 16-bit words that the same convention adds or subtracts.

pub mod bitplane;
pub mod expgolomb;
pub mod lzss;
pub mod rice;

use crate::bits::{BitCursor, BitWriter};
use crate::error::{DecodeFailure, Exhaustion, Result, SweepError};

/// Default cap on unary prefix length. A longer run of zeros is treated as
/// stream exhaustion rather than scanned to the end of the buffer.
pub const UNARY_GUARD: u32 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignConvention {
    /// even u -> u/2, odd u -> -(u/2 + 1)
    Plus,
    /// Plus with the result negated.
    Minus,
}

impl SignConvention {
    /// Fold an unsigned residual code into a signed delta.
    #[inline]
    pub fn to_signed(self, u: u64) -> i64 {
        let e = zigzag_decode(u);
        match self {
            SignConvention::Plus => e,
            SignConvention::Minus => -e,
        }
    }

    /// Inverse of `to_signed`.
    pub fn to_unsigned(self, e: i64) -> u64 {
        match self {
            SignConvention::Plus => zigzag_encode(e),
            SignConvention::Minus => zigzag_encode(-e),
        }
    }

    /// Signed delta carried by a raw 16-bit word.
    #[inline]
    pub fn word_delta(self, w: u16) -> i64 {
        match self {
            SignConvention::Plus => w as i64,
            SignConvention::Minus => -(w as i64),
        }
    }

    /// Word whose delta reproduces `diff` modulo 2^16.
    pub fn word_for(self, diff: u16) -> u16 {
        match self {
            SignConvention::Plus => diff,
            SignConvention::Minus => diff.wrapping_neg(),
        }
    }
}

#[inline]
pub fn zigzag_decode(u: u64) -> i64 {
    if u & 1 == 0 {
        (u >> 1) as i64
    } else {
        -((u >> 1) as i64) - 1
    }
}

#[inline]
pub fn zigzag_encode(e: i64) -> u64 {
    if e >= 0 {
        (e as u64) << 1
    } else {
        (((-(e + 1)) as u64) << 1) | 1
    }
}

/// Count zeros up to the terminating one.
///
/// Fails with `UnaryGuard` once `guard` zeros have been seen, and with
/// `EndOfStream` if the buffer ends first.
pub(crate) fn read_unary(cur: &mut BitCursor<'_>, guard: u32) -> std::result::Result<u32, DecodeFailure> {
    let mut zeros: u32 = 0;
    loop {
        if cur.read_bit()? == 1 {
            return Ok(zeros);
        }
        zeros += 1;
        if zeros >= guard {
            return Err(DecodeFailure::StreamExhausted {
                bit: cur.bit_pos(),
                cause: Exhaustion::UnaryGuard,
            });
        }
    }
}

pub(crate) fn write_unary(w: &mut BitWriter, zeros: u64, guard: u32) -> Result<()> {
    if zeros >= guard as u64 {
        return Err(SweepError::Validation(format!(
            "unary prefix of {} zeros exceeds guard {}",
            zeros, guard
        )));
    }
    w.write_zeros(zeros);
    w.write_bit(true);
    Ok(())
}
