// crates/irsweep-core/src/entropy/rice.rs
//
// Rice/Golomb(k): unary quotient (zeros terminated by a one), then a k-bit
// remainder; code = (q << k) | r.

use super::{read_unary, write_unary, SignConvention};
use crate::bits::{BitCursor, BitWriter};
use crate::error::{DecodeFailure, Result, SweepError};

/// Largest supported Rice parameter.
pub const MAX_K: u8 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiceCode {
    pub value: u64,
    /// The k-bit remainder, kept for the uniformity statistic.
    pub remainder: u32,
}

pub fn decode_rice(cur: &mut BitCursor<'_>, k: u8, guard: u32) -> std::result::Result<RiceCode, DecodeFailure> {
    let q = read_unary(cur, guard)? as u64;
    let r = cur.read_bits(k as u32)?;
    Ok(RiceCode {
        value: (q << k) | r,
        remainder: r as u32,
    })
}

pub fn decode_rice_signed(
    cur: &mut BitCursor<'_>,
    k: u8,
    sign: SignConvention,
    guard: u32,
) -> std::result::Result<i64, DecodeFailure> {
    decode_rice(cur, k, guard).map(|c| sign.to_signed(c.value))
}

pub fn encode_rice(w: &mut BitWriter, value: u64, k: u8, guard: u32) -> Result<()> {
    if k > MAX_K {
        return Err(SweepError::Validation(format!("rice k must be <= {}, got {}", MAX_K, k)));
    }
    write_unary(w, value >> k, guard)?;
    let mask = if k == 0 { 0 } else { (1u64 << k) - 1 };
    w.write_bits(value & mask, k as u32)
}

pub fn encode_rice_signed(w: &mut BitWriter, e: i64, k: u8, sign: SignConvention, guard: u32) -> Result<()> {
    encode_rice(w, sign.to_unsigned(e), k, guard)
}
