// crates/irsweep-core/src/entropy/expgolomb.rs
//
// Unsigned Exp-Golomb (order 0): z leading zeros, a one, then z suffix bits;
// value = (1 << z) - 1 + suffix.

use super::{read_unary, write_unary, SignConvention};
use crate::bits::{BitCursor, BitWriter};
use crate::error::{DecodeFailure, Result};

/// Longest prefix that still yields a value representable in u64 arithmetic here.
pub const MAX_PREFIX: u32 = 32;

pub fn decode_exp_golomb(cur: &mut BitCursor<'_>, guard: u32) -> std::result::Result<u64, DecodeFailure> {
    let z = read_unary(cur, guard.min(MAX_PREFIX + 1))?;
    if z == 0 {
        return Ok(0);
    }
    let suffix = cur.read_bits(z)?;
    Ok((1u64 << z) - 1 + suffix)
}

pub fn decode_exp_golomb_signed(
    cur: &mut BitCursor<'_>,
    sign: SignConvention,
    guard: u32,
) -> std::result::Result<i64, DecodeFailure> {
    decode_exp_golomb(cur, guard).map(|u| sign.to_signed(u))
}

pub fn encode_exp_golomb(w: &mut BitWriter, value: u64, guard: u32) -> Result<()> {
    let v1 = value as u128 + 1;
    let z = 127 - v1.leading_zeros();
    write_unary(w, z as u64, guard.min(MAX_PREFIX + 1))?;
    if z > 0 {
        w.write_bits((v1 - (1u128 << z)) as u64, z)?;
    }
    Ok(())
}

pub fn encode_exp_golomb_signed(w: &mut BitWriter, e: i64, sign: SignConvention, guard: u32) -> Result<()> {
    encode_exp_golomb(w, sign.to_unsigned(e), guard)
}
