// crates/irsweep-core/src/entropy/bitplane.rs
//
// Bitplane run-length rows.
//
// One scanline is coded as 16 planes. Each plane is a sequence of runs of a
// single bit value, alternating, starting from the configured start bit. Run
// length = ExpGolomb(0) + 1; the last run of a plane is truncated at the row end.

use super::expgolomb::{decode_exp_golomb, encode_exp_golomb};
use crate::bits::{BitCursor, BitWriter};
use crate::error::{DecodeFailure, Result, SweepError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneOrder {
    MsbFirst,
    LsbFirst,
}

impl PlaneOrder {
    /// Plane indices in the order they appear in the stream.
    pub fn planes(self) -> impl Iterator<Item = u32> {
        (0..16u32).map(move |i| match self {
            PlaneOrder::MsbFirst => 15 - i,
            PlaneOrder::LsbFirst => i,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitplaneParams {
    pub plane_order: PlaneOrder,
    /// Bit value of the first run in every plane.
    pub start_bit: bool,
}

/// Decode one row of `width` words into `out` (cleared first).
pub fn decode_bitplane_row(
    cur: &mut BitCursor<'_>,
    params: BitplaneParams,
    width: usize,
    guard: u32,
    out: &mut Vec<u16>,
) -> std::result::Result<(), DecodeFailure> {
    out.clear();
    out.resize(width, 0);
    for plane in params.plane_order.planes() {
        let mask = 1u16 << plane;
        let mut bit = params.start_bit;
        let mut filled = 0usize;
        while filled < width {
            let run = decode_exp_golomb(cur, guard)?.saturating_add(1);
            let take = (run.min((width - filled) as u64)) as usize;
            if bit {
                for w in &mut out[filled..filled + take] {
                    *w |= mask;
                }
            }
            filled += take;
            bit = !bit;
        }
    }
    Ok(())
}

/// Encode one row. Every plane must begin with the configured start bit.
pub fn encode_bitplane_row(w: &mut BitWriter, params: BitplaneParams, row: &[u16], guard: u32) -> Result<()> {
    for plane in params.plane_order.planes() {
        let bit_at = |x: usize| (row[x] >> plane) & 1 == 1;
        if row.is_empty() {
            break;
        }
        if bit_at(0) != params.start_bit {
            return Err(SweepError::Validation(format!(
                "plane {} starts with {} but start bit is {}",
                plane,
                bit_at(0) as u8,
                params.start_bit as u8
            )));
        }
        let mut x = 0usize;
        while x < row.len() {
            let v = bit_at(x);
            let mut run = 1usize;
            while x + run < row.len() && bit_at(x + run) == v {
                run += 1;
            }
            encode_exp_golomb(w, (run - 1) as u64, guard)?;
            x += run;
        }
    }
    Ok(())
}
