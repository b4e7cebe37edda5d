// crates/irsweep-core/src/encode/mod.rs
//
// Reference encoder: produces a stream that `reconstruct` decodes back to the
// given grid under the same hypothesis. It walks the same traversal plan and
// gathers the same neighbours, so encoder and decoder cannot drift apart.
//
// Coverage:
// - Rice / Exp-Golomb: any predictor, sign, seeding, scan and reset.
// - LZSS: literal-only token stream.
// - Bitplane: only rows whose every plane starts with the configured start bit.
//
// Unencodable input (a unary prefix over the guard, a 14-bit literal with low
// bits set, a sample not representable under the output shift, a bitplane
// start-bit mismatch) is a Validation error.

use crate::bits::BitWriter;
use crate::entropy::bitplane::{encode_bitplane_row, BitplaneParams};
use crate::entropy::expgolomb::encode_exp_golomb;
use crate::entropy::lzss::LzssLiteralWriter;
use crate::entropy::rice::encode_rice;
use crate::entropy::{SignConvention, UNARY_GUARD};
use crate::error::{Result, SweepError};
use crate::frame::SampleGrid;
use crate::hypothesis::{Hypothesis, ScanOrder, Scheme};
use crate::predict::residual_between;
use crate::reconstruct::context::{gather, CellContext};
use crate::reconstruct::plan::{walk, Region, Step};
use crate::validate::validate_hypothesis;

enum SinkKind {
    Rice { even: u8, odd: u8, k: u8 },
    ExpGolomb,
    Lzss(LzssLiteralWriter),
    Bitplane {
        params: BitplaneParams,
        row: Vec<u16>,
        len: usize,
    },
}

struct SymbolSink {
    kind: SinkKind,
    sign: SignConvention,
    guard: u32,
}

impl SymbolSink {
    fn new(h: &Hypothesis, guard: u32) -> Self {
        let kind = match h.scheme {
            Scheme::Rice { k } => SinkKind::Rice { even: k, odd: k, k },
            Scheme::RiceParity { even, odd } => SinkKind::Rice { even, odd, k: even },
            Scheme::ExpGolomb => SinkKind::ExpGolomb,
            Scheme::Lzss(p) => SinkKind::Lzss(LzssLiteralWriter::new(p)),
            Scheme::Bitplane(params) => SinkKind::Bitplane {
                params,
                row: Vec::new(),
                len: 0,
            },
        };
        Self { kind, sign: h.sign, guard }
    }

    fn begin_segment(&mut self, row: usize, len: usize, fresh: bool) {
        match &mut self.kind {
            SinkKind::Rice { even, odd, k } => *k = if row % 2 == 0 { *even } else { *odd },
            SinkKind::ExpGolomb => {}
            SinkKind::Lzss(lz) => lz.begin_segment(fresh),
            SinkKind::Bitplane { row, len: want, .. } => {
                row.clear();
                *want = len;
            }
        }
    }

    /// Write the symbol that turns prediction `p` into `actual`.
    fn put(&mut self, w: &mut BitWriter, p: u16, actual: u16) -> Result<()> {
        let e = residual_between(p, actual);
        match &mut self.kind {
            SinkKind::Rice { k, .. } => encode_rice(w, self.sign.to_unsigned(e), *k, self.guard),
            SinkKind::ExpGolomb => encode_exp_golomb(w, self.sign.to_unsigned(e), self.guard),
            SinkKind::Lzss(lz) => lz.put_word(w, self.sign.word_for(e as u16)),
            SinkKind::Bitplane { params, row, len } => {
                row.push(self.sign.word_for(e as u16));
                if row.len() == *len {
                    encode_bitplane_row(w, *params, row, self.guard)?;
                }
                Ok(())
            }
        }
    }
}

fn first_traversed(region: Region, scan: ScanOrder) -> (usize, usize) {
    let y = region.y0;
    if scan == ScanOrder::Serpentine && y % 2 == 1 {
        (y, region.x1 - 1)
    } else {
        (y, region.x0)
    }
}

/// Encode `grid` under `h` with the default unary guard.
pub fn encode_frame(grid: &SampleGrid, h: &Hypothesis) -> Result<Vec<u8>> {
    encode_frame_with_guard(grid, h, UNARY_GUARD)
}

pub fn encode_frame_with_guard(grid: &SampleGrid, h: &Hypothesis, guard: u32) -> Result<Vec<u8>> {
    let geometry = grid.geometry();
    validate_hypothesis(h, geometry)?;

    let unshifted;
    let grid = if h.shift > 0 {
        unshifted = grid.shifted_right(h.shift).ok_or_else(|| {
            SweepError::Validation(format!("frame has samples below the {}-bit output shift", h.shift))
        })?;
        &unshifted
    } else {
        grid
    };

    let mut w = BitWriter::new(h.order);
    w.write_zeros(h.align as u64);
    let mut sink = SymbolSink::new(h, guard);
    let mut seed: u16 = 0;

    walk(geometry, h, |step| -> Result<()> {
        match step {
            Step::Align => w.align_to_byte(),
            Step::Segment { row, len, fresh } => sink.begin_segment(row, len, fresh),
            Step::TileSeed { region } => {
                let (y, x) = first_traversed(region, h.scan);
                seed = grid.get(y, x);
                sink.put(&mut w, 0, seed)?;
            }
            Step::Cell {
                y,
                x,
                dx,
                literal,
                region,
            } => {
                let actual = grid.get(y, x);
                match literal {
                    Some(kind) => {
                        let raw = kind.from_sample(actual).ok_or_else(|| {
                            SweepError::Validation(format!(
                                "sample {:#06x} at ({}, {}) is not a {}-bit literal",
                                actual,
                                y,
                                x,
                                kind.bits()
                            ))
                        })?;
                        w.write_bits(raw, kind.bits())?;
                    }
                    None => {
                        let cell = CellContext {
                            y,
                            x,
                            dx,
                            stride: h.scan.row_stride(),
                            region,
                        };
                        let n = gather(grid, cell, h.reset, seed);
                        sink.put(&mut w, h.predictor.predict(n), actual)?;
                    }
                }
            }
        }
        Ok(())
    })?;

    Ok(w.into_bytes())
}
