// crates/irsweep-core/src/reconstruct/mod.rs
//
// Reconstructor: drives BitCursor + symbol source + Predictor along the
// traversal plan of one hypothesis.
//
// Contract:
// - Any failure aborts the hypothesis. There is no partial result.
// - Success means every cell of the grid was written exactly once.
// - The output shift is applied to the finished grid; prediction runs on the
//   unshifted samples.
// - The input buffer is only borrowed; all state is local to the call.

pub(crate) mod context;
pub mod plan;
pub(crate) mod source;

use crate::bits::BitCursor;
use crate::entropy::UNARY_GUARD;
use crate::error::DecodeFailure;
use crate::frame::{Geometry, SampleGrid};
use crate::hypothesis::Hypothesis;
use crate::predict::reconstruct_sample;

use context::{gather, CellContext};
use plan::{walk, Step};
use source::SymbolSource;

/// Multiple of the plan's own step count used when no budget is given.
pub const DEFAULT_STEP_FACTOR: u64 = 2;

/// Per-evaluation resource limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalLimits {
    /// Longest unary prefix accepted before the stream counts as exhausted.
    pub unary_guard: u32,
    /// Maximum number of decoded symbols (cells, literals and seeds). None
    /// means `DEFAULT_STEP_FACTOR` x (cells + regions).
    pub max_steps: Option<u64>,
}

impl EvalLimits {
    /// Step budget for one evaluation. Always finite.
    pub fn step_budget(&self, geometry: Geometry, h: &Hypothesis) -> u64 {
        self.max_steps.unwrap_or_else(|| {
            let regions = plan::regions(geometry, h.reset).len();
            DEFAULT_STEP_FACTOR * (geometry.cells() + regions) as u64
        })
    }
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            unary_guard: UNARY_GUARD,
            max_steps: None,
        }
    }
}

/// A complete reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub grid: SampleGrid,
    pub start_bit: u64,
    pub end_bit: u64,
    pub stream_bytes: usize,
    /// Rice remainder histogram, when the scheme has one.
    pub remainders: Option<Vec<u64>>,
}

impl Decoded {
    pub fn bits_consumed(&self) -> u64 {
        self.end_bit.saturating_sub(self.start_bit)
    }

    /// Bytes touched by the decode, counting a trailing partial byte.
    pub fn bytes_consumed(&self) -> usize {
        self.end_bit.div_ceil(8) as usize
    }

    /// Whole bytes left after the last one touched.
    pub fn slack_bytes(&self) -> usize {
        self.stream_bytes.saturating_sub(self.bytes_consumed())
    }
}

pub type DecodeOutcome = std::result::Result<Decoded, DecodeFailure>;

pub fn reconstruct(stream: &[u8], geometry: Geometry, h: &Hypothesis, limits: &EvalLimits) -> DecodeOutcome {
    let start_bit = h.align as u64;
    let mut cur = BitCursor::at(stream, h.order, start_bit);
    let mut grid = SampleGrid::new(geometry);
    let mut source = SymbolSource::new(h, limits.unary_guard, plan::coded_symbols(geometry, h));
    let mut seed: u16 = 0;
    let mut filled = 0usize;
    let mut steps = 0u64;
    let limit = limits.step_budget(geometry, h);

    walk(geometry, h, |step| {
        if matches!(step, Step::TileSeed { .. } | Step::Cell { .. }) {
            steps += 1;
            if steps > limit {
                return Err(DecodeFailure::BudgetExceeded {
                    bit: cur.bit_pos(),
                    limit,
                });
            }
        }

        match step {
            Step::Align => cur.align_to_byte(),
            Step::Segment { row, len, fresh } => source.begin_segment(row, len, fresh),
            Step::TileSeed { .. } => {
                let e = source.next_delta(&mut cur)?;
                seed = reconstruct_sample(0, e);
            }
            Step::Cell {
                y,
                x,
                dx,
                literal,
                region,
            } => {
                let v = match literal {
                    Some(kind) => kind.to_sample(cur.read_bits(kind.bits())?),
                    None => {
                        let cell = CellContext {
                            y,
                            x,
                            dx,
                            stride: h.scan.row_stride(),
                            region,
                        };
                        let n = gather(&grid, cell, h.reset, seed);
                        let p = h.predictor.predict(n);
                        reconstruct_sample(p, source.next_delta(&mut cur)?)
                    }
                };
                grid.set(y, x, v);
                filled += 1;
            }
        }
        Ok(())
    })?;

    if filled != geometry.cells() {
        return Err(DecodeFailure::Incomplete {
            filled,
            expected: geometry.cells(),
        });
    }

    if h.shift > 0 {
        grid.shift_left(h.shift);
    }

    Ok(Decoded {
        grid,
        start_bit,
        end_bit: cur.bit_pos(),
        stream_bytes: stream.len(),
        remainders: source.into_remainders(),
    })
}
