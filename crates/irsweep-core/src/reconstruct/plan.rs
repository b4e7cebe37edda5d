// crates/irsweep-core/src/reconstruct/plan.rs
//
// Traversal plan shared by the decoder and the reference encoder.
//
// The plan turns (geometry, hypothesis) into a flat sequence of steps:
//
//   Align                      realign the bit position to a byte boundary
//   Segment { row, len, fresh }
//                              the next `len` symbols form one segment of
//                              `row`; `fresh` starts a new reset unit
//   TileSeed { region }        one symbol giving the tile baseline
//   Cell { y, x, dx, .. }      one sample, literal or predicted
//
// Regions are the whole frame, or tiles visited in row-major tile order.
// Rows of a region are visited top to bottom, or as two lanes (even rows
// of the region, then odd rows). Under a serpentine scan odd frame rows run
// right-to-left. A Segment always precedes the cells it covers
// and counts only predicted cells.

use crate::frame::Geometry;
use crate::hypothesis::{Hypothesis, LiteralKind, ResetPolicy, ScanOrder, TileBaseline};

/// Half-open rectangle [x0, x1) x [y0, y1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Region {
    #[inline]
    pub fn contains_col(&self, x: isize) -> bool {
        x >= self.x0 as isize && x < self.x1 as isize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Align,
    Segment { row: usize, len: usize, fresh: bool },
    TileSeed { region: Region },
    Cell {
        y: usize,
        x: usize,
        /// +1 left-to-right, -1 right-to-left. The A neighbour is at x - dx.
        dx: isize,
        literal: Option<LiteralKind>,
        region: Region,
    },
}

/// Regions in traversal order.
pub fn regions(geometry: Geometry, reset: ResetPolicy) -> Vec<Region> {
    let full = Region {
        x0: 0,
        y0: 0,
        x1: geometry.width,
        y1: geometry.height,
    };
    match reset {
        ResetPolicy::None | ResetPolicy::RowAlign => vec![full],
        ResetPolicy::Tile(t) => {
            let (tw, th) = (t.width.max(1), t.height.max(1));
            let mut out = Vec::new();
            for y0 in (0..geometry.height).step_by(th) {
                for x0 in (0..geometry.width).step_by(tw) {
                    out.push(Region {
                        x0,
                        y0,
                        x1: (x0 + tw).min(geometry.width),
                        y1: (y0 + th).min(geometry.height),
                    });
                }
            }
            out
        }
    }
}

/// Feed every step of the plan to `f`, stopping at the first error.
pub fn walk<E, F>(geometry: Geometry, h: &Hypothesis, mut f: F) -> Result<(), E>
where
    F: FnMut(Step) -> Result<(), E>,
{
    let mut frame_start = true;
    for region in regions(geometry, h.reset) {
        let mut tile_fresh = false;
        if let ResetPolicy::Tile(t) = h.reset {
            if t.align {
                f(Step::Align)?;
            }
            tile_fresh = true;
            if t.baseline == TileBaseline::Seed {
                f(Step::Segment {
                    row: region.y0,
                    len: 1,
                    fresh: true,
                })?;
                f(Step::TileSeed { region })?;
                tile_fresh = false;
            }
        }

        for y in h.scan.rows(region.y0, region.y1) {
            let reversed = h.scan == ScanOrder::Serpentine && y % 2 == 1;
            let width = region.x1 - region.x0;
            let literal = h.seeding.literal_at(frame_start);

            let fresh = match h.reset {
                ResetPolicy::None => false,
                ResetPolicy::RowAlign => {
                    f(Step::Align)?;
                    true
                }
                ResetPolicy::Tile(_) => std::mem::take(&mut tile_fresh),
            };
            let len = width - literal.map_or(0, |_| 1);
            f(Step::Segment { row: y, len, fresh })?;

            let dx: isize = if reversed { -1 } else { 1 };
            for i in 0..width {
                let x = if reversed { region.x1 - 1 - i } else { region.x0 + i };
                f(Step::Cell {
                    y,
                    x,
                    dx,
                    literal: if i == 0 { literal } else { None },
                    region,
                })?;
            }
            frame_start = false;
        }
    }
    Ok(())
}

/// Number of symbols drawn from the entropy stream: every segment length,
/// tile seeds included, literals excluded.
pub fn coded_symbols(geometry: Geometry, h: &Hypothesis) -> usize {
    let mut n = 0;
    let _ = walk::<std::convert::Infallible, _>(geometry, h, |s| {
        if let Step::Segment { len, .. } = s {
            n += len;
        }
        Ok(())
    });
    n
}
