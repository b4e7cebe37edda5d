// crates/irsweep-core/src/reconstruct/context.rs
//
// Neighbour gathering under the causality rule: only cells already visited
// by the plan are read.
//
// - A comes from the same row and must lie inside the region's columns.
// - Rows above are `stride` rows apart (2 inside an even/odd lane) and come
//   from the same region, or from anywhere above under a `carry` tile
//   baseline.
// - A missing A is 0. A missing B/C reads the fill value (the tile seed under
//   a `seed` baseline, else 0); C is 0 when A is missing. D stays None.

use crate::frame::SampleGrid;
use crate::hypothesis::{ResetPolicy, TileBaseline};
use crate::predict::Neighborhood;

use super::plan::Region;

#[derive(Clone, Copy, Debug)]
pub(crate) struct CellContext {
    pub y: usize,
    pub x: usize,
    pub dx: isize,
    pub stride: usize,
    pub region: Region,
}

pub(crate) fn gather(grid: &SampleGrid, cell: CellContext, reset: ResetPolicy, seed: u16) -> Neighborhood {
    let (carry, fill) = match reset {
        ResetPolicy::Tile(t) => match t.baseline {
            TileBaseline::Carry => (true, 0),
            TileBaseline::Seed => (false, seed),
            TileBaseline::Zero => (false, 0),
        },
        ResetPolicy::None | ResetPolicy::RowAlign => (false, 0),
    };

    let CellContext {
        y,
        x,
        dx,
        stride,
        region,
    } = cell;
    let above = |k: usize| -> Option<usize> {
        let up = k * stride;
        if y >= region.y0 + up || (carry && y >= up) {
            Some(y - up)
        } else {
            None
        }
    };

    let left = x as isize - dx;
    let has_left = region.contains_col(left);
    let a = if has_left { grid.get(y, left as usize) } else { 0 };
    let b = above(1).map_or(fill, |r| grid.get(r, x));
    let c = if has_left {
        above(1).map_or(fill, |r| grid.get(r, left as usize))
    } else {
        0
    };
    let d = above(2).map(|r| grid.get(r, x));

    Neighborhood { a, b, c, d }
}
