// crates/irsweep-core/src/hypothesis/defaults.rs
//
// Named search spaces. Each one is a family sweep expressed as data; the
// CLI can override any axis on top of a preset.

use std::fmt;
use std::str::FromStr;

use super::axes::{ResetPolicy, ScanOrder, Scheme, Seeding, TileBaseline, TileReset};
use super::space::SearchSpace;
use super::Hypothesis;
use crate::bits::BitOrder;
use crate::entropy::lzss::WordOrder;
use crate::entropy::SignConvention;
use crate::error::SweepError;
use crate::frame::Geometry;
use crate::predict::Predictor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    Rice,
    Lzss,
    Bitplane,
    Tiles,
    Order2,
    Lanes,
    Parity,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Rice,
        Preset::Lzss,
        Preset::Bitplane,
        Preset::Tiles,
        Preset::Order2,
        Preset::Lanes,
        Preset::Parity,
    ];

    pub fn space(self, geometry: Geometry) -> SearchSpace {
        match self {
            Preset::Rice => rice_space(),
            Preset::Lzss => lzss_space(),
            Preset::Bitplane => bitplane_space(),
            Preset::Tiles => tiles_space(geometry),
            Preset::Order2 => order2_space(),
            Preset::Lanes => lanes_space(),
            Preset::Parity => parity_space(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preset::Rice => "rice",
            Preset::Lzss => "lzss",
            Preset::Bitplane => "bitplane",
            Preset::Tiles => "tiles",
            Preset::Order2 => "order2",
            Preset::Lanes => "lanes",
            Preset::Parity => "parity",
        })
    }
}

impl FromStr for Preset {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.to_string() == s.trim())
            .ok_or_else(|| SweepError::InvalidConfig(format!("unknown preset {:?}", s)))
    }
}

/// Single-hypothesis space around `Hypothesis::default()`.
fn base_space() -> SearchSpace {
    let h = Hypothesis::default();
    SearchSpace {
        orders: vec![h.order],
        aligns: vec![h.align],
        schemes: vec![h.scheme],
        predictors: vec![h.predictor],
        signs: vec![h.sign],
        seedings: vec![h.seeding],
        resets: vec![h.reset],
        scans: vec![h.scan],
        shifts: vec![h.shift],
    }
}

/// Rice residual sweep: 2 orders x 8 alignments x 2 k x 3 predictors x 2 signs
/// x 4 seedings x 2 resets x 2 scans = 3072 hypotheses.
pub fn rice_space() -> SearchSpace {
    SearchSpace {
        orders: vec![BitOrder::Msb, BitOrder::Lsb],
        aligns: (0..8).collect(),
        schemes: vec![Scheme::Rice { k: 4 }, Scheme::Rice { k: 5 }],
        predictors: vec![Predictor::Left, Predictor::Med, Predictor::Up],
        signs: vec![SignConvention::Plus, SignConvention::Minus],
        seedings: Seeding::ALL.to_vec(),
        resets: vec![ResetPolicy::None, ResetPolicy::RowAlign],
        scans: vec![ScanOrder::RowMajor, ScanOrder::Serpentine],
        shifts: vec![0],
    }
}

/// LZSS token streams with little-endian literals, with and without row resets.
pub fn lzss_space() -> SearchSpace {
    let schemes = Scheme::lzss_family()
        .into_iter()
        .filter(|s| matches!(s, Scheme::Lzss(p) if p.word_order == WordOrder::Swap))
        .collect();
    SearchSpace {
        schemes,
        predictors: vec![Predictor::Raw],
        seedings: vec![Seeding::Predicted],
        resets: vec![ResetPolicy::None, ResetPolicy::RowAlign],
        ..base_space()
    }
}

pub fn bitplane_space() -> SearchSpace {
    SearchSpace {
        orders: vec![BitOrder::Msb, BitOrder::Lsb],
        schemes: Scheme::bitplane_family(),
        predictors: vec![Predictor::Raw],
        seedings: vec![Seeding::Predicted],
        ..base_space()
    }
}

/// Tile-reset Rice with the `up` predictor.
pub fn tiles_space(geometry: Geometry) -> SearchSpace {
    let mut widths = vec![geometry.width];
    for w in [128, 64, 32] {
        if !widths.contains(&w) {
            widths.push(w);
        }
    }
    let mut resets = Vec::new();
    for &width in &widths {
        for height in [8, 12, 16, 24, 32] {
            for baseline in [TileBaseline::Zero, TileBaseline::Seed, TileBaseline::Carry] {
                resets.push(ResetPolicy::Tile(TileReset {
                    width,
                    height,
                    baseline,
                    align: false,
                }));
            }
        }
    }
    SearchSpace {
        schemes: vec![Scheme::Rice { k: 4 }, Scheme::Rice { k: 5 }, Scheme::Rice { k: 6 }],
        predictors: vec![Predictor::Up],
        seedings: vec![Seeding::Predicted],
        resets,
        ..base_space()
    }
}

/// Order-2 predictors over 16, 14 and 12-bit output depths.
pub fn order2_space() -> SearchSpace {
    SearchSpace {
        schemes: vec![Scheme::Rice { k: 4 }, Scheme::Rice { k: 5 }, Scheme::Rice { k: 6 }],
        predictors: vec![Predictor::Up2, Predictor::V2],
        seedings: vec![Seeding::Predicted, Seeding::FrameLiteral16],
        shifts: vec![0, 2, 4],
        ..base_space()
    }
}

/// Even/odd row lanes with lane-local `up` prediction and a zero baseline.
pub fn lanes_space() -> SearchSpace {
    SearchSpace {
        schemes: (3..=6).map(|k| Scheme::Rice { k }).collect(),
        predictors: vec![Predictor::Up],
        signs: vec![SignConvention::Plus, SignConvention::Minus],
        seedings: vec![Seeding::Predicted],
        scans: vec![ScanOrder::EvenOddLanes],
        ..base_space()
    }
}

/// Order-2 Rice with separate parameters for even and odd rows.
pub fn parity_space() -> SearchSpace {
    let mut schemes = Vec::with_capacity(16);
    for even in 3..=6 {
        for odd in 3..=6 {
            schemes.push(Scheme::RiceParity { even, odd });
        }
    }
    SearchSpace {
        schemes,
        predictors: vec![Predictor::Up2, Predictor::V2],
        seedings: vec![Seeding::Predicted],
        ..base_space()
    }
}
