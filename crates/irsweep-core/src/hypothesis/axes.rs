// crates/irsweep-core/src/hypothesis/axes.rs
//
// One closed enum per hypothesis axis, each with a canonical text token.
//
// Tokens:
//   order      msb | lsb
//   sign       plus | minus
//   pred       raw | left | up | med | up2 | v2
//   seed       row16 | row14 | frame16 | predicted
//   scan       row | serp | lanes
//   reset      none | row | tile:WxH:zero|seed|carry[:align]
//   scheme     rice:K | rice:KEVEN/KODD | expgolomb | lzss:CTRL:FLAG:SPLIT:BASE:WORD | bitplane:PLANES:START
//              lzss   CTRL=msb|lsb FLAG=one|zero SPLIT=12/4|11/5|10/6 BASE=2|3 WORD=straight|swap
//              bitplane PLANES=msb|lsb START=0|1

use std::fmt;
use std::str::FromStr;

use crate::bits::BitOrder;
use crate::entropy::bitplane::{BitplaneParams, PlaneOrder};
use crate::entropy::lzss::{FlagPolarity, LzssParams, MatchSplit, WordOrder};
use crate::entropy::SignConvention;
use crate::error::SweepError;
use crate::predict::Predictor;

fn bad(axis: &str, tok: &str) -> SweepError {
    SweepError::InvalidConfig(format!("unknown {} value {:?}", axis, tok))
}

fn parse_num<T: FromStr>(axis: &str, tok: &str) -> Result<T, SweepError> {
    tok.trim().parse::<T>().map_err(|_| bad(axis, tok))
}

// ---------- simple axes ----------

impl fmt::Display for BitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BitOrder::Msb => "msb",
            BitOrder::Lsb => "lsb",
        })
    }
}

impl FromStr for BitOrder {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "msb" => Ok(BitOrder::Msb),
            "lsb" => Ok(BitOrder::Lsb),
            other => Err(bad("bit order", other)),
        }
    }
}

impl fmt::Display for SignConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignConvention::Plus => "plus",
            SignConvention::Minus => "minus",
        })
    }
}

impl FromStr for SignConvention {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "plus" => Ok(SignConvention::Plus),
            "minus" => Ok(SignConvention::Minus),
            other => Err(bad("sign", other)),
        }
    }
}

impl fmt::Display for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Predictor::Raw => "raw",
            Predictor::Left => "left",
            Predictor::Up => "up",
            Predictor::Med => "med",
            Predictor::Up2 => "up2",
            Predictor::V2 => "v2",
        })
    }
}

impl FromStr for Predictor {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "raw" => Ok(Predictor::Raw),
            "left" => Ok(Predictor::Left),
            "up" => Ok(Predictor::Up),
            "med" => Ok(Predictor::Med),
            "up2" => Ok(Predictor::Up2),
            "v2" => Ok(Predictor::V2),
            other => Err(bad("predictor", other)),
        }
    }
}

/// Raw literal read in place of a predicted sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// 16-bit sample.
    Raw16,
    /// 14-bit value stored shifted left by 2.
    Raw14Shift2,
}

impl LiteralKind {
    pub fn bits(self) -> u32 {
        match self {
            LiteralKind::Raw16 => 16,
            LiteralKind::Raw14Shift2 => 14,
        }
    }

    #[inline]
    pub fn to_sample(self, raw: u64) -> u16 {
        match self {
            LiteralKind::Raw16 => raw as u16,
            LiteralKind::Raw14Shift2 => ((raw as u16) & 0x3FFF) << 2,
        }
    }

    /// Literal field for a sample, or None when the sample is not representable.
    pub fn from_sample(self, sample: u16) -> Option<u64> {
        match self {
            LiteralKind::Raw16 => Some(sample as u64),
            LiteralKind::Raw14Shift2 if sample & 0b11 == 0 => Some((sample >> 2) as u64),
            LiteralKind::Raw14Shift2 => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seeding {
    /// First cell of every row segment is a 16-bit literal.
    RowLiteral16,
    /// First cell of every row segment is a 14-bit literal << 2.
    RowLiteral14,
    /// Only the first cell of the frame is a 16-bit literal.
    FrameLiteral16,
    /// No literals; every cell is predicted.
    Predicted,
}

impl Seeding {
    pub const ALL: [Seeding; 4] = [
        Seeding::RowLiteral16,
        Seeding::RowLiteral14,
        Seeding::FrameLiteral16,
        Seeding::Predicted,
    ];

    /// Literal kind at a row-segment start, given whether it is also the frame start.
    pub fn literal_at(self, frame_start: bool) -> Option<LiteralKind> {
        match self {
            Seeding::RowLiteral16 => Some(LiteralKind::Raw16),
            Seeding::RowLiteral14 => Some(LiteralKind::Raw14Shift2),
            Seeding::FrameLiteral16 if frame_start => Some(LiteralKind::Raw16),
            Seeding::FrameLiteral16 | Seeding::Predicted => None,
        }
    }
}

impl fmt::Display for Seeding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Seeding::RowLiteral16 => "row16",
            Seeding::RowLiteral14 => "row14",
            Seeding::FrameLiteral16 => "frame16",
            Seeding::Predicted => "predicted",
        })
    }
}

impl FromStr for Seeding {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "row16" => Ok(Seeding::RowLiteral16),
            "row14" => Ok(Seeding::RowLiteral14),
            "frame16" => Ok(Seeding::FrameLiteral16),
            "predicted" => Ok(Seeding::Predicted),
            other => Err(bad("seeding", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanOrder {
    RowMajor,
    /// Odd rows run right-to-left.
    Serpentine,
    /// Even rows of a region first, then odd rows. Each lane predicts from
    /// the row two above, which is the previous row of the same lane.
    EvenOddLanes,
}

impl ScanOrder {
    /// Row distance to the "up" neighbour.
    pub fn row_stride(self) -> usize {
        match self {
            ScanOrder::RowMajor | ScanOrder::Serpentine => 1,
            ScanOrder::EvenOddLanes => 2,
        }
    }

    /// Rows of `y0..y1` in visiting order.
    pub fn rows(self, y0: usize, y1: usize) -> Vec<usize> {
        match self {
            ScanOrder::RowMajor | ScanOrder::Serpentine => (y0..y1).collect(),
            ScanOrder::EvenOddLanes => (y0..y1).step_by(2).chain((y0 + 1..y1).step_by(2)).collect(),
        }
    }
}

impl fmt::Display for ScanOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScanOrder::RowMajor => "row",
            ScanOrder::Serpentine => "serp",
            ScanOrder::EvenOddLanes => "lanes",
        })
    }
}

impl FromStr for ScanOrder {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "row" => Ok(ScanOrder::RowMajor),
            "serp" => Ok(ScanOrder::Serpentine),
            "lanes" => Ok(ScanOrder::EvenOddLanes),
            other => Err(bad("scan", other)),
        }
    }
}

// ---------- reset policy ----------

/// Vertical baseline for the top row of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileBaseline {
    /// Rows above the tile read as 0.
    Zero,
    /// A seed residual decoded at tile start stands in for the rows above.
    Seed,
    /// Rows above the tile are read from the frame, across the tile border.
    Carry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileReset {
    pub width: usize,
    pub height: usize,
    pub baseline: TileBaseline,
    /// Realign the cursor to a byte boundary at each tile start.
    pub align: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetPolicy {
    None,
    /// Byte realignment and a fresh entropy segment at every row start.
    RowAlign,
    Tile(TileReset),
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetPolicy::None => f.write_str("none"),
            ResetPolicy::RowAlign => f.write_str("row"),
            ResetPolicy::Tile(t) => {
                let base = match t.baseline {
                    TileBaseline::Zero => "zero",
                    TileBaseline::Seed => "seed",
                    TileBaseline::Carry => "carry",
                };
                write!(f, "tile:{}x{}:{}", t.width, t.height, base)?;
                if t.align {
                    f.write_str(":align")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for ResetPolicy {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "none" => return Ok(ResetPolicy::None),
            "row" => return Ok(ResetPolicy::RowAlign),
            _ => {}
        }
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 3 || parts.len() > 4 || parts[0] != "tile" {
            return Err(bad("reset", s));
        }
        let (w, h) = parts[1].split_once('x').ok_or_else(|| bad("reset", s))?;
        let baseline = match parts[2] {
            "zero" => TileBaseline::Zero,
            "seed" => TileBaseline::Seed,
            "carry" => TileBaseline::Carry,
            _ => return Err(bad("reset", s)),
        };
        let align = match parts.get(3) {
            None => false,
            Some(&"align") => true,
            Some(_) => return Err(bad("reset", s)),
        };
        Ok(ResetPolicy::Tile(TileReset {
            width: parse_num("tile width", w)?,
            height: parse_num("tile height", h)?,
            baseline,
            align,
        }))
    }
}

// ---------- entropy scheme ----------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    Rice { k: u8 },
    /// Rice with the parameter chosen by frame row parity.
    RiceParity { even: u8, odd: u8 },
    ExpGolomb,
    Lzss(LzssParams),
    Bitplane(BitplaneParams),
}

impl Scheme {
    /// Rice and Exp-Golomb code signed residuals; LZSS and bitplane carry raw words.
    pub fn codes_residuals(&self) -> bool {
        matches!(self, Scheme::Rice { .. } | Scheme::RiceParity { .. } | Scheme::ExpGolomb)
    }

    /// Every LZSS variant: control order x flag polarity x split x base x word order.
    pub fn lzss_family() -> Vec<Scheme> {
        let mut out = Vec::with_capacity(48);
        for ctrl_order in [BitOrder::Msb, BitOrder::Lsb] {
            for literal_flag in [FlagPolarity::OneIsLiteral, FlagPolarity::ZeroIsLiteral] {
                for split in MatchSplit::ALL {
                    for len_base in [2u8, 3] {
                        for word_order in [WordOrder::Straight, WordOrder::Swap] {
                            out.push(Scheme::Lzss(LzssParams {
                                ctrl_order,
                                literal_flag,
                                split,
                                len_base,
                                word_order,
                            }));
                        }
                    }
                }
            }
        }
        out
    }

    pub fn bitplane_family() -> Vec<Scheme> {
        let mut out = Vec::with_capacity(4);
        for plane_order in [PlaneOrder::MsbFirst, PlaneOrder::LsbFirst] {
            for start_bit in [false, true] {
                out.push(Scheme::Bitplane(BitplaneParams { plane_order, start_bit }));
            }
        }
        out
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Rice { k } => write!(f, "rice:{}", k),
            Scheme::RiceParity { even, odd } => write!(f, "rice:{}/{}", even, odd),
            Scheme::ExpGolomb => f.write_str("expgolomb"),
            Scheme::Lzss(p) => {
                let flag = match p.literal_flag {
                    FlagPolarity::OneIsLiteral => "one",
                    FlagPolarity::ZeroIsLiteral => "zero",
                };
                let split = match p.split {
                    MatchSplit::O12L4 => "12/4",
                    MatchSplit::O11L5 => "11/5",
                    MatchSplit::O10L6 => "10/6",
                };
                let word = match p.word_order {
                    WordOrder::Straight => "straight",
                    WordOrder::Swap => "swap",
                };
                write!(f, "lzss:{}:{}:{}:{}:{}", p.ctrl_order, flag, split, p.len_base, word)
            }
            Scheme::Bitplane(p) => {
                let planes = match p.plane_order {
                    PlaneOrder::MsbFirst => "msb",
                    PlaneOrder::LsbFirst => "lsb",
                };
                write!(f, "bitplane:{}:{}", planes, p.start_bit as u8)
            }
        }
    }
}

impl FromStr for Scheme {
    type Err = SweepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["expgolomb"] | ["eg0"] => Ok(Scheme::ExpGolomb),
            ["rice", k] => match k.split_once('/') {
                Some((even, odd)) => Ok(Scheme::RiceParity {
                    even: parse_num("rice even-row k", even)?,
                    odd: parse_num("rice odd-row k", odd)?,
                }),
                None => Ok(Scheme::Rice { k: parse_num("rice k", k)? }),
            },
            ["lzss", ctrl, flag, split, base, word] => {
                let literal_flag = match *flag {
                    "one" => FlagPolarity::OneIsLiteral,
                    "zero" => FlagPolarity::ZeroIsLiteral,
                    _ => return Err(bad("lzss flag polarity", flag)),
                };
                let split = match *split {
                    "12/4" => MatchSplit::O12L4,
                    "11/5" => MatchSplit::O11L5,
                    "10/6" => MatchSplit::O10L6,
                    _ => return Err(bad("lzss split", split)),
                };
                let word_order = match *word {
                    "straight" => WordOrder::Straight,
                    "swap" => WordOrder::Swap,
                    _ => return Err(bad("lzss word order", word)),
                };
                Ok(Scheme::Lzss(LzssParams {
                    ctrl_order: ctrl.parse()?,
                    literal_flag,
                    split,
                    len_base: parse_num("lzss length base", base)?,
                    word_order,
                }))
            }
            ["bitplane", planes, start] => {
                let plane_order = match *planes {
                    "msb" => PlaneOrder::MsbFirst,
                    "lsb" => PlaneOrder::LsbFirst,
                    _ => return Err(bad("plane order", planes)),
                };
                let start_bit = match *start {
                    "0" => false,
                    "1" => true,
                    _ => return Err(bad("bitplane start bit", start)),
                };
                Ok(Scheme::Bitplane(BitplaneParams { plane_order, start_bit }))
            }
            _ => Err(bad("scheme", s)),
        }
    }
}
