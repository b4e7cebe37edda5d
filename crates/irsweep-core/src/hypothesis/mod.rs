// crates/irsweep-core/src/hypothesis/mod.rs
//
// A Hypothesis is one complete decode configuration. It is a Copy value, so
// every worker owns its own and nothing about it is shared.
//
// Canonical label (round-trips through FromStr):
//   order=msb align=0 scheme=rice:4 pred=left sign=plus seed=row16 reset=none scan=row
//
// A nonzero output shift is appended as ` shift=N`; a label without it
// means shift 0.
//
// When parsing, missing keys take the values of `Hypothesis::default()`.

pub mod axes;
pub mod defaults;
pub mod id;
pub mod space;

use std::fmt;
use std::str::FromStr;

use crate::bits::BitOrder;
use crate::entropy::SignConvention;
use crate::error::SweepError;
use crate::predict::Predictor;

pub use axes::{LiteralKind, ResetPolicy, ScanOrder, Scheme, Seeding, TileBaseline, TileReset};
pub use space::{Rejected, SearchSpace};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hypothesis {
    pub order: BitOrder,
    /// Bits skipped before the first symbol (0..=7).
    pub align: u8,
    pub scheme: Scheme,
    pub predictor: Predictor,
    pub sign: SignConvention,
    pub seeding: Seeding,
    pub reset: ResetPolicy,
    pub scan: ScanOrder,
    /// Left shift applied to every reconstructed sample (0, 2 or 4), for
    /// sensors whose true depth is 16, 14 or 12 bits.
    pub shift: u8,
}

impl Default for Hypothesis {
    fn default() -> Self {
        Self {
            order: BitOrder::Msb,
            align: 0,
            scheme: Scheme::Rice { k: 4 },
            predictor: Predictor::Left,
            sign: SignConvention::Plus,
            seeding: Seeding::RowLiteral16,
            reset: ResetPolicy::None,
            scan: ScanOrder::RowMajor,
            shift: 0,
        }
    }
}

impl Hypothesis {
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Stable 16-hex-digit id derived from the canonical label.
    pub fn id_hex(&self) -> String {
        id::hypothesis_id_hex(self)
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order={} align={} scheme={} pred={} sign={} seed={} reset={} scan={}",
            self.order, self.align, self.scheme, self.predictor, self.sign, self.seeding, self.reset, self.scan
        )?;
        if self.shift != 0 {
            write!(f, " shift={}", self.shift)?;
        }
        Ok(())
    }
}

impl FromStr for Hypothesis {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut h = Hypothesis::default();
        for field in s.split_whitespace() {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| SweepError::InvalidConfig(format!("expected key=value, got {:?}", field)))?;
            match key {
                "order" => h.order = value.parse()?,
                "align" => {
                    h.align = value
                        .parse()
                        .map_err(|_| SweepError::InvalidConfig(format!("bad align {:?}", value)))?
                }
                "scheme" => h.scheme = value.parse()?,
                "pred" => h.predictor = value.parse()?,
                "sign" => h.sign = value.parse()?,
                "seed" => h.seeding = value.parse()?,
                "reset" => h.reset = value.parse()?,
                "scan" => h.scan = value.parse()?,
                "shift" => {
                    h.shift = value
                        .parse()
                        .map_err(|_| SweepError::InvalidConfig(format!("bad shift {:?}", value)))?
                }
                other => {
                    return Err(SweepError::InvalidConfig(format!("unknown hypothesis key {:?}", other)));
                }
            }
        }
        Ok(h)
    }
}
