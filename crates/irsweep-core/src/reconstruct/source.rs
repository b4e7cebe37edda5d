// crates/irsweep-core/src/reconstruct/source.rs
//
// One symbol source per hypothesis, dispatched by scheme. Every scheme
// yields a signed delta for the combine rule: residual codes through the sign
// convention's zigzag mapping, raw words through word_delta.

use crate::bits::BitCursor;
use crate::entropy::bitplane::{decode_bitplane_row, BitplaneParams};
use crate::entropy::expgolomb::decode_exp_golomb;
use crate::entropy::lzss::LzssDecoder;
use crate::entropy::rice::decode_rice;
use crate::entropy::SignConvention;
use crate::error::DecodeFailure;
use crate::hypothesis::{Hypothesis, Scheme};

enum Kind {
    /// `k` is the parameter of the current segment's row.
    Rice { even: u8, odd: u8, k: u8 },
    ExpGolomb,
    Lzss(LzssDecoder),
    Bitplane {
        params: BitplaneParams,
        row: Vec<u16>,
        next: usize,
        pending: Option<usize>,
    },
}

pub(crate) struct SymbolSource {
    kind: Kind,
    sign: SignConvention,
    guard: u32,
    remainders: Option<Vec<u64>>,
}

impl SymbolSource {
    /// `symbols` is the number of symbols the plan will request.
    pub fn new(h: &Hypothesis, guard: u32, symbols: usize) -> Self {
        let (kind, remainders) = match h.scheme {
            Scheme::Rice { k } => {
                let hist = (k > 0).then(|| vec![0u64; 1usize << k]);
                (Kind::Rice { even: k, odd: k, k }, hist)
            }
            Scheme::RiceParity { even, odd } => (Kind::Rice { even, odd, k: even }, None),
            Scheme::ExpGolomb => (Kind::ExpGolomb, None),
            Scheme::Lzss(p) => (Kind::Lzss(LzssDecoder::new(p, symbols)), None),
            Scheme::Bitplane(params) => (
                Kind::Bitplane {
                    params,
                    row: Vec::new(),
                    next: 0,
                    pending: None,
                },
                None,
            ),
        };
        Self {
            kind,
            sign: h.sign,
            guard,
            remainders,
        }
    }

    pub fn begin_segment(&mut self, row: usize, len: usize, fresh: bool) {
        match &mut self.kind {
            Kind::Rice { even, odd, k } => *k = if row % 2 == 0 { *even } else { *odd },
            Kind::ExpGolomb => {}
            Kind::Lzss(dec) => dec.begin_segment(len, fresh),
            Kind::Bitplane { pending, next, row, .. } => {
                row.clear();
                *next = 0;
                *pending = Some(len);
            }
        }
    }

    pub fn next_delta(&mut self, cur: &mut BitCursor<'_>) -> Result<i64, DecodeFailure> {
        match &mut self.kind {
            Kind::Rice { k, .. } => {
                let code = decode_rice(cur, *k, self.guard)?;
                if let Some(hist) = self.remainders.as_mut() {
                    hist[code.remainder as usize] += 1;
                }
                Ok(self.sign.to_signed(code.value))
            }
            Kind::ExpGolomb => Ok(self.sign.to_signed(decode_exp_golomb(cur, self.guard)?)),
            Kind::Lzss(dec) => Ok(self.sign.word_delta(dec.next_word(cur)?)),
            Kind::Bitplane {
                params,
                row,
                next,
                pending,
            } => {
                // Planes are read at the first symbol of the segment so that a
                // row literal precedes them in the stream.
                if let Some(len) = pending.take() {
                    decode_bitplane_row(cur, *params, len, self.guard, row)?;
                    *next = 0;
                }
                let w = row.get(*next).copied().ok_or(DecodeFailure::eof(cur.bit_pos()))?;
                *next += 1;
                Ok(self.sign.word_delta(w))
            }
        }
    }

    /// Rice remainder histogram (single k > 0 only).
    pub fn into_remainders(self) -> Option<Vec<u64>> {
        self.remainders
    }
}
