// crates/irsweep-core/src/entropy/lzss.rs
//
// LZSS token stream over 16-bit words.
//
// Layout:
//   control byte (8 flags, consumed MSB-first or LSB-first)
//   per flag: literal  -> 16-bit word
//             match    -> 16-bit token = offset:len fields, offset in the high bits
//
// Matches copy `len` words starting `offset` words back in the decoded word
// stream. A match is rejected when:
//   - offset is zero,
//   - the source starts before the current window (stream start, or the start
//     of the current reset segment),
//   - the source range reaches words that are not yet decoded (offset < len),
//   - the copy would run past the end of the current segment.

use crate::bits::{BitCursor, BitOrder, BitWriter};
use crate::error::{DecodeFailure, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagPolarity {
    OneIsLiteral,
    ZeroIsLiteral,
}

impl FlagPolarity {
    #[inline]
    fn is_literal(self, flag: u8) -> bool {
        match self {
            FlagPolarity::OneIsLiteral => flag == 1,
            FlagPolarity::ZeroIsLiteral => flag == 0,
        }
    }

    /// Control byte whose eight flags all mean "literal".
    pub fn all_literal_byte(self) -> u8 {
        match self {
            FlagPolarity::OneIsLiteral => 0xFF,
            FlagPolarity::ZeroIsLiteral => 0x00,
        }
    }
}

/// Offset/length split of the 16-bit match token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchSplit {
    O12L4,
    O11L5,
    O10L6,
}

impl MatchSplit {
    pub const ALL: [MatchSplit; 3] = [MatchSplit::O12L4, MatchSplit::O11L5, MatchSplit::O10L6];

    pub fn len_bits(self) -> u32 {
        match self {
            MatchSplit::O12L4 => 4,
            MatchSplit::O11L5 => 5,
            MatchSplit::O10L6 => 6,
        }
    }

    pub fn offset_bits(self) -> u32 {
        16 - self.len_bits()
    }
}

/// Byte arrangement of literal words relative to how the cursor reads them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordOrder {
    /// Use the 16 bits as read.
    Straight,
    /// Exchange the two bytes after reading (little-endian literals under an Msb cursor).
    Swap,
}

impl WordOrder {
    #[inline]
    pub fn apply(self, w: u16) -> u16 {
        match self {
            WordOrder::Straight => w,
            WordOrder::Swap => w.swap_bytes(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LzssParams {
    pub ctrl_order: BitOrder,
    pub literal_flag: FlagPolarity,
    pub split: MatchSplit,
    /// Added to the length field; 2 or 3.
    pub len_base: u8,
    pub word_order: WordOrder,
}

/// Stateful word decoder.
///
/// `total` is the number of words the caller will request. Without resets a
/// match may run anywhere up to it. Once the
/// reconstructor opens a fresh segment, matches are confined to the current
/// reset unit: the window starts at the fresh segment and ends where the
/// announced segments end.
#[derive(Clone, Debug)]
pub struct LzssDecoder {
    params: LzssParams,
    ctrl: u8,
    flags_left: u8,
    history: Vec<u16>,
    window_start: usize,
    segment_end: usize,
    bounded: bool,
    pending: usize,
    copy_from: usize,
}

impl LzssDecoder {
    pub fn new(params: LzssParams, total: usize) -> Self {
        Self {
            params,
            ctrl: 0,
            flags_left: 0,
            history: Vec::with_capacity(total),
            window_start: 0,
            segment_end: total,
            bounded: false,
            pending: 0,
            copy_from: 0,
        }
    }

    /// Announce `len` more words. A fresh segment restarts the match window and
    /// drops any unused flags of the current control byte.
    pub fn begin_segment(&mut self, len: usize, fresh: bool) {
        if fresh {
            self.bounded = true;
            self.window_start = self.history.len();
            self.segment_end = self.history.len() + len;
            self.flags_left = 0;
        } else if self.bounded {
            self.segment_end += len;
        }
    }

    fn next_flag(&mut self, cur: &mut BitCursor<'_>) -> std::result::Result<u8, DecodeFailure> {
        if self.flags_left == 0 {
            self.ctrl = cur.read_bits(8)? as u8;
            self.flags_left = 8;
        }
        let i = 8 - self.flags_left;
        self.flags_left -= 1;
        Ok(match self.params.ctrl_order {
            BitOrder::Msb => (self.ctrl >> (7 - i)) & 1,
            BitOrder::Lsb => (self.ctrl >> i) & 1,
        })
    }

    fn copy_one(&mut self) -> u16 {
        let w = self.history[self.copy_from];
        self.copy_from += 1;
        self.pending -= 1;
        self.history.push(w);
        w
    }

    pub fn next_word(&mut self, cur: &mut BitCursor<'_>) -> std::result::Result<u16, DecodeFailure> {
        if self.pending > 0 {
            return Ok(self.copy_one());
        }

        let flag = self.next_flag(cur)?;
        if self.params.literal_flag.is_literal(flag) {
            let w = self.params.word_order.apply(cur.read_bits(16)? as u16);
            self.history.push(w);
            return Ok(w);
        }

        let at = cur.bit_pos();
        let token = cur.read_bits(16)? as u32;
        let len_bits = self.params.split.len_bits();
        let offset = token >> len_bits;
        let len = (token & ((1u32 << len_bits) - 1)) + self.params.len_base as u32;

        let out = self.history.len();
        let reject = offset == 0
            || offset as usize > out - self.window_start
            || offset < len
            || out + len as usize > self.segment_end;
        if reject {
            return Err(DecodeFailure::BadMatch { bit: at, offset, len });
        }

        self.pending = len as usize;
        self.copy_from = out - offset as usize;
        Ok(self.copy_one())
    }
}

/// Literal-only writer mirroring `LzssDecoder` flag consumption.
#[derive(Clone, Debug)]
pub struct LzssLiteralWriter {
    params: LzssParams,
    flags_left: u8,
}

impl LzssLiteralWriter {
    pub fn new(params: LzssParams) -> Self {
        Self { params, flags_left: 0 }
    }

    pub fn begin_segment(&mut self, fresh: bool) {
        if fresh {
            self.flags_left = 0;
        }
    }

    pub fn put_word(&mut self, w: &mut BitWriter, word: u16) -> Result<()> {
        if self.flags_left == 0 {
            w.write_bits(self.params.literal_flag.all_literal_byte() as u64, 8)?;
            self.flags_left = 8;
        }
        self.flags_left -= 1;
        // Swap is its own inverse.
        w.write_bits(self.params.word_order.apply(word) as u64, 16)
    }
}
