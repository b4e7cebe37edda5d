// crates/irsweep-core/src/bits/cursor.rs
//
// Bit-addressable reader over an immutable byte buffer.
//
// Bit numbering within a byte depends on the order:
// - Msb: bit 0 of the stream is the MSB of byte 0 (0x80), values compose MSB-first.
// - Lsb: bit 0 of the stream is the LSB of byte 0 (0x01), values compose LSB-first.
//
// A read that would run past the end fails with StreamExhausted and does not move
// the cursor. Exhaustion is the normal fate of a wrong hypothesis.

use crate::error::DecodeFailure;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitOrder {
    Msb,
    Lsb,
}

/// Absolute bit offset into a stream plus the order it is read in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitAddress {
    pub bit: u64,
    pub order: BitOrder,
}

impl BitAddress {
    pub fn byte(&self) -> u64 {
        self.bit / 8
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.bit % 8 == 0
    }
}

#[derive(Clone, Debug)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    order: BitOrder,
    pos: u64,
    end: u64,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8], order: BitOrder) -> Self {
        Self::at(data, order, 0)
    }

    /// Cursor starting at an absolute bit offset. Offsets past the end are clamped
    /// to the end, so the first read fails.
    pub fn at(data: &'a [u8], order: BitOrder, start_bit: u64) -> Self {
        let end = (data.len() as u64) * 8;
        Self {
            data,
            order,
            pos: start_bit.min(end),
            end,
        }
    }

    pub fn position(&self) -> BitAddress {
        BitAddress { bit: self.pos, order: self.order }
    }

    #[inline]
    pub fn bit_pos(&self) -> u64 {
        self.pos
    }

    pub fn order(&self) -> BitOrder {
        self.order
    }

    pub fn len_bits(&self) -> u64 {
        self.end
    }

    pub fn remaining(&self) -> u64 {
        self.end - self.pos
    }

    #[inline]
    fn bit_at(&self, pos: u64) -> u32 {
        let b = self.data[(pos >> 3) as usize];
        let i = (pos & 7) as u32;
        match self.order {
            BitOrder::Msb => ((b >> (7 - i)) & 1) as u32,
            BitOrder::Lsb => ((b >> i) & 1) as u32,
        }
    }

    #[inline]
    pub fn read_bit(&mut self) -> Result<u32, DecodeFailure> {
        if self.pos >= self.end {
            return Err(DecodeFailure::eof(self.pos));
        }
        let bit = self.bit_at(self.pos);
        self.pos += 1;
        Ok(bit)
    }

    /// Read `n` bits (0..=64) as an unsigned value in the cursor's order.
    pub fn read_bits(&mut self, n: u32) -> Result<u64, DecodeFailure> {
        debug_assert!(n <= 64);
        if n == 0 {
            return Ok(0);
        }
        if self.remaining() < n as u64 {
            return Err(DecodeFailure::eof(self.pos));
        }
        let mut v: u64 = 0;
        for i in 0..n {
            let bit = self.bit_at(self.pos) as u64;
            self.pos += 1;
            match self.order {
                BitOrder::Msb => v = (v << 1) | bit,
                BitOrder::Lsb => v |= bit << i,
            }
        }
        Ok(v)
    }

    /// Advance to the next multiple of 8; no-op when already aligned.
    pub fn align_to_byte(&mut self) {
        let r = self.pos % 8;
        if r != 0 {
            self.pos += 8 - r;
        }
    }
}
