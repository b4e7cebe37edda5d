// crates/irsweep-core/src/bits/writer.rs

use crate::bits::cursor::BitOrder;
use crate::error::{Result, SweepError};

/// Bit writer producing exactly what `BitCursor` reads back under the same order.
///
/// Bit order matches the cursor:
/// - Msb: the first bit written becomes the MSB of output[0]; a value's high bit goes first.
/// - Lsb: the first bit written becomes the LSB of output[0]; a value's low bit goes first.
///
/// The final partial byte is zero-padded.
#[derive(Clone, Debug)]
pub struct BitWriter {
    order: BitOrder,
    out: Vec<u8>,
    bit_len: u64,
}

impl BitWriter {
    pub fn new(order: BitOrder) -> Self {
        Self {
            order,
            out: Vec::new(),
            bit_len: 0,
        }
    }

    pub fn order(&self) -> BitOrder {
        self.order
    }

    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn write_bit(&mut self, bit: bool) {
        let byte_idx = (self.bit_len / 8) as usize;
        let bit_in_byte = (self.bit_len % 8) as u32;
        if byte_idx == self.out.len() {
            self.out.push(0);
        }
        if bit {
            match self.order {
                BitOrder::Msb => self.out[byte_idx] |= 1u8 << (7 - bit_in_byte),
                BitOrder::Lsb => self.out[byte_idx] |= 1u8 << bit_in_byte,
            }
        }
        self.bit_len += 1;
    }

    /// Write the low `n` bits of `value`.
    ///
    /// Requirements:
    /// - `n` must be in 0..=64.
    /// - `value` must fit in `n` bits.
    pub fn write_bits(&mut self, value: u64, n: u32) -> Result<()> {
        if n > 64 {
            return Err(SweepError::Validation(format!(
                "write_bits width must be <= 64, got {}",
                n
            )));
        }
        if n < 64 && (value >> n) != 0 {
            return Err(SweepError::Validation(format!(
                "value out of range: value={} bits={}",
                value, n
            )));
        }
        match self.order {
            BitOrder::Msb => {
                for b in (0..n).rev() {
                    self.write_bit((value >> b) & 1 == 1);
                }
            }
            BitOrder::Lsb => {
                for b in 0..n {
                    self.write_bit((value >> b) & 1 == 1);
                }
            }
        }
        Ok(())
    }

    pub fn write_zeros(&mut self, n: u64) {
        for _ in 0..n {
            self.write_bit(false);
        }
    }

    /// Pad with zero bits to the next multiple of 8; no-op when aligned.
    pub fn align_to_byte(&mut self) {
        let r = self.bit_len % 8;
        if r != 0 {
            self.write_zeros(8 - r);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}
