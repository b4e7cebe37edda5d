// crates/irsweep-core/tests/entropy_codes.rs

use irsweep_core::bits::{BitCursor, BitOrder, BitWriter};
use irsweep_core::entropy::expgolomb::{
    decode_exp_golomb, decode_exp_golomb_signed, encode_exp_golomb, encode_exp_golomb_signed,
};
use irsweep_core::entropy::rice::{decode_rice, decode_rice_signed, encode_rice_signed};
use irsweep_core::entropy::{zigzag_decode, zigzag_encode, SignConvention, UNARY_GUARD};
use irsweep_core::error::{DecodeFailure, Exhaustion};
use proptest::prelude::*;

const WIDE_GUARD: u32 = 1 << 20;

fn order_of(b: bool) -> BitOrder {
    if b {
        BitOrder::Msb
    } else {
        BitOrder::Lsb
    }
}

fn sign_of(b: bool) -> SignConvention {
    if b {
        SignConvention::Plus
    } else {
        SignConvention::Minus
    }
}

#[test]
fn plus_mapping_matches_the_zigzag_table() {
    let plus = SignConvention::Plus;
    let minus = SignConvention::Minus;
    let table = [(0u64, 0i64), (1, -1), (2, 1), (3, -2), (4, 2)];
    for (u, e) in table {
        assert_eq!(plus.to_signed(u), e);
        assert_eq!(minus.to_signed(u), -e);
        assert_eq!(zigzag_decode(u), e);
        assert_eq!(zigzag_encode(e), u);
    }
}

#[test]
fn rice_k4_codeword_layout() {
    // u = 37 -> q = 2, r = 5: "001" + "0101"
    let data = [0b0010_1010u8];
    let mut cur = BitCursor::new(&data, BitOrder::Msb);
    let code = decode_rice(&mut cur, 4, UNARY_GUARD).unwrap();
    assert_eq!(code.value, 37);
    assert_eq!(code.remainder, 5);
    assert_eq!(cur.bit_pos(), 7);
}

#[test]
fn exp_golomb_first_codewords() {
    // 0 -> 1, 1 -> 010, 2 -> 011, 3 -> 00100
    let mut w = BitWriter::new(BitOrder::Msb);
    for v in [0u64, 1, 2, 3] {
        encode_exp_golomb(&mut w, v, UNARY_GUARD).unwrap();
    }
    assert_eq!(w.bit_len(), 12);
    let bytes = w.into_bytes();
    assert_eq!(bytes, vec![0b1010_0110, 0b0100_0000]);

    let mut cur = BitCursor::new(&bytes, BitOrder::Msb);
    for v in [0u64, 1, 2, 3] {
        assert_eq!(decode_exp_golomb(&mut cur, UNARY_GUARD).unwrap(), v);
    }
}

#[test]
fn all_zero_stream_trips_the_unary_guard() {
    let data = vec![0u8; 1024];
    for k in 0..=8u8 {
        let mut cur = BitCursor::new(&data, BitOrder::Msb);
        let err = decode_rice(&mut cur, k, UNARY_GUARD).unwrap_err();
        assert_eq!(
            err,
            DecodeFailure::StreamExhausted {
                bit: UNARY_GUARD as u64,
                cause: Exhaustion::UnaryGuard
            }
        );
    }
}

#[test]
fn truncated_remainder_is_exhaustion_not_a_partial_symbol() {
    // unary terminator present, remainder cut short
    let data = [0b0000_0001u8];
    let mut cur = BitCursor::new(&data, BitOrder::Msb);
    let err = decode_rice(&mut cur, 4, UNARY_GUARD).unwrap_err();
    assert!(err.is_exhaustion());
    assert_eq!(err.tag(), "eof");
}

proptest! {
    #[test]
    fn rice_roundtrip(
        k in 0u8..=12,
        msb in any::<bool>(),
        plus in any::<bool>(),
        values in prop::collection::vec(-5000i64..5000, 1..64),
    ) {
        let order = order_of(msb);
        let sign = sign_of(plus);
        let mut w = BitWriter::new(order);
        for &e in &values {
            encode_rice_signed(&mut w, e, k, sign, WIDE_GUARD).unwrap();
        }
        let bytes = w.into_bytes();
        let mut cur = BitCursor::new(&bytes, order);
        for &e in &values {
            prop_assert_eq!(decode_rice_signed(&mut cur, k, sign, WIDE_GUARD).unwrap(), e);
        }
        prop_assert!(cur.remaining() < 8);
    }

    #[test]
    fn exp_golomb_roundtrip(
        msb in any::<bool>(),
        plus in any::<bool>(),
        values in prop::collection::vec(-1_000_000i64..1_000_000, 1..64),
    ) {
        let order = order_of(msb);
        let sign = sign_of(plus);
        let mut w = BitWriter::new(order);
        for &e in &values {
            encode_exp_golomb_signed(&mut w, e, sign, UNARY_GUARD).unwrap();
        }
        let bytes = w.into_bytes();
        let mut cur = BitCursor::new(&bytes, order);
        for &e in &values {
            prop_assert_eq!(decode_exp_golomb_signed(&mut cur, sign, UNARY_GUARD).unwrap(), e);
        }
    }
}
