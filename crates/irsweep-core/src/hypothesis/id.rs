// crates/irsweep-core/src/hypothesis/id.rs

use super::Hypothesis;

pub fn blake3_8(bytes: &[u8]) -> [u8; 8] {
    let hash = blake3::hash(bytes);
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash.as_bytes()[0..8]);
    out
}

pub fn hypothesis_id(h: &Hypothesis) -> [u8; 8] {
    blake3_8(h.to_string().as_bytes())
}

pub fn hypothesis_id_hex(h: &Hypothesis) -> String {
    let mut s = String::with_capacity(16);
    for b in hypothesis_id(h) {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
