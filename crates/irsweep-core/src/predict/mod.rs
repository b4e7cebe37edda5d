// crates/irsweep-core/src/predict/mod.rs
//
// Spatial predictors over a partially reconstructed grid, and the 16-bit
// wrap-around rule that combines a prediction with a decoded delta.
//
// Neighbour naming (current cell X, scan direction left-to-right shown):
//
//        D
//     C  B
//     A  X
//
// A is the previously traversed cell of the same row segment, so under a
// serpentine scan on a reversed row it sits to the right of X.

/// Already-reconstructed neighbours of the current cell.
///
/// Missing A/B/C are resolved to a fill value (normally 0) before prediction.
/// D stays optional so the order-2 predictors can fall back to `up`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighborhood {
    pub a: u16,
    pub b: u16,
    pub c: u16,
    pub d: Option<u16>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Predictor {
    /// P = 0; the decoded delta is the sample.
    Raw,
    Left,
    Up,
    Med,
    Up2,
    V2,
}

impl Predictor {
    pub const ALL: [Predictor; 6] = [
        Predictor::Raw,
        Predictor::Left,
        Predictor::Up,
        Predictor::Med,
        Predictor::Up2,
        Predictor::V2,
    ];

    pub fn predict(self, n: Neighborhood) -> u16 {
        match self {
            Predictor::Raw => 0,
            Predictor::Left => n.a,
            Predictor::Up => n.b,
            Predictor::Med => med(n.a, n.b, n.c),
            Predictor::Up2 => n.d.unwrap_or(n.b),
            Predictor::V2 => match n.d {
                Some(d) => (2 * n.b as i32 - d as i32).clamp(0, u16::MAX as i32) as u16,
                None => n.b,
            },
        }
    }
}

/// LOCO-I median edge detector.
#[inline]
pub fn med(a: u16, b: u16, c: u16) -> u16 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if c >= hi {
        lo
    } else if c <= lo {
        hi
    } else {
        // lo < c < hi, so a + b - c stays inside [lo, hi].
        (a as i32 + b as i32 - c as i32) as u16
    }
}

/// (P + e) mod 65536.
#[inline]
pub fn reconstruct_sample(p: u16, e: i64) -> u16 {
    (p as i64 + e).rem_euclid(65536) as u16
}

/// Smallest signed delta e with `reconstruct_sample(p, e) == actual`, in [-32768, 32767].
#[inline]
pub fn residual_between(p: u16, actual: u16) -> i64 {
    actual.wrapping_sub(p) as i16 as i64
}
