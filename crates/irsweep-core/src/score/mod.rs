// crates/irsweep-core/src/score/mod.rs
//
// Plausibility scoring without ground truth.
//
// cost  = w_grad  * max(h, v)
//       + w_imb   * imbalance * max(h, v)
//       + w_row   * row_mean_var
//       + w_sat   * saturation
//       + w_chi2  * chi2                  (only when a remainder histogram exists)
//       + w_flat  * max(0, floor - std_dev)
// score = -cost + w_bytes * bytes_used
//
// Higher is better. A failed decode gets FAILURE_SCORE and no metrics.

use crate::frame::SampleGrid;
use crate::reconstruct::Decoded;

/// Score of a hypothesis whose decode failed.
pub const FAILURE_SCORE: f64 = -1e12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// Mean |difference| between horizontally adjacent samples.
    pub h_grad: f64,
    /// Mean |difference| between vertically adjacent samples.
    pub v_grad: f64,
    /// Variance of the per-row means.
    pub row_mean_var: f64,
    pub std_dev: f64,
    /// Excess mass in the extreme high-byte tails.
    pub saturation: f64,
    /// Chi-square of the Rice remainder histogram against uniform.
    pub chi2: Option<f64>,
    /// |h - v| / max(1, h, v).
    pub imbalance: f64,
    pub bytes_used: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreWeights {
    pub grad: f64,
    pub imbalance: f64,
    pub row_var: f64,
    pub saturation: f64,
    pub chi2: f64,
    pub flat: f64,
    pub flat_floor: f64,
    pub bytes_used: f64,
    /// Tail fraction tolerated before the saturation term counts.
    pub tail_allowance: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            grad: 3.0,
            imbalance: 1.5,
            row_var: 0.02,
            saturation: 200.0,
            chi2: 0.02,
            flat: 0.05,
            flat_floor: 500.0,
            bytes_used: 0.03,
            tail_allowance: 0.05,
        }
    }
}

impl ScoreWeights {
    pub fn score(&self, m: &Metrics) -> f64 {
        let g = m.h_grad.max(m.v_grad);
        let cost = self.grad * g
            + self.imbalance * m.imbalance * g
            + self.row_var * m.row_mean_var
            + self.saturation * m.saturation
            + self.chi2 * m.chi2.unwrap_or(0.0)
            + self.flat * (self.flat_floor - m.std_dev).max(0.0);
        let s = -cost + self.bytes_used * m.bytes_used as f64;
        if s.is_nan() {
            FAILURE_SCORE
        } else {
            s
        }
    }
}

/// Chi-square of `hist` against a uniform distribution; None for an empty histogram.
pub fn chi_square_uniform(hist: &[u64]) -> Option<f64> {
    let n: u64 = hist.iter().sum();
    if hist.is_empty() || n == 0 {
        return None;
    }
    let expected = n as f64 / hist.len() as f64;
    Some(
        hist.iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum(),
    )
}

pub fn compute_metrics(grid: &SampleGrid, remainders: Option<&[u64]>, bytes_used: usize, tail_allowance: f64) -> Metrics {
    let g = grid.geometry();
    let (w, h) = (g.width, g.height);

    let mut h_sum = 0u64;
    let mut v_sum = 0u64;
    let mut row_means = Vec::with_capacity(h);
    let mut sum = 0f64;
    let mut sum_sq = 0f64;
    let mut low = 0usize;
    let mut high = 0usize;

    for y in 0..h {
        let row = grid.row(y);
        let mut rs = 0u64;
        for x in 0..w {
            let p = row[x];
            rs += p as u64;
            sum += p as f64;
            sum_sq += (p as f64) * (p as f64);
            match p >> 8 {
                0..=4 => low += 1,
                251..=255 => high += 1,
                _ => {}
            }
            if x + 1 < w {
                h_sum += p.abs_diff(row[x + 1]) as u64;
            }
            if y + 1 < h {
                v_sum += p.abs_diff(grid.get(y + 1, x)) as u64;
            }
        }
        row_means.push(rs as f64 / w as f64);
    }

    let h_pairs = (w.saturating_sub(1) * h) as f64;
    let v_pairs = (w * h.saturating_sub(1)) as f64;
    let h_grad = if h_pairs > 0.0 { h_sum as f64 / h_pairs } else { 0.0 };
    let v_grad = if v_pairs > 0.0 { v_sum as f64 / v_pairs } else { 0.0 };

    let mean_rows = row_means.iter().sum::<f64>() / h as f64;
    let row_mean_var = row_means.iter().map(|m| (m - mean_rows).powi(2)).sum::<f64>() / h as f64;

    let n = g.cells() as f64;
    let mean = sum / n;
    let std_dev = (sum_sq / n - mean * mean).max(0.0).sqrt();

    let p_low = low as f64 / n;
    let p_high = high as f64 / n;
    let saturation = (p_low - tail_allowance).max(0.0) + (p_high - tail_allowance).max(0.0);

    let imbalance = (h_grad - v_grad).abs() / h_grad.max(v_grad).max(1.0);

    Metrics {
        h_grad,
        v_grad,
        row_mean_var,
        std_dev,
        saturation,
        chi2: remainders.and_then(chi_square_uniform),
        imbalance,
        bytes_used,
    }
}

/// Metrics and composite score of a successful decode.
pub fn score_decoded(d: &Decoded, weights: &ScoreWeights) -> (f64, Metrics) {
    let m = compute_metrics(&d.grid, d.remainders.as_deref(), d.bytes_consumed(), weights.tail_allowance);
    (weights.score(&m), m)
}
