// crates/irsweep-core/tests/reconstruct_scenarios.rs

use irsweep_core::bits::{BitOrder, BitWriter};
use irsweep_core::encode::encode_frame;
use irsweep_core::entropy::rice::encode_rice_signed;
use irsweep_core::entropy::{SignConvention, UNARY_GUARD};
use irsweep_core::error::DecodeFailure;
use irsweep_core::hypothesis::defaults::rice_space;
use irsweep_core::{reconstruct, EvalLimits, Geometry, Hypothesis, SampleGrid};

fn lcg_next(x: &mut u64) -> u64 {
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

/// Smooth frame with small noise, every sample a multiple of 4.
fn smooth_grid(width: usize, height: usize, seed: u64) -> SampleGrid {
    let g = Geometry::new(width, height).unwrap();
    let mut s = seed;
    let mut samples = Vec::with_capacity(g.cells());
    for y in 0..height {
        for x in 0..width {
            let noise = (lcg_next(&mut s) >> 59) as u16;
            samples.push(((3000 + 20 * x + 12 * y) as u16 + noise) & !3);
        }
    }
    SampleGrid::from_samples(g, samples).unwrap()
}

fn hyp(label: &str) -> Hypothesis {
    label.parse().unwrap()
}

#[test]
fn literal_then_rice_left_row_scenario() {
    // 0x1234 literal, then Rice(k=4) plus-mapped residuals [0, -1, 1, -2]:
    // 1 0000 | 1 0001 | 1 0010 | 1 0011
    let stream = [0x12u8, 0x34, 0x84, 0x65, 0x30];
    let h = hyp("order=msb align=0 scheme=rice:4 pred=left sign=plus seed=row16 reset=none scan=row");
    let g = Geometry::new(5, 1).unwrap();
    let d = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap();
    assert_eq!(d.grid.samples(), &[0x1234, 0x1234, 0x1233, 0x1234, 0x1232]);
    assert_eq!(d.bits_consumed(), 36);
    assert_eq!(d.slack_bytes(), 0);

    // the reference encoder produces the same bytes
    assert_eq!(encode_frame(&d.grid, &h).unwrap(), stream.to_vec());
}

#[test]
fn minus_sign_flips_the_same_residuals() {
    let stream = [0x12u8, 0x34, 0x84, 0x65, 0x30];
    let h = hyp("scheme=rice:4 pred=left sign=minus seed=row16");
    let g = Geometry::new(5, 1).unwrap();
    let d = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap();
    assert_eq!(d.grid.samples(), &[0x1234, 0x1234, 0x1235, 0x1234, 0x1236]);
}

#[test]
fn all_zero_stream_fails_under_every_rice_hypothesis() {
    let stream = vec![0u8; 1024];
    let g = Geometry::new(16, 8).unwrap();
    let (hyps, rejected) = rice_space().enumerate(g);
    assert!(rejected.is_empty());
    for h in hyps {
        let err = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap_err();
        assert!(err.is_exhaustion(), "{h}: {err}");
    }
}

#[test]
fn truncated_streams_fail_rather_than_fill_partially() {
    let grid = smooth_grid(12, 6, 3);
    let g = grid.geometry();
    let h = hyp("scheme=rice:4 pred=med sign=plus seed=row16 reset=row scan=serp");
    let stream = encode_frame(&grid, &h).unwrap();
    let full = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap();
    assert_eq!(full.grid, grid);

    for cut in 0..stream.len() {
        match reconstruct(&stream[..cut], g, &h, &EvalLimits::default()) {
            Ok(d) => {
                assert_eq!(d.grid.samples().len(), g.cells());
                assert!(d.end_bit <= cut as u64 * 8);
            }
            Err(e) => assert!(e.is_exhaustion(), "cut={cut}: {e}"),
        }
    }
    // dropping more than the final byte always loses symbols
    assert!(reconstruct(&stream[..stream.len() - 2], g, &h, &EvalLimits::default()).is_err());
}

#[test]
fn step_budget_aborts_the_hypothesis() {
    let grid = smooth_grid(5, 1, 1);
    let h = Hypothesis::default();
    let stream = encode_frame(&grid, &h).unwrap();
    let limits = EvalLimits {
        max_steps: Some(3),
        ..EvalLimits::default()
    };
    let err = reconstruct(&stream, grid.geometry(), &h, &limits).unwrap_err();
    assert!(matches!(err, DecodeFailure::BudgetExceeded { limit: 3, .. }));
    assert!(reconstruct(&stream, grid.geometry(), &h, &EvalLimits::default()).is_ok());
}

#[test]
fn alignment_offsets_are_honoured() {
    let grid = smooth_grid(6, 4, 9);
    for align in 0..8u8 {
        let h = Hypothesis {
            align,
            ..hyp("scheme=rice:5 pred=up seed=frame16")
        };
        let stream = encode_frame(&grid, &h).unwrap();
        let d = reconstruct(&stream, grid.geometry(), &h, &EvalLimits::default()).unwrap();
        assert_eq!(d.grid, grid);
        assert_eq!(d.start_bit, align as u64);
    }
}

#[test]
fn every_axis_combination_roundtrips_through_the_encoder() {
    let grid = smooth_grid(10, 7, 21);
    let g = grid.geometry();
    let schemes = ["rice:4", "rice:6", "rice:3/5", "expgolomb"];
    let preds = ["left", "up", "med", "up2", "v2"];
    let seeds = ["row16", "row14", "frame16", "predicted"];
    let resets = [
        "none",
        "row",
        "tile:4x3:zero",
        "tile:4x3:seed",
        "tile:4x3:carry:align",
        "tile:10x2:seed:align",
    ];
    let mut n = 0;
    for order in ["msb", "lsb"] {
        for scheme in schemes {
            for pred in preds {
                for seed in seeds {
                    for reset in resets {
                        for scan in ["row", "serp", "lanes"] {
                            let h = hyp(&format!(
                                "order={order} align=3 scheme={scheme} pred={pred} sign=minus seed={seed} reset={reset} scan={scan}"
                            ));
                            let stream = encode_frame(&grid, &h).unwrap();
                            let d = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap();
                            assert_eq!(d.grid, grid, "{h}");
                            assert!(d.slack_bytes() == 0, "{h}");
                            n += 1;
                        }
                    }
                }
            }
        }
    }
    assert_eq!(n, 2 * 4 * 5 * 4 * 6 * 3);
}

#[test]
fn fourteen_bit_literals_are_shifted() {
    // 14-bit literal 0x048D -> sample 0x1234
    let g = Geometry::new(1, 1).unwrap();
    let h = hyp("scheme=rice:4 seed=row14");
    let stream = [0b0001_0010u8, 0b0011_0100];
    let d = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap();
    assert_eq!(d.grid.samples(), &[0x1234]);
    assert_eq!(d.bits_consumed(), 14);

    let odd = SampleGrid::from_samples(g, vec![0x1235]).unwrap();
    assert!(encode_frame(&odd, &h).is_err());
}

/// Rice(k) plus-mapped residuals, MSB first, one k per entry.
fn rice_stream(residuals: &[(i64, u8)]) -> Vec<u8> {
    let mut w = BitWriter::new(BitOrder::Msb);
    for &(e, k) in residuals {
        encode_rice_signed(&mut w, e, k, SignConvention::Plus, UNARY_GUARD).unwrap();
    }
    w.into_bytes()
}

#[test]
fn even_odd_lanes_predict_from_two_rows_up() {
    // frame rows: [10, 12] [20, 21] [11, 15]
    // even lane first (rows 0, 2), then the odd lane (row 1); up from y-2, zero baseline
    let stream = rice_stream(&[(10, 2), (12, 2), (1, 2), (3, 2), (20, 2), (21, 2)]);
    let g = Geometry::new(2, 3).unwrap();
    let lanes = hyp("scheme=rice:2 pred=up seed=predicted scan=lanes");
    let d = reconstruct(&stream, g, &lanes, &EvalLimits::default()).unwrap();
    assert_eq!(d.grid.samples(), &[10, 12, 20, 21, 11, 15]);
    assert_eq!(encode_frame(&d.grid, &lanes).unwrap(), stream);

    // read in plain row order the same symbols give a different frame
    let rows = hyp("scheme=rice:2 pred=up seed=predicted scan=row");
    let other = reconstruct(&stream, g, &rows, &EvalLimits::default()).unwrap();
    assert_eq!(other.grid.samples(), &[10, 12, 11, 15, 31, 36]);
}

#[test]
fn parity_rice_switches_k_by_row() {
    // rows use k = 1, 4, 1
    let stream = rice_stream(&[(5, 1), (-2, 1), (30, 4), (-17, 4), (0, 1), (3, 1)]);
    let g = Geometry::new(2, 3).unwrap();
    let h = hyp("scheme=rice:1/4 pred=raw seed=predicted");
    let d = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap();
    assert_eq!(d.grid.samples(), &[5, 0xFFFE, 30, 0xFFEF, 0, 3]);
    assert!(d.remainders.is_none());
    assert_eq!(encode_frame(&d.grid, &h).unwrap(), stream);

    // a single k misreads the odd row
    let single = hyp("scheme=rice:1 pred=raw seed=predicted");
    match reconstruct(&stream, g, &single, &EvalLimits::default()) {
        Ok(other) => assert_ne!(other.grid, d.grid),
        Err(e) => assert!(e.is_exhaustion(), "{e}"),
    }
}

#[test]
fn output_shift_scales_the_finished_frame() {
    let stream = [0x12u8, 0x34, 0x84, 0x65, 0x30];
    let g = Geometry::new(5, 1).unwrap();
    let h = hyp("scheme=rice:4 pred=left seed=row16 shift=2");
    assert_eq!(h.label(), format!("{} shift=2", hyp("scheme=rice:4 pred=left seed=row16")));
    let d = reconstruct(&stream, g, &h, &EvalLimits::default()).unwrap();
    assert_eq!(d.grid.samples(), &[0x48D0, 0x48D0, 0x48CC, 0x48D0, 0x48C8]);
    assert_eq!(encode_frame(&d.grid, &h).unwrap(), stream.to_vec());

    let grid = smooth_grid(8, 5, 4);
    for shift in [2u8, 4] {
        let h = Hypothesis {
            shift,
            ..hyp("scheme=rice:5 pred=v2 seed=frame16 scan=lanes")
        };
        let mut scaled = grid.clone();
        scaled.shift_left(shift);
        let stream = encode_frame(&scaled, &h).unwrap();
        let d = reconstruct(&stream, grid.geometry(), &h, &EvalLimits::default()).unwrap();
        assert_eq!(d.grid, scaled);
    }

    // low bits below the shift cannot be produced
    let odd = SampleGrid::from_samples(Geometry::new(1, 1).unwrap(), vec![0x1234]).unwrap();
    assert!(encode_frame(&odd, &hyp("shift=4")).is_err());
    assert!(encode_frame(&odd, &hyp("shift=2")).is_ok());
}

#[test]
fn default_step_budget_is_finite_and_covers_the_plan() {
    let g = Geometry::new(10, 7).unwrap();
    let limits = EvalLimits::default();
    assert_eq!(limits.step_budget(g, &Hypothesis::default()), 2 * (70 + 1));
    let tiled = hyp("reset=tile:4x3:seed");
    assert_eq!(limits.step_budget(g, &tiled), 2 * (70 + 9));
    let explicit = EvalLimits {
        max_steps: Some(5),
        ..limits
    };
    assert_eq!(explicit.step_budget(g, &tiled), 5);

    let grid = smooth_grid(10, 7, 6);
    let stream = encode_frame(&grid, &tiled).unwrap();
    assert_eq!(reconstruct(&stream, g, &tiled, &limits).unwrap().grid, grid);
}
