// crates/irsweep-core/tests/search_ranking.rs

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use irsweep_core::encode::encode_frame;
use irsweep_core::hypothesis::defaults::{rice_space, Preset};
use irsweep_core::hypothesis::space::{parse_aligns, parse_list, parse_schemes};
use irsweep_core::score::FAILURE_SCORE;
use irsweep_core::search::{evaluate, Outcome};
use irsweep_core::{Geometry, Hypothesis, Ranking, SampleGrid, ScoreRecord, Search};

fn lcg_next(x: &mut u64) -> u64 {
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

fn smooth_grid(width: usize, height: usize, seed: u64) -> SampleGrid {
    let g = Geometry::new(width, height).unwrap();
    let mut s = seed;
    let mut grid = SampleGrid::new(g);
    for y in 0..height {
        for x in 0..width {
            let noise = (lcg_next(&mut s) >> 60) as u16;
            grid.set(y, x, ((9000 + 90 * x + 70 * y) as u16 + noise) & !3);
        }
    }
    grid
}

fn record(score: f64) -> ScoreRecord {
    ScoreRecord {
        hypothesis: Hypothesis::default(),
        score,
        metrics: None,
        outcome: Outcome::Failed(irsweep_core::DecodeFailure::Incomplete { filled: 0, expected: 1 }),
    }
}

#[test]
fn ranking_orders_descending_and_truncates() {
    let ranking = Ranking::from_records(vec![record(5.0), record(FAILURE_SCORE), record(2.0)]);
    let scores: Vec<f64> = ranking.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![5.0, 2.0, -1e12]);
    let top: Vec<f64> = ranking.top(2).iter().map(|r| r.score).collect();
    assert_eq!(top, vec![5.0, 2.0]);
    assert_eq!(ranking.top(10).len(), 3);
    assert_eq!(ranking.best().map(|r| r.score), Some(5.0));
}

#[test]
fn search_finds_the_encoding_hypothesis_complete_and_exact() {
    let grid = smooth_grid(16, 8, 5);
    let truth: Hypothesis = "order=msb align=0 scheme=rice:5 pred=left sign=plus seed=row16 reset=none scan=row"
        .parse()
        .unwrap();
    let stream = encode_frame(&grid, &truth).unwrap();

    let (hyps, _) = rice_space().enumerate(grid.geometry());
    assert!(hyps.contains(&truth));
    let report = Search::new(&stream, grid.geometry()).with_workers(2).run(&hyps).unwrap();
    assert_eq!(report.evaluated, hyps.len());
    assert_eq!(report.skipped, 0);
    assert_eq!(report.ranking.len(), hyps.len());

    let rec = report.ranking.iter().find(|r| r.hypothesis == truth).unwrap();
    match rec.outcome {
        Outcome::Complete {
            frame_crc, slack_bytes, ..
        } => {
            assert_eq!(frame_crc, grid.checksum());
            assert_eq!(slack_bytes, 0);
        }
        Outcome::Failed(f) => panic!("truth failed: {f}"),
    }
    assert!(rec.score > FAILURE_SCORE);

    let best = report.ranking.best().unwrap();
    assert!(best.outcome.is_complete());
    assert!(best.score >= rec.score);
}

#[test]
fn evaluation_is_deterministic_across_workers_and_runs() {
    let grid = smooth_grid(12, 6, 8);
    let truth: Hypothesis = "scheme=rice:4 pred=med sign=minus seed=frame16 scan=serp".parse().unwrap();
    let stream = encode_frame(&grid, &truth).unwrap();
    let (hyps, _) = rice_space().enumerate(grid.geometry());
    let sample: Vec<Hypothesis> = hyps.iter().step_by(7).copied().collect();

    let a = Search::new(&stream, grid.geometry()).with_workers(1).run(&sample).unwrap();
    let b = Search::new(&stream, grid.geometry()).with_workers(4).run(&sample).unwrap();
    let key = |r: &ScoreRecord| r.hypothesis.to_string();
    let mut ra = a.ranking.into_vec();
    let mut rb = b.ranking.into_vec();
    ra.sort_by_key(key);
    rb.sort_by_key(key);
    assert_eq!(ra, rb);

    let search = Search::new(&stream, grid.geometry());
    let first = evaluate(search.context(), &truth);
    let second = evaluate(search.context(), &truth);
    assert_eq!(first, second);
}

#[test]
fn search_completes_when_every_hypothesis_fails() {
    let stream = vec![0u8; 64];
    let g = Geometry::new(8, 4).unwrap();
    let (hyps, _) = rice_space().enumerate(g);
    let report = Search::new(&stream, g).run(&hyps).unwrap();
    assert_eq!(report.ranking.len(), hyps.len());
    assert_eq!(report.ranking.failed_count(), hyps.len());
    assert!(report.ranking.iter().all(|r| r.score == FAILURE_SCORE && r.metrics.is_none()));
}

#[test]
fn raised_cancel_flag_skips_everything() {
    let stream = vec![0xA5u8; 64];
    let g = Geometry::new(8, 4).unwrap();
    let (hyps, _) = rice_space().enumerate(g);
    let flag = Arc::new(AtomicBool::new(true));
    let report = Search::new(&stream, g).with_cancel(flag).run(&hyps).unwrap();
    assert_eq!(report.skipped, hyps.len());
    assert_eq!(report.evaluated, 0);
    assert!(report.ranking.is_empty());
}

#[test]
fn render_rejects_failed_hypotheses_and_returns_frames() {
    let grid = smooth_grid(8, 4, 2);
    let truth = Hypothesis::default();
    let stream = encode_frame(&grid, &truth).unwrap();
    let search = Search::new(&stream, grid.geometry());
    assert_eq!(search.render(&truth).unwrap(), grid);
    let wrong: Hypothesis = "scheme=rice:4 seed=row16 order=lsb".parse().unwrap();
    if let Ok(frame) = search.render(&wrong) {
        assert_eq!(frame.geometry(), grid.geometry());
    }
}

#[test]
fn preset_sizes_and_axis_shorthands() {
    let g = Geometry::new(256, 64).unwrap();
    assert_eq!(rice_space().size(), 3072);
    assert_eq!(Preset::Lzss.space(g).size(), 48);
    assert_eq!(Preset::Bitplane.space(g).size(), 8);
    assert_eq!(Preset::Tiles.space(g).size(), 180);
    assert_eq!(Preset::Order2.space(g).size(), 36);
    assert_eq!(Preset::Lanes.space(g).size(), 8);
    assert_eq!(Preset::Parity.space(g).size(), 32);

    let (ok, rejected) = Preset::Tiles.space(g).enumerate(g);
    assert_eq!((ok.len(), rejected.len()), (180, 0));

    let small = Geometry::new(64, 16).unwrap();
    let space = Preset::Tiles.space(small);
    let (ok, rejected) = space.enumerate(small);
    assert_eq!(ok.len() + rejected.len(), space.size());
    assert!(!rejected.is_empty());

    assert_eq!(parse_aligns("0-7").unwrap(), (0..8).collect::<Vec<u8>>());
    assert_eq!(parse_aligns("1,3-4").unwrap(), vec![1, 3, 4]);
    assert_eq!(parse_schemes("rice:4-6,lzss,bitplane,expgolomb").unwrap().len(), 3 + 48 + 4 + 1);
    assert!(parse_schemes("huffman").is_err());
    let preds: Vec<irsweep_core::predict::Predictor> = parse_list("left, med ,v2").unwrap();
    assert_eq!(preds.len(), 3);
}
