// crates/irsweep-core/src/search/mod.rs
//
// SearchCoordinator.
//
// - The hypothesis slice is the work queue; a rayon pool drains it.
// - Workers share one read-only EvalContext by reference. Each evaluation
//   owns its cursor, grid and symbol source, so there is nothing to lock.
// - A failed hypothesis becomes a record at FAILURE_SCORE. Only pool
//   construction can fail a search.
// - Raising the cancel flag skips hypotheses that have not started yet.

pub mod rank;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{Result, SweepError};
use crate::frame::{Geometry, SampleGrid};
use crate::hypothesis::Hypothesis;
use crate::reconstruct::{reconstruct, EvalLimits};
use crate::score::{score_decoded, ScoreWeights, FAILURE_SCORE};

pub use rank::{Outcome, Ranking, ScoreRecord};

/// Everything a worker needs, borrowed for the lifetime of the search.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    pub stream: &'a [u8],
    pub geometry: Geometry,
    pub limits: EvalLimits,
    pub weights: ScoreWeights,
}

/// Decode and score one hypothesis.
pub fn evaluate(ctx: &EvalContext<'_>, h: &Hypothesis) -> ScoreRecord {
    match reconstruct(ctx.stream, ctx.geometry, h, &ctx.limits) {
        Ok(decoded) => {
            let (score, metrics) = score_decoded(&decoded, &ctx.weights);
            ScoreRecord {
                hypothesis: *h,
                score,
                metrics: Some(metrics),
                outcome: Outcome::Complete {
                    bits_consumed: decoded.bits_consumed(),
                    slack_bytes: decoded.slack_bytes(),
                    frame_crc: decoded.grid.checksum(),
                },
            }
        }
        Err(failure) => ScoreRecord {
            hypothesis: *h,
            score: FAILURE_SCORE,
            metrics: None,
            outcome: Outcome::Failed(failure),
        },
    }
}

#[derive(Clone, Debug)]
pub struct SearchReport {
    pub ranking: Ranking,
    pub evaluated: usize,
    pub skipped: usize,
    pub elapsed: Duration,
    pub workers: usize,
}

pub struct Search<'a> {
    ctx: EvalContext<'a>,
    workers: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Search<'a> {
    pub fn new(stream: &'a [u8], geometry: Geometry) -> Self {
        Self {
            ctx: EvalContext {
                stream,
                geometry,
                limits: EvalLimits::default(),
                weights: ScoreWeights::default(),
            },
            workers: 0,
            cancel: None,
        }
    }

    /// Requested pool size; 0 means every available core.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_limits(mut self, limits: EvalLimits) -> Self {
        self.ctx.limits = limits;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.ctx.weights = weights;
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn context(&self) -> &EvalContext<'a> {
        &self.ctx
    }

    fn pool_size(&self) -> usize {
        let available = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        if self.workers == 0 {
            available
        } else {
            self.workers.min(available)
        }
    }

    pub fn run(&self, hypotheses: &[Hypothesis]) -> Result<SearchReport> {
        let workers = self.pool_size();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("irsweep-{}", i))
            .build()
            .map_err(|e| SweepError::InvalidConfig(format!("worker pool: {}", e)))?;

        info!(
            "search start: hypotheses={} workers={} geometry={} stream_bytes={}",
            hypotheses.len(),
            workers,
            self.ctx.geometry,
            self.ctx.stream.len()
        );

        let t0 = Instant::now();
        let skipped = AtomicUsize::new(0);
        let ctx = &self.ctx;
        let cancel = self.cancel.as_deref();

        let records: Vec<ScoreRecord> = pool.install(|| {
            hypotheses
                .par_iter()
                .filter_map(|h| {
                    if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                        skipped.fetch_add(1, Ordering::Relaxed);
                        return None;
                    }
                    let rec = evaluate(ctx, h);
                    debug!("{} score={:.3} outcome={:?}", h, rec.score, rec.outcome);
                    Some(rec)
                })
                .collect()
        });

        let skipped = skipped.into_inner();
        if skipped > 0 {
            warn!("search cancelled: skipped {} of {} hypotheses", skipped, hypotheses.len());
        }

        let evaluated = records.len();
        let ranking = Ranking::from_records(records);
        let elapsed = t0.elapsed();
        info!(
            "search done: evaluated={} failed={} elapsed={:.3}s",
            evaluated,
            ranking.failed_count(),
            elapsed.as_secs_f64()
        );

        Ok(SearchReport {
            ranking,
            evaluated,
            skipped,
            elapsed,
            workers,
        })
    }

    /// Re-decode one hypothesis for rendering.
    pub fn render(&self, h: &Hypothesis) -> Result<SampleGrid> {
        let decoded = reconstruct(self.ctx.stream, self.ctx.geometry, h, &self.ctx.limits)?;
        decoded.grid.ensure_geometry(self.ctx.geometry)?;
        Ok(decoded.grid)
    }
}
