// crates/irsweep-core/src/search/rank.rs

use crate::error::DecodeFailure;
use crate::hypothesis::Hypothesis;
use crate::score::Metrics;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Complete {
        bits_consumed: u64,
        slack_bytes: usize,
        /// CRC-32 of the reconstructed frame.
        frame_crc: u32,
    },
    Failed(DecodeFailure),
}

impl Outcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete { .. })
    }
}

/// Result of evaluating one hypothesis. Failed records carry no metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRecord {
    pub hypothesis: Hypothesis,
    pub score: f64,
    pub metrics: Option<Metrics>,
    pub outcome: Outcome,
}

/// Records sorted by descending score. Ties keep no particular order.
#[derive(Clone, Debug, Default)]
pub struct Ranking {
    records: Vec<ScoreRecord>,
}

impl Ranking {
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        records.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));
        Self { records }
    }

    /// First `n` records (all of them when fewer exist).
    pub fn top(&self, n: usize) -> &[ScoreRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn best(&self) -> Option<&ScoreRecord> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| !r.outcome.is_complete()).count()
    }

    pub fn into_vec(self) -> Vec<ScoreRecord> {
        self.records
    }
}
