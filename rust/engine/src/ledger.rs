//! Cumulative score shared by every game.
//!
//! [`ScoreLedger::apply_delta`] is the only way to change the total. Each call
//! appends one [`ScoreRecord`], so the history doubles as an audit trail of
//! which game moved the score and whether a floor clamped the move.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rounds a fractional score to the nearest integer, halves toward +∞.
///
/// `-5.5` becomes `-5` and `4.5` becomes `5`.
pub fn round_score(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Game that produced a score delta.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Texas,
    Wheel,
    Fortune,
    Gomoku,
    Jackpot,
}

/// One applied delta.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Monotonic sequence number, starting at 1
    pub id: u64,
    pub source: ScoreSource,
    /// Delta requested by the game
    pub base_gain: i64,
    /// Delta actually applied after floor clamping
    pub applied_gain: i64,
    /// Total after this record
    pub total: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ScoreLedger {
    total: i64,
    history: VecDeque<ScoreRecord>,
    capacity: usize,
    next_id: u64,
}

impl ScoreLedger {
    pub fn new(initial_total: i64, capacity: usize) -> Self {
        Self {
            total: initial_total,
            history: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Most recent first.
    pub fn history(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.history.iter()
    }

    pub fn latest(&self) -> Option<&ScoreRecord> {
        self.history.front()
    }

    /// Applies `base_gain`, clamping the new total at `floor` when given.
    /// Returns the delta that was actually applied.
    pub fn apply_delta(
        &mut self,
        base_gain: i64,
        source: ScoreSource,
        floor: Option<i64>,
        now: DateTime<Utc>,
    ) -> i64 {
        let previous = self.total;
        let candidate = previous.saturating_add(base_gain);
        let next = match floor {
            Some(f) => candidate.max(f),
            None => candidate,
        };
        let applied_gain = next - previous;
        self.total = next;

        let record = ScoreRecord {
            id: self.next_id,
            source,
            base_gain,
            applied_gain,
            total: next,
            timestamp: now,
        };
        self.next_id += 1;
        self.history.push_front(record);
        self.history.truncate(self.capacity);

        tracing::info!(
            source = ?source,
            base_gain,
            applied_gain,
            total = next,
            "score applied"
        );
        applied_gain
    }
}
