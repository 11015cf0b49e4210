use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::side::Side;

use super::column_clear::ClearReport;

/// Running statistics of a match.
///
/// Tracks, per side, how many pieces have locked and how many columns have
/// been cleared, together with the longest cascade produced by a single lock
/// and the total simulated time.
///
/// # Example
///
/// ```
/// use splitwall_engine::{MatchStats, Side};
///
/// let stats = MatchStats::new();
/// assert_eq!(stats.pieces_locked(Side::Left), 0);
/// assert_eq!(stats.longest_cascade(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pieces_locked: [usize; 2],
    columns_cleared: [usize; 2],
    longest_cascade: usize,
    #[serde(with = "super::serde_duration", rename = "elapsed_ms")]
    elapsed: Duration,
}

impl MatchStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pieces_locked: [0; 2],
            columns_cleared: [0; 2],
            longest_cascade: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn pieces_locked(&self, side: Side) -> usize {
        self.pieces_locked[side.index()]
    }

    #[must_use]
    pub const fn columns_cleared(&self, side: Side) -> usize {
        self.columns_cleared[side.index()]
    }

    /// Most columns cleared (both sides together) by one lock event.
    #[must_use]
    pub const fn longest_cascade(&self) -> usize {
        self.longest_cascade
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Records a piece of `side` locking and the clears it caused.
    pub fn complete_lock(&mut self, side: Side, report: &ClearReport) {
        self.pieces_locked[side.index()] += 1;
        for s in Side::ALL {
            self.columns_cleared[s.index()] += report.cleared(s);
        }
        self.longest_cascade = self.longest_cascade.max(report.total());
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.elapsed += elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lock_without_clears() {
        let mut stats = MatchStats::new();
        stats.complete_lock(Side::Right, &ClearReport::default());
        assert_eq!(stats.pieces_locked(Side::Right), 1);
        assert_eq!(stats.pieces_locked(Side::Left), 0);
        assert_eq!(stats.columns_cleared(Side::Right), 0);
        assert_eq!(stats.longest_cascade(), 0);
    }

    #[test]
    fn test_serializes_elapsed_as_millis() {
        let mut stats = MatchStats::new();
        stats.advance(Duration::from_millis(1500));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["elapsed_ms"], 1500);
        assert_eq!(json["pieces_locked"], serde_json::json!([0, 0]));
    }
}
