use serde::{Deserialize, Serialize};

use crate::core::side::Side;

/// Per-side point totals.
///
/// Each cleared column is worth a fixed number of points to the side that
/// cleared it. Scores never decay and have no cap.
///
/// # Example
///
/// ```
/// use splitwall_engine::{ScoreKeeper, Side};
///
/// let mut scores = ScoreKeeper::new(50);
/// scores.award(Side::Left);
/// scores.award(Side::Left);
///
/// assert_eq!(scores.score(Side::Left), 100);
/// assert_eq!(scores.score(Side::Right), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    points_per_column: u64,
    scores: [u64; 2],
}

impl ScoreKeeper {
    #[must_use]
    pub const fn new(points_per_column: u64) -> Self {
        Self {
            points_per_column,
            scores: [0; 2],
        }
    }

    #[must_use]
    pub const fn points_per_column(&self) -> u64 {
        self.points_per_column
    }

    #[must_use]
    pub const fn score(&self, side: Side) -> u64 {
        self.scores[side.index()]
    }

    /// Credits one cleared column to `side`.
    pub const fn award(&mut self, side: Side) {
        self.scores[side.index()] = self.scores[side.index()].saturating_add(self.points_per_column);
    }

    pub const fn reset(&mut self) {
        self.scores = [0; 2];
    }
}
