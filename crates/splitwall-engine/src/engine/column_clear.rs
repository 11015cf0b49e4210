use crate::core::{grid::Grid, side::Side};

use super::{border::BorderTracker, score::ScoreKeeper};

/// Columns cleared by one [`scan_and_collapse`] call, per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    cleared: [usize; 2],
}

impl ClearReport {
    #[must_use]
    pub const fn cleared(&self, side: Side) -> usize {
        self.cleared[side.index()]
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.cleared[0] + self.cleared[1]
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }

    const fn record(&mut self, side: Side) {
        self.cleared[side.index()] += 1;
    }
}

/// Clears every full column on both halves and collapses the board.
///
/// The left half is scanned first, walking outwards from the wall, then the
/// right half. A column is full when each of its interior rows is occupied.
/// Cells of a piece that is still falling count too; such a piece loses the
/// cleared cells and has to be realigned by the caller (see
/// [`FallingPiece::realign`](crate::FallingPiece::realign)).
///
/// For each full column:
///
/// 1. The column is emptied.
/// 2. The columns between it and the outer edge slide one step towards the
///    wall, closing the gap.
/// 3. The wall and every inner column move one step towards the opponent
///    (see [`BorderTracker::shift`]), and the game speeds up.
/// 4. The clearing side is awarded a column.
///
/// The scan then looks again at the same distance from the wall, where the
/// neighbour of the cleared column now sits, so stacked full columns cascade
/// within a single call. A side stops clearing once its opponent has no
/// columns left.
///
/// # Example
///
/// ```
/// use splitwall_engine::{
///     BoardGeometry, BorderTracker, Cell, Grid, PieceId, ScoreKeeper, Side, scan_and_collapse,
/// };
/// use std::time::Duration;
///
/// let mut grid = Grid::new(BoardGeometry::new(5, 6, 0));
/// let mut border = BorderTracker::new(Duration::from_millis(750), Duration::from_millis(250), 0.9);
/// let mut scores = ScoreKeeper::new(50);
/// for y in grid.geometry().interior_rows() {
///     grid.set(-1, y, Cell::Locked(PieceId(1)));
/// }
///
/// let report = scan_and_collapse(&mut grid, &mut border, &mut scores);
///
/// assert_eq!(report.cleared(Side::Left), 1);
/// assert_eq!(border.wall_column(), 1);
/// assert_eq!(scores.score(Side::Left), 50);
/// assert!(grid.is_empty());
/// ```
pub fn scan_and_collapse(
    grid: &mut Grid,
    border: &mut BorderTracker,
    scores: &mut ScoreKeeper,
) -> ClearReport {
    let mut report = ClearReport::default();
    for side in Side::ALL {
        collapse_side(side, grid, border, scores, &mut report);
    }
    report
}

fn collapse_side(
    side: Side,
    grid: &mut Grid,
    border: &mut BorderTracker,
    scores: &mut ScoreKeeper,
    report: &mut ClearReport,
) {
    // Pieces on this side fall towards the wall, and the wall moves away
    // from this side on every clear: both go the same way.
    let direction = side.fall_direction();
    let inner = grid.geometry().inner_columns();

    let mut distance = 1;
    loop {
        let x = border.wall_column() - direction * distance;
        if !inner.contains(&x) {
            break;
        }
        if !grid.is_column_full(x) {
            distance += 1;
            continue;
        }
        if !border.can_shift(grid, direction) {
            break;
        }

        grid.clear_column(x);
        let outer = match side {
            Side::Left => inner.start..x,
            Side::Right => x + 1..inner.end,
        };
        grid.shift_columns(outer, direction);
        border.shift(grid, direction);
        scores.award(side);
        report.record(side);
    }
}
