use std::time::Duration;

use crate::core::{grid::Grid, side::Side};

/// Owner of the wall column and of the shared fall speed.
///
/// Every cleared column moves the wall one step towards the clearing side's
/// opponent, carrying every other column with it, and makes pieces fall
/// faster for both players.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderTracker {
    wall_column: i32,
    fall_interval: Duration,
    initial_fall_interval: Duration,
    min_fall_interval: Duration,
    speed_factor: f64,
}

impl BorderTracker {
    /// Column the wall starts on.
    pub const ORIGIN: i32 = 0;

    #[must_use]
    pub const fn new(
        initial_fall_interval: Duration,
        min_fall_interval: Duration,
        speed_factor: f64,
    ) -> Self {
        Self {
            wall_column: Self::ORIGIN,
            fall_interval: initial_fall_interval,
            initial_fall_interval,
            min_fall_interval,
            speed_factor,
        }
    }

    #[must_use]
    pub const fn wall_column(&self) -> i32 {
        self.wall_column
    }

    /// Current time between automatic falls.
    #[must_use]
    pub const fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    #[must_use]
    pub const fn min_fall_interval(&self) -> Duration {
        self.min_fall_interval
    }

    /// Whether a shift in `direction` still leaves the side it squeezes
    /// with at least one column.
    #[must_use]
    pub fn can_shift(&self, grid: &Grid, direction: i32) -> bool {
        let squeezed = if direction > 0 { Side::Right } else { Side::Left };
        grid.geometry().width_of(squeezed, self.wall_column) > 0
    }

    /// Moves the wall and every inner column one step in `direction` and
    /// speeds the game up.
    ///
    /// The column pushed onto the outer edge is discarded. The clearing side
    /// gains a column and its opponent loses one.
    pub fn shift(&mut self, grid: &mut Grid, direction: i32) {
        let direction = direction.signum();
        let geometry = *grid.geometry();
        grid.shift_columns(geometry.inner_columns(), direction);
        let edge = if direction > 0 {
            geometry.half_width()
        } else {
            -geometry.half_width()
        };
        grid.clear_column(edge);
        self.wall_column += direction;
        self.speed_up();
    }

    fn speed_up(&mut self) {
        self.fall_interval = self
            .fall_interval
            .mul_f64(self.speed_factor)
            .max(self.min_fall_interval);
    }

    pub fn reset(&mut self) {
        self.wall_column = Self::ORIGIN;
        self.fall_interval = self.initial_fall_interval;
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{geometry::BoardGeometry, grid::{Cell, PieceId}};

    use super::*;

    fn tracker() -> BorderTracker {
        BorderTracker::new(Duration::from_millis(750), Duration::from_millis(250), 0.9)
    }

    #[test]
    fn test_shift_right_moves_everything() {
        let mut grid = Grid::new(BoardGeometry::new(5, 6, 0));
        let mut border = tracker();
        grid.set(-4, 1, Cell::Locked(PieceId(1)));
        grid.set(-1, 2, Cell::Locked(PieceId(2)));
        grid.set(1, 3, Cell::Locked(PieceId(3)));
        grid.set(4, 4, Cell::Locked(PieceId(4)));

        border.shift(&mut grid, 1);

        assert_eq!(border.wall_column(), 1);
        assert_eq!(grid.get(-3, 1), Cell::Locked(PieceId(1)));
        assert_eq!(grid.get(0, 2), Cell::Locked(PieceId(2)));
        assert_eq!(grid.get(2, 3), Cell::Locked(PieceId(3)));
        // Pushed onto the outer edge and discarded.
        assert_eq!(grid.get(5, 4), Cell::Empty);
        assert_eq!(grid.positions_owned_by(PieceId(4)).count(), 0);
        assert_eq!(grid.get(1, 3), Cell::Empty, "new wall column is empty");
    }

    #[test]
    fn test_shift_left() {
        let mut grid = Grid::new(BoardGeometry::new(5, 6, 0));
        let mut border = tracker();
        grid.set(2, 1, Cell::Locked(PieceId(1)));
        grid.set(-4, 1, Cell::Locked(PieceId(2)));

        border.shift(&mut grid, -1);

        assert_eq!(border.wall_column(), -1);
        assert_eq!(grid.get(1, 1), Cell::Locked(PieceId(1)));
        assert_eq!(grid.positions_owned_by(PieceId(2)).count(), 0);
    }

    #[test]
    fn test_speed_scales_and_floors() {
        let mut grid = Grid::new(BoardGeometry::new(20, 11, -7));
        let mut border = tracker();
        border.shift(&mut grid, 1);
        assert_eq!(
            border.fall_interval(),
            Duration::from_millis(750).mul_f64(0.9)
        );
        for _ in 0..30 {
            let direction = if border.wall_column() > 0 { -1 } else { 1 };
            border.shift(&mut grid, direction);
            assert!(border.fall_interval() >= border.min_fall_interval());
        }
        assert_eq!(border.fall_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_can_shift_until_opponent_is_gone() {
        let mut grid = Grid::new(BoardGeometry::new(3, 4, 0));
        let mut border = tracker();
        assert!(border.can_shift(&grid, 1));
        border.shift(&mut grid, 1);
        assert!(border.can_shift(&grid, 1));
        border.shift(&mut grid, 1);
        assert_eq!(border.wall_column(), 2);
        assert!(!border.can_shift(&grid, 1));
        assert!(border.can_shift(&grid, -1));
    }

    #[test]
    fn test_reset() {
        let mut grid = Grid::new(BoardGeometry::new(5, 6, 0));
        let mut border = tracker();
        border.shift(&mut grid, -1);
        border.reset();
        assert_eq!(border.wall_column(), BorderTracker::ORIGIN);
        assert_eq!(border.fall_interval(), Duration::from_millis(750));
    }
}
