use std::time::Duration;

use arrayvec::ArrayVec;

use crate::{
    PieceCollisionError, SpawnError,
    core::{
        grid::{Cell, Grid},
        piece::{PIECE_CELLS, Piece},
        side::Side,
    },
};

/// Result of a fall attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum FallOutcome {
    /// The piece moved one step towards the wall.
    Moved,
    /// The piece could not move and must be locked.
    Landed,
}

/// The piece a player is currently controlling.
///
/// Every operation follows the same protocol: build the candidate position,
/// validate it against the grid, then either commit it or leave everything
/// untouched. Committing first empties the cells the piece owned and then
/// writes the new ones, so the piece never collides with itself.
///
/// # Example
///
/// ```
/// use splitwall_engine::{
///     BoardGeometry, FallingPiece, Grid, Piece, PieceId, PieceKind, Side,
/// };
///
/// let mut grid = Grid::new(BoardGeometry::new(5, 6, 0));
/// let piece = Piece::new(PieceId(1), PieceKind::T, Side::Left, (-3, 2));
/// let mut falling = FallingPiece::spawn(piece, &mut grid, 0).unwrap();
///
/// assert!(falling.fall(&mut grid, 0).is_moved());
/// assert_eq!(falling.piece().origin(), (-2, 2));
/// assert!(falling.try_move_up(&mut grid, 0).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallingPiece {
    piece: Piece,
    since_last_fall: Duration,
}

impl FallingPiece {
    /// Places a freshly spawned piece on the grid.
    ///
    /// The placement must be valid and every cell must lie on the piece's own
    /// side of the wall. On failure nothing is written.
    pub fn spawn(piece: Piece, grid: &mut Grid, wall_column: i32) -> Result<Self, SpawnError> {
        let cells = piece.cells();
        let on_own_side = cells
            .iter()
            .all(|&(x, _)| Side::of_column(x, wall_column) == Some(piece.side()));
        if !on_own_side || !grid.is_valid_position(cells.iter().copied(), piece.id(), wall_column)
        {
            return Err(SpawnError);
        }
        write_cells(grid, &piece);
        Ok(Self {
            piece,
            since_last_fall: Duration::ZERO,
        })
    }

    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Time accumulated since the last fall attempt.
    #[must_use]
    pub fn since_last_fall(&self) -> Duration {
        self.since_last_fall
    }

    pub fn try_move_up(&mut self, grid: &mut Grid, wall_column: i32) -> Result<(), PieceCollisionError> {
        self.try_commit(self.piece.up(), grid, wall_column)
    }

    pub fn try_move_down(
        &mut self,
        grid: &mut Grid,
        wall_column: i32,
    ) -> Result<(), PieceCollisionError> {
        self.try_commit(self.piece.down(), grid, wall_column)
    }

    /// Rotates according to the piece's rotation capability. Pieces that
    /// cannot rotate accept the request and stay as they are.
    pub fn try_rotate(&mut self, grid: &mut Grid, wall_column: i32) -> Result<(), PieceCollisionError> {
        let rotated = self.piece.rotated();
        if rotated == self.piece {
            return Ok(());
        }
        self.try_commit(rotated, grid, wall_column)
    }

    /// Moves one step towards the wall and restarts the fall timer.
    ///
    /// Returns [`FallOutcome::Landed`] without moving when the step is
    /// blocked; the caller is then expected to [`lock`](Self::lock) the piece.
    pub fn fall(&mut self, grid: &mut Grid, wall_column: i32) -> FallOutcome {
        self.since_last_fall = Duration::ZERO;
        match self.try_commit(self.piece.fallen(), grid, wall_column) {
            Ok(()) => FallOutcome::Moved,
            Err(PieceCollisionError) => FallOutcome::Landed,
        }
    }

    /// Accumulates `elapsed` and reports whether an automatic fall is due,
    /// i.e. whether the time since the last fall now exceeds `fall_interval`.
    pub fn advance(&mut self, elapsed: Duration, fall_interval: Duration) -> bool {
        self.since_last_fall += elapsed;
        self.since_last_fall > fall_interval
    }

    /// Turns the piece's cells into permanent occupancy.
    pub fn lock(self, grid: &mut Grid) -> Piece {
        grid.lock_owned(self.piece.id());
        self.piece
    }

    /// Follows the piece's cells after the grid has been collapsed under it.
    ///
    /// Column shifts move whole columns, so a piece that kept all of its
    /// cells has simply been translated sideways. Fails if cells were pushed
    /// off the board or cleared as part of a full column; the piece then has
    /// to be locked where it stands.
    pub fn realign(&mut self, grid: &Grid) -> Result<(), PieceCollisionError> {
        let mut owned: ArrayVec<(i32, i32), PIECE_CELLS> = ArrayVec::new();
        for position in grid.positions_owned_by(self.piece.id()) {
            owned.try_push(position).map_err(|_| PieceCollisionError)?;
        }
        let expected = self.piece.cells();
        if owned.len() != expected.len() {
            return Err(PieceCollisionError);
        }

        let min_x = |cells: &[(i32, i32)]| cells.iter().map(|&(x, _)| x).min();
        let (Some(actual), Some(current)) = (min_x(owned.as_slice()), min_x(expected.as_slice())) else {
            return Err(PieceCollisionError);
        };
        let moved = self.piece.translated(actual - current, 0);

        let mut moved_cells = moved.cells();
        moved_cells.sort_unstable();
        owned.sort_unstable();
        if moved_cells != owned {
            return Err(PieceCollisionError);
        }
        self.piece = moved;
        Ok(())
    }

    fn try_commit(
        &mut self,
        candidate: Piece,
        grid: &mut Grid,
        wall_column: i32,
    ) -> Result<(), PieceCollisionError> {
        if !grid.is_valid_position(candidate.cells(), candidate.id(), wall_column) {
            return Err(PieceCollisionError);
        }
        grid.clear_owned(self.piece.id());
        write_cells(grid, &candidate);
        self.piece = candidate;
        Ok(())
    }
}

fn write_cells(grid: &mut Grid, piece: &Piece) {
    for (x, y) in piece.cells() {
        grid.set(x, y, Cell::Falling(piece.id()));
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{
        geometry::BoardGeometry,
        grid::PieceId,
        piece::{Orientation, PieceKind},
    };

    use super::*;

    fn grid() -> Grid {
        Grid::new(BoardGeometry::new(5, 6, 0))
    }

    fn spawn(grid: &mut Grid, kind: PieceKind, side: Side, origin: (i32, i32)) -> FallingPiece {
        let piece = Piece::new(PieceId(1), kind, side, origin);
        FallingPiece::spawn(piece, grid, 0).unwrap()
    }

    fn owned(grid: &Grid, id: u64) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = grid.positions_owned_by(PieceId(id)).collect();
        cells.sort_unstable();
        cells
    }

    fn sorted_cells(piece: &Piece) -> Vec<(i32, i32)> {
        let mut cells = piece.cells().to_vec();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_spawn_writes_falling_cells() {
        let mut grid = grid();
        let falling = spawn(&mut grid, PieceKind::O, Side::Left, (-3, 2));
        assert_eq!(owned(&grid, 1), sorted_cells(falling.piece()));
        for (x, y) in falling.piece().cells() {
            assert_eq!(grid.get(x, y), Cell::Falling(PieceId(1)));
        }
    }

    #[test]
    fn test_spawn_rejects_collision_and_wrong_side() {
        let mut grid = grid();
        grid.set(-3, 2, Cell::Locked(PieceId(9)));
        let piece = Piece::new(PieceId(1), PieceKind::O, Side::Left, (-3, 2));
        assert!(FallingPiece::spawn(piece, &mut grid, 0).is_err());
        assert!(owned(&grid, 1).is_empty());

        // Valid cells, but on the opponent's half.
        let piece = Piece::new(PieceId(2), PieceKind::O, Side::Left, (2, 2));
        assert!(FallingPiece::spawn(piece, &mut grid, 0).is_err());
        assert!(owned(&grid, 2).is_empty());
    }

    #[test]
    fn test_commit_is_atomic() {
        let mut grid = grid();
        grid.set(3, 4, Cell::Locked(PieceId(5)));
        let mut falling = spawn(&mut grid, PieceKind::T, Side::Left, (-3, 2));
        let before = sorted_cells(falling.piece());

        falling.try_move_up(&mut grid, 0).unwrap();

        let after = sorted_cells(falling.piece());
        assert_eq!(owned(&grid, 1), after);
        for cell in before.iter().filter(|c| !after.contains(c)) {
            assert_eq!(grid.get(cell.0, cell.1), Cell::Empty);
        }
        assert_eq!(grid.get(3, 4), Cell::Locked(PieceId(5)));
        assert_eq!(owned(&grid, 5), vec![(3, 4)]);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut grid = grid();
        // T at y=3 occupies rows 3 and 4; row 5 is the top wall.
        let mut falling = spawn(&mut grid, PieceKind::T, Side::Left, (-3, 3));
        let grid_before = grid.clone();
        let piece_before = *falling.piece();

        assert!(falling.try_move_up(&mut grid, 0).is_err());

        assert_eq!(grid, grid_before);
        assert_eq!(*falling.piece(), piece_before);
    }

    #[test]
    fn test_rotation_blocked_changes_nothing() {
        let mut grid = grid();
        // Horizontal I at the bottom: the vertical orientation would poke
        // into the bottom wall.
        let mut falling = spawn(&mut grid, PieceKind::I, Side::Left, (-3, 1));
        let grid_before = grid.clone();

        assert!(falling.try_rotate(&mut grid, 0).is_err());

        assert_eq!(grid, grid_before);
        assert_eq!(falling.piece().orientation(), Orientation::SPAWN);
    }

    #[test]
    fn test_restricted_rotation_toggles_on_grid() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::S, Side::Left, (-3, 2));
        falling.try_rotate(&mut grid, 0).unwrap();
        assert_eq!(falling.piece().orientation(), Orientation::QUARTER);
        falling.try_rotate(&mut grid, 0).unwrap();
        assert_eq!(falling.piece().orientation(), Orientation::SPAWN);
        assert_eq!(owned(&grid, 1), sorted_cells(falling.piece()));
    }

    #[test]
    fn test_free_rotation_cycles() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::T, Side::Left, (-3, 2));
        for q in 1..=4 {
            falling.try_rotate(&mut grid, 0).unwrap();
            assert_eq!(falling.piece().orientation(), Orientation::new(q));
            assert_eq!(owned(&grid, 1), sorted_cells(falling.piece()));
        }
    }

    #[test]
    fn test_locked_rotation_is_noop() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::O, Side::Left, (-3, 2));
        let before = grid.clone();
        falling.try_rotate(&mut grid, 0).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_fall_until_wall_then_land() {
        let mut grid = grid();
        // O covers x and x+1; the wall is at 0, so it stops at x = -2.
        let mut falling = spawn(&mut grid, PieceKind::O, Side::Left, (-4, 2));
        assert!(falling.fall(&mut grid, 0).is_moved());
        assert!(falling.fall(&mut grid, 0).is_moved());
        assert_eq!(falling.piece().origin(), (-2, 2));
        assert!(falling.fall(&mut grid, 0).is_landed());
        assert_eq!(falling.piece().origin(), (-2, 2));

        let piece = falling.lock(&mut grid);
        for (x, y) in piece.cells() {
            assert_eq!(grid.get(x, y), Cell::Locked(PieceId(1)));
        }
    }

    #[test]
    fn test_right_side_falls_left() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::O, Side::Right, (3, 2));
        assert!(falling.fall(&mut grid, 0).is_moved());
        assert_eq!(falling.piece().origin(), (2, 2));
        assert!(falling.fall(&mut grid, 0).is_moved());
        assert!(falling.fall(&mut grid, 0).is_landed());
        assert_eq!(falling.piece().origin(), (1, 2));
    }

    #[test]
    fn test_lands_on_locked_cells() {
        let mut grid = grid();
        grid.set(-1, 2, Cell::Locked(PieceId(7)));
        let mut falling = spawn(&mut grid, PieceKind::O, Side::Left, (-4, 2));
        assert!(falling.fall(&mut grid, 0).is_moved());
        assert!(falling.fall(&mut grid, 0).is_landed());
        assert_eq!(falling.piece().origin(), (-3, 2));
    }

    #[test]
    fn test_timer_is_strictly_greater() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::O, Side::Left, (-4, 2));
        let interval = Duration::from_millis(100);
        assert!(!falling.advance(Duration::from_millis(60), interval));
        assert!(!falling.advance(Duration::from_millis(40), interval));
        assert!(falling.advance(Duration::from_millis(1), interval));
        falling.fall(&mut grid, 0);
        assert_eq!(falling.since_last_fall(), Duration::ZERO);
    }

    #[test]
    fn test_realign_follows_shifted_columns() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::T, Side::Right, (2, 2));
        grid.shift_columns(grid.geometry().inner_columns(), 1);

        falling.realign(&grid).unwrap();

        assert_eq!(falling.piece().origin(), (3, 2));
        assert_eq!(owned(&grid, 1), sorted_cells(falling.piece()));
    }

    #[test]
    fn test_realign_fails_when_cells_are_lost() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::O, Side::Right, (3, 2));
        grid.shift_columns(grid.geometry().inner_columns(), 1);
        grid.clear_column(5);

        assert!(falling.realign(&grid).is_err());
    }

    #[test]
    fn test_realign_fails_when_a_column_is_cleared_under_it() {
        let mut grid = grid();
        let mut falling = spawn(&mut grid, PieceKind::O, Side::Right, (2, 2));
        grid.clear_column(2);
        grid.shift_columns(3..5, -1);

        assert!(falling.realign(&grid).is_err());
        assert_eq!(owned(&grid, 1).len(), 2);
    }
}
