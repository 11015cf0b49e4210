use serde::{Deserialize, Serialize};

use super::geometry::BoardGeometry;

/// Identity of a spawned piece. Unique for the lifetime of a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, derive_more::Display,
)]
#[display("#{_0}")]
pub struct PieceId(pub u64);

/// A single cell of the shared grid.
///
/// Every non-empty cell records the piece that owns it. A cell is `Falling`
/// while its piece is still being controlled and becomes `Locked` once the
/// piece has landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    Falling(PieceId),
    Locked(PieceId),
}

impl Cell {
    #[must_use]
    pub fn owner(self) -> Option<PieceId> {
        match self {
            Cell::Empty => None,
            Cell::Falling(id) | Cell::Locked(id) => Some(id),
        }
    }

    const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Falling(_) => '@',
            Cell::Locked(_) => '#',
        }
    }
}

/// Cell occupancy of the whole board.
///
/// `Grid` is pure storage: it knows its [`BoardGeometry`] so that it can map
/// coordinates, but it never consults the wall. All accessors are
/// bounds-aware and treat coordinates outside storage as empty and
/// unwritable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    geometry: BoardGeometry,
    cells: Vec<Cell>,
}

impl Grid {
    #[must_use]
    pub fn new(geometry: BoardGeometry) -> Self {
        Self {
            geometry,
            cells: vec![Cell::Empty; geometry.storage_len()],
        }
    }

    #[must_use]
    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Returns the cell at `(x, y)`; coordinates outside storage read as empty.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.geometry
            .index(x, y)
            .map_or(Cell::Empty, |i| self.cells[i])
    }

    /// Writes a cell. Returns `false` if `(x, y)` is outside storage.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.geometry.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// True iff the cell is non-empty and owned by a piece other than `id`.
    #[must_use]
    pub fn is_occupied_by_other(&self, x: i32, y: i32, id: PieceId) -> bool {
        self.get(x, y).owner().is_some_and(|owner| owner != id)
    }

    /// Checks that every cell is in bounds and free of other pieces.
    pub fn is_valid_position<I>(&self, cells: I, id: PieceId, wall_column: i32) -> bool
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        cells.into_iter().all(|(x, y)| {
            self.geometry.in_bounds(x, y, wall_column) && !self.is_occupied_by_other(x, y, id)
        })
    }

    /// Empties every cell owned by `id`.
    pub fn clear_owned(&mut self, id: PieceId) {
        for cell in &mut self.cells {
            if cell.owner() == Some(id) {
                *cell = Cell::Empty;
            }
        }
    }

    /// Turns every `Falling` cell of `id` into a `Locked` one.
    pub fn lock_owned(&mut self, id: PieceId) {
        for cell in &mut self.cells {
            if *cell == Cell::Falling(id) {
                *cell = Cell::Locked(id);
            }
        }
    }

    /// Positions of every cell owned by `id`.
    pub fn positions_owned_by(&self, id: PieceId) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.positions()
            .filter(move |&(x, y)| self.get(x, y).owner() == Some(id))
    }

    /// Checks whether every interior row of column `x` is occupied, by a
    /// locked or a falling cell.
    #[must_use]
    pub fn is_column_full(&self, x: i32) -> bool {
        self.geometry
            .interior_rows()
            .all(|y| !self.get(x, y).is_empty())
    }

    /// Empties every row of column `x`.
    pub fn clear_column(&mut self, x: i32) {
        for y in self.geometry.bottom_row()..=self.geometry.top_row() {
            self.set(x, y, Cell::Empty);
        }
    }

    /// Moves column `from` onto column `to`, overwriting `to` and leaving
    /// `from` empty.
    pub fn move_column(&mut self, from: i32, to: i32) {
        for y in self.geometry.bottom_row()..=self.geometry.top_row() {
            let cell = self.get(from, y);
            self.set(to, y, cell);
            self.set(from, y, Cell::Empty);
        }
    }

    /// Moves each column of `columns` one step in `direction` (+1 right,
    /// -1 left).
    ///
    /// Columns are visited from the leading end so that no column is
    /// overwritten before it has itself been moved.
    pub fn shift_columns(&mut self, columns: std::ops::Range<i32>, direction: i32) {
        if direction > 0 {
            for x in columns.rev() {
                self.move_column(x, x + 1);
            }
        } else {
            for x in columns {
                self.move_column(x, x - 1);
            }
        }
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Iterates over every stored coordinate, bottom row first.
    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let columns = self.geometry.storage_columns();
        (self.geometry.bottom_row()..=self.geometry.top_row())
            .flat_map(move |y| columns.clone().map(move |x| (x, y)))
    }

    /// Renders the grid as text, top row first.
    ///
    /// `.` is empty, `@` a falling cell, `#` a locked cell and `|` the wall.
    #[must_use]
    pub fn render_rows(&self, wall_column: i32) -> Vec<String> {
        (self.geometry.bottom_row()..=self.geometry.top_row())
            .rev()
            .map(|y| {
                let mut row = String::with_capacity(self.geometry.storage_width());
                for x in self.geometry.storage_columns() {
                    let c = if x == wall_column {
                        '|'
                    } else {
                        self.get(x, y).as_char()
                    };
                    row.push(c);
                }
                row
            })
            .collect()
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "..#..,.@@..,..." (rows top to bottom, comma separated)
        serializer.serialize_str(&self.render_rows(i32::MIN).join(","))
    }
}
