use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::side::Side;

/// Dimensions of the shared board and the coordinate arithmetic built on them.
///
/// The board is centred on the origin horizontally: columns run from `-W` to
/// `W` inclusive, where `W` is the half-board width. Rows run from
/// `bottom_row` to `bottom_row + H - 1`.
///
/// # Layout
///
/// ```text
///  x: -W  -W+1 ...  wall ...  W-1   W
///     E    .        |         .     E    <- top row (implicit wall)
///     E    .        |         .     E
///     E    .        |         .     E    <- interior rows
///     E    .        |         .     E    <- bottom row (implicit wall)
/// ```
///
/// - `E`: outer edge columns, never playable
/// - `|`: the movable wall column, never playable
///
/// `BoardGeometry` holds no mutable state; the wall column is always passed
/// in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardGeometry {
    half_width: i32,
    height: i32,
    bottom_row: i32,
}

impl BoardGeometry {
    /// Smallest half width that leaves each side at least one playable column.
    pub const MIN_HALF_WIDTH: i32 = 2;
    /// Smallest height that leaves at least one interior row.
    pub const MIN_HEIGHT: i32 = 3;
    /// Largest accepted half width.
    pub const MAX_HALF_WIDTH: i32 = 1024;
    /// Largest accepted height.
    pub const MAX_HEIGHT: i32 = 1024;
    /// Largest accepted distance of the bottom row from row 0.
    pub const MAX_BOTTOM_ROW: i32 = 1 << 20;

    /// # Panics
    ///
    /// Panics if the dimensions are outside
    /// [`Self::MIN_HALF_WIDTH`]..=[`Self::MAX_HALF_WIDTH`] or
    /// [`Self::MIN_HEIGHT`]..=[`Self::MAX_HEIGHT`], or if `bottom_row` is
    /// further than [`Self::MAX_BOTTOM_ROW`] from row 0.
    #[must_use]
    pub const fn new(half_width: i32, height: i32, bottom_row: i32) -> Self {
        assert!(half_width >= Self::MIN_HALF_WIDTH && half_width <= Self::MAX_HALF_WIDTH);
        assert!(height >= Self::MIN_HEIGHT && height <= Self::MAX_HEIGHT);
        assert!(bottom_row >= -Self::MAX_BOTTOM_ROW && bottom_row <= Self::MAX_BOTTOM_ROW);
        Self {
            half_width,
            height,
            bottom_row,
        }
    }

    #[must_use]
    pub const fn half_width(&self) -> i32 {
        self.half_width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub const fn bottom_row(&self) -> i32 {
        self.bottom_row
    }

    #[must_use]
    pub const fn top_row(&self) -> i32 {
        self.bottom_row + self.height - 1
    }

    /// Number of stored columns, outer edges included.
    #[expect(clippy::cast_sign_loss)]
    #[must_use]
    pub const fn storage_width(&self) -> usize {
        (2 * self.half_width + 1) as usize
    }

    #[expect(clippy::cast_sign_loss)]
    #[must_use]
    pub const fn storage_len(&self) -> usize {
        self.storage_width() * self.height as usize
    }

    /// Every stored column, outer edges included.
    #[must_use]
    pub const fn storage_columns(&self) -> Range<i32> {
        -self.half_width..self.half_width + 1
    }

    /// Columns strictly between the two outer edges. The wall lives somewhere
    /// in this range; everything in it takes part in wall shifts.
    #[must_use]
    pub const fn inner_columns(&self) -> Range<i32> {
        -self.half_width + 1..self.half_width
    }

    /// Rows strictly between the bottom and top rows.
    #[must_use]
    pub const fn interior_rows(&self) -> Range<i32> {
        self.bottom_row + 1..self.top_row()
    }

    /// Playable columns of `side` for the given wall position.
    #[must_use]
    pub fn columns_of(&self, side: Side, wall_column: i32) -> Range<i32> {
        let inner = self.inner_columns();
        match side {
            Side::Left => inner.start..wall_column.clamp(inner.start, inner.end),
            Side::Right => (wall_column + 1).clamp(inner.start, inner.end)..inner.end,
        }
    }

    /// Number of playable columns left to `side`.
    #[must_use]
    pub fn width_of(&self, side: Side, wall_column: i32) -> usize {
        self.columns_of(side, wall_column).len()
    }

    /// Maps a board coordinate to its storage index, or `None` outside storage.
    #[must_use]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.storage_columns().contains(&x) || !(self.bottom_row..=self.top_row()).contains(&y)
        {
            return None;
        }
        let col = usize::try_from(x + self.half_width).ok()?;
        let row = usize::try_from(y - self.bottom_row).ok()?;
        Some(row * self.storage_width() + col)
    }

    /// Checks whether a piece cell may sit at `(x, y)`.
    ///
    /// The wall column, the outer edge columns and the top and bottom rows are
    /// all out of bounds.
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32, wall_column: i32) -> bool {
        x != wall_column
            && self.inner_columns().contains(&x)
            && self.interior_rows().contains(&y)
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::new(20, 11, -7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let geometry = BoardGeometry::new(5, 6, 0);
        assert_eq!(geometry.top_row(), 5);
        assert_eq!(geometry.interior_rows(), 1..5);
        assert_eq!(geometry.inner_columns(), -4..5);
        assert_eq!(geometry.storage_columns(), -5..6);
        assert_eq!(geometry.storage_width(), 11);
        assert_eq!(geometry.storage_len(), 66);
    }

    #[test]
    fn test_in_bounds_excludes_wall_and_borders() {
        let geometry = BoardGeometry::new(5, 6, 0);
        assert!(geometry.in_bounds(-1, 1, 0));
        assert!(geometry.in_bounds(4, 4, 0));
        assert!(!geometry.in_bounds(0, 2, 0), "wall column");
        assert!(!geometry.in_bounds(-1, 0, 0), "bottom row");
        assert!(!geometry.in_bounds(-1, 5, 0), "top row");
        assert!(!geometry.in_bounds(-5, 2, 0), "outer edge");
        assert!(!geometry.in_bounds(5, 2, 0), "outer edge");
        assert!(!geometry.in_bounds(9, 2, 0), "outside storage");
        // The wall moved: the old wall column is playable again.
        assert!(geometry.in_bounds(0, 2, 1));
        assert!(!geometry.in_bounds(1, 2, 1));
    }

    #[test]
    fn test_index_covers_storage_exactly() {
        let geometry = BoardGeometry::new(5, 6, -2);
        let mut seen = vec![false; geometry.storage_len()];
        for y in geometry.bottom_row()..=geometry.top_row() {
            for x in geometry.storage_columns() {
                let i = geometry.index(x, y).unwrap();
                assert!(!seen[i], "index {i} used twice");
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(geometry.index(-6, 0), None);
        assert_eq!(geometry.index(0, -3), None);
        assert_eq!(geometry.index(0, 4), None);
    }

    #[test]
    fn test_columns_of_side() {
        let geometry = BoardGeometry::new(5, 6, 0);
        assert_eq!(geometry.columns_of(Side::Left, 0), -4..0);
        assert_eq!(geometry.columns_of(Side::Right, 0), 1..5);
        assert_eq!(geometry.width_of(Side::Left, 2), 6);
        assert_eq!(geometry.width_of(Side::Right, 2), 2);
        assert_eq!(geometry.width_of(Side::Right, 4), 0);
        assert_eq!(geometry.width_of(Side::Right, 5), 0);
        assert_eq!(geometry.width_of(Side::Left, -4), 0);
    }
}
