use serde::{Deserialize, Serialize};

/// One of the two halves of the board.
///
/// Player 1 plays on the left half and their pieces drift rightwards into
/// the wall; player 2 plays on the right half and their pieces drift
/// leftwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::IsVariant)]
pub enum Side {
    /// Player 1.
    Left,
    /// Player 2.
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Horizontal step a piece on this side takes when it falls.
    #[must_use]
    pub const fn fall_direction(self) -> i32 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Side of the wall column `x` lies on, or `None` for the wall itself.
    #[must_use]
    pub fn of_column(x: i32, wall_column: i32) -> Option<Self> {
        match x.cmp(&wall_column) {
            std::cmp::Ordering::Less => Some(Side::Left),
            std::cmp::Ordering::Greater => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_direction_points_at_wall() {
        assert_eq!(Side::Left.fall_direction(), 1);
        assert_eq!(Side::Right.fall_direction(), -1);
    }

    #[test]
    fn test_of_column() {
        assert_eq!(Side::of_column(-3, 0), Some(Side::Left));
        assert_eq!(Side::of_column(2, 1), Some(Side::Right));
        assert_eq!(Side::of_column(1, 1), None);
    }

    #[test]
    fn test_opponent() {
        for side in Side::ALL {
            assert_ne!(side, side.opponent());
            assert_eq!(side, side.opponent().opponent());
        }
    }
}
