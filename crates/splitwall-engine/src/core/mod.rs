pub use self::{geometry::*, grid::*, piece::*, side::*};

pub(crate) mod geometry;
pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod side;
