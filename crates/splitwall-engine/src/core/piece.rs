use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{grid::PieceId, side::Side};

/// Number of cells in every piece.
pub const PIECE_CELLS: usize = 4;

/// How a piece kind reacts to a rotate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum RotationCapability {
    /// Cycles through all four orientations.
    Free,
    /// Toggles between the 0° and 90° orientations.
    Restricted,
    /// Never rotates.
    Locked,
}

/// Orientation of a piece, in quarter turns counter-clockwise from spawn.
///
/// - `0`: 0° (spawn orientation)
/// - `1`: 90°
/// - `2`: 180°
/// - `3`: 270°
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Orientation(u8);

impl Orientation {
    pub const SPAWN: Self = Self(0);
    pub const QUARTER: Self = Self(1);

    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    /// Next orientation for the given capability.
    #[must_use]
    pub const fn rotated(self, capability: RotationCapability) -> Self {
        match capability {
            RotationCapability::Free => Self((self.0 + 1) % 4),
            RotationCapability::Restricted => {
                if self.0 == 0 {
                    Self::QUARTER
                } else {
                    Self::SPAWN
                }
            }
            RotationCapability::Locked => self,
        }
    }

    const fn as_usize(self) -> usize {
        (self.0 % 4) as usize
    }
}

/// Kind of a piece (tetromino).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::S,
            3 => PieceKind::Z,
            4 => PieceKind::J,
            5 => PieceKind::L,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// O never rotates; I, S and Z only have two distinct orientations.
    #[must_use]
    pub const fn rotation_capability(self) -> RotationCapability {
        match self {
            PieceKind::O => RotationCapability::Locked,
            PieceKind::I | PieceKind::S | PieceKind::Z => RotationCapability::Restricted,
            PieceKind::J | PieceKind::L | PieceKind::T => RotationCapability::Free,
        }
    }

    /// Cell offsets from the piece origin for the given orientation.
    #[must_use]
    pub const fn offsets(self, orientation: Orientation) -> &'static [(i32, i32); PIECE_CELLS] {
        &PIECE_OFFSETS[self as usize][orientation.as_usize()]
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }
}

type Offsets = [(i32, i32); PIECE_CELLS];

/// Generates all 4 orientations by rotating 90° counter-clockwise about the
/// origin: `(x, y) -> (-y, x)`.
const fn offset_rotations(base: Offsets) -> [Offsets; 4] {
    let mut rotations = [base; 4];
    let mut i = 1;
    while i < 4 {
        let mut j = 0;
        while j < PIECE_CELLS {
            let (x, y) = rotations[i - 1][j];
            rotations[i][j] = (-y, x);
            j += 1;
        }
        i += 1;
    }
    rotations
}

// y grows upwards; the origin cell (0, 0) is the pivot.
const PIECE_OFFSETS: [[Offsets; 4]; PieceKind::LEN] = [
    // I-piece
    offset_rotations([(-1, 0), (0, 0), (1, 0), (2, 0)]),
    // O-piece
    offset_rotations([(0, 0), (1, 0), (0, 1), (1, 1)]),
    // S-piece
    offset_rotations([(-1, 0), (0, 0), (0, 1), (1, 1)]),
    // Z-piece
    offset_rotations([(-1, 1), (0, 1), (0, 0), (1, 0)]),
    // J-piece
    offset_rotations([(-1, 1), (-1, 0), (0, 0), (1, 0)]),
    // L-piece
    offset_rotations([(1, 1), (-1, 0), (0, 0), (1, 0)]),
    // T-piece
    offset_rotations([(0, 1), (-1, 0), (0, 0), (1, 0)]),
];

/// What a spawner hands to the engine: a kind and where to put it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PieceSpec {
    pub kind: PieceKind,
    pub origin: (i32, i32),
}

/// A piece at a specific position and orientation.
///
/// Pieces are immutable values: moving or rotating returns a new `Piece`,
/// which the caller validates against the grid before committing it.
///
/// # Example
///
/// ```
/// use splitwall_engine::{Piece, PieceId, PieceKind, Side};
///
/// let piece = Piece::new(PieceId(1), PieceKind::T, Side::Left, (-3, 2));
/// let fallen = piece.fallen();
/// assert_eq!(fallen.origin(), (-2, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    side: Side,
    origin: (i32, i32),
    orientation: Orientation,
}

impl Piece {
    #[must_use]
    pub const fn new(id: PieceId, kind: PieceKind, side: Side, origin: (i32, i32)) -> Self {
        Self {
            id,
            kind,
            side,
            origin,
            orientation: Orientation::SPAWN,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn origin(&self) -> (i32, i32) {
        self.origin
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub const fn fall_direction(&self) -> i32 {
        self.side.fall_direction()
    }

    /// Absolute positions of the piece's cells.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i32, i32), PIECE_CELLS> {
        let (ox, oy) = self.origin;
        self.kind
            .offsets(self.orientation)
            .iter()
            .map(|&(dx, dy)| (ox + dx, oy + dy))
            .collect()
    }

    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            origin: (self.origin.0 + dx, self.origin.1 + dy),
            ..*self
        }
    }

    #[must_use]
    pub const fn up(&self) -> Self {
        self.translated(0, 1)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.translated(0, -1)
    }

    /// One step towards the wall.
    #[must_use]
    pub const fn fallen(&self) -> Self {
        self.translated(self.fall_direction(), 0)
    }

    /// The next orientation, or `self` unchanged for pieces that cannot rotate.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            orientation: self.orientation.rotated(self.kind.rotation_capability()),
            ..*self
        }
    }
}
