use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    SeedParseError,
    core::{
        geometry::BoardGeometry,
        piece::{PieceKind, PieceSpec},
        side::Side,
    },
};

/// Source of new pieces.
///
/// The engine asks for exactly one piece per lock event, for the side the
/// locked piece belonged to, plus one per side whenever a match starts. The
/// spawner chooses the kind and the origin; the engine decides whether the
/// placement is legal.
pub trait Spawner {
    fn spawn_next(&mut self, side: Side, geometry: &BoardGeometry) -> PieceSpec;

    /// Kind of the piece the next [`Self::spawn_next`] call for `side` will
    /// return, if the spawner knows it in advance.
    fn next_kind(&self, side: Side) -> Option<PieceKind> {
        let _ = side;
        None
    }
}

/// Origin at which pieces of `side` enter the board: `inset` columns in from
/// that side's outer edge, on the middle interior row.
#[must_use]
pub fn spawn_origin(side: Side, geometry: &BoardGeometry, inset: i32) -> (i32, i32) {
    let rows = geometry.interior_rows();
    let y = rows.start + (rows.end - rows.start - 1) / 2;
    let x = match side {
        Side::Left => -geometry.half_width() + inset,
        Side::Right => geometry.half_width() - inset,
    };
    (x, y)
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the random number generator behind
/// [`RandomSpawner`]. The same seed always produces the same sequence of
/// pieces. Displayed, parsed and serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use splitwall_engine::{PieceSeed, RandomSpawner};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let a = RandomSpawner::with_seed(seed, 3);
/// let b = RandomSpawner::with_seed(seed, 3);
///
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError::Length(s.len()));
        }
        let num = u128::from_str_radix(s, 16).map_err(SeedParseError::Digits)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Spawner that picks every kind with equal probability.
///
/// Both sides draw from the same generator, so the interleaving of lock
/// events decides which side gets which piece. Each side's upcoming kind is
/// drawn one piece ahead and can be previewed with [`Spawner::next_kind`].
///
/// # Example
///
/// ```
/// use splitwall_engine::{BoardGeometry, PieceSeed, RandomSpawner, Side, Spawner as _};
///
/// let geometry = BoardGeometry::default();
/// let mut spawner = RandomSpawner::with_seed(PieceSeed::from_bytes([1; 16]), 3);
///
/// let upcoming = spawner.next_kind(Side::Right);
/// assert_eq!(Some(spawner.spawn_next(Side::Right, &geometry).kind), upcoming);
/// ```
#[derive(Debug, Clone)]
pub struct RandomSpawner {
    rng: Pcg32,
    next: [PieceKind; 2],
    inset: i32,
}

impl RandomSpawner {
    /// Creates a spawner with a random seed.
    #[must_use]
    pub fn new(inset: i32) -> Self {
        Self::with_seed(rand::rng().random(), inset)
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible match.
    #[must_use]
    pub fn with_seed(seed: PieceSeed, inset: i32) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let left = rng.random();
        let right = rng.random();
        Self {
            rng,
            next: [left, right],
            inset,
        }
    }
}

impl Spawner for RandomSpawner {
    fn spawn_next(&mut self, side: Side, geometry: &BoardGeometry) -> PieceSpec {
        let replacement = self.rng.random();
        let kind = std::mem::replace(&mut self.next[side.index()], replacement);
        PieceSpec {
            kind,
            origin: spawn_origin(side, geometry, self.inset),
        }
    }

    fn next_kind(&self, side: Side) -> Option<PieceKind> {
        Some(self.next[side.index()])
    }
}
