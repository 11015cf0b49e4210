pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or another piece")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("spawned piece collides or lies outside its half")]
pub struct SpawnError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("half width must be at least 2, got {_0}")]
    HalfWidthTooSmall(#[error(not(source))] i32),
    #[display("height must be at least 3, got {_0}")]
    HeightTooSmall(#[error(not(source))] i32),
    #[display("half width must be at most 1024, got {_0}")]
    HalfWidthTooLarge(#[error(not(source))] i32),
    #[display("height must be at most 1024, got {_0}")]
    HeightTooLarge(#[error(not(source))] i32),
    #[display("bottom row must be within 1048576 of row 0, got {_0}")]
    BottomRowOutOfRange(#[error(not(source))] i32),
    #[display("minimum fall interval must be positive and not above the initial interval")]
    InvalidFallInterval,
    #[display("speed factor must be in (0, 1], got {_0}")]
    InvalidSpeedFactor(#[error(not(source))] f64),
    #[display("spawn inset must be between 1 and half width - 1, got {_0}")]
    InvalidSpawnInset(#[error(not(source))] i32),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    Length(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    Digits(std::num::ParseIntError),
}
