//! Match rules and state management.
//!
//! This module drives the data structures of [`core`](crate::core) to play a
//! match:
//!
//! - [`FallingPiece`] - The piece a player controls, with its fall timer
//! - [`scan_and_collapse`] - Column clearing and board collapse
//! - [`BorderTracker`] - Wall position and fall speed
//! - [`ScoreKeeper`] - Per-side scores
//! - [`Spawner`] / [`RandomSpawner`] - Source of new pieces
//! - [`MatchSession`] - A whole match, driven by [`MatchSession::tick`]
//! - [`MatchStats`] - Lock and clear counters
//!
//! # Match Flow
//!
//! 1. Build a [`MatchSession`] from a [`MatchConfig`] and a spawner; one piece
//!    spawns on each side
//! 2. Every frame, call [`MatchSession::tick`] with the elapsed time and the
//!    players' [`Intent`]s
//! 3. Pieces drift towards the wall and lock when they cannot move further
//! 4. Full columns are cleared, the wall moves towards the opponent and the
//!    game speeds up
//! 5. Repeat until a side cannot spawn its next piece
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use splitwall_engine::{Intent, MatchConfig, MatchSession, RandomSpawner, Side};
//!
//! let config = MatchConfig::default();
//! let spawner = RandomSpawner::new(config.spawn_inset);
//! let mut session = MatchSession::new(config, spawner).unwrap();
//!
//! for _ in 0..600 {
//!     let intents = [(Side::Left, Intent::FastFall), (Side::Right, Intent::Rotate)];
//!     session.tick(Duration::from_millis(16), &intents);
//!     if session.is_over() {
//!         println!("{:?} wins", session.winner());
//!         break;
//!     }
//! }
//! ```

pub use self::{
    active_piece::*, border::*, column_clear::*, config::*, match_session::*, match_stats::*,
    score::*, spawner::*,
};

mod active_piece;
mod border;
mod column_clear;
mod config;
mod match_session;
mod match_stats;
mod score;
mod serde_duration;
mod spawner;
