use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{
        grid::{Grid, PieceId},
        piece::{Piece, PieceKind},
        side::Side,
    },
};

use super::{
    active_piece::FallingPiece,
    border::BorderTracker,
    column_clear::{ClearReport, scan_and_collapse},
    config::MatchConfig,
    match_stats::MatchStats,
    score::ScoreKeeper,
    spawner::Spawner,
};

/// A player's request for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Intent {
    MoveUp,
    MoveDown,
    Rotate,
    /// Fall one step now instead of waiting for the timer.
    FastFall,
}

impl Intent {
    pub const ALL: [Intent; 4] = [
        Intent::MoveUp,
        Intent::MoveDown,
        Intent::Rotate,
        Intent::FastFall,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver { winner: Side },
}

/// What happened when a piece locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOutcome {
    /// Side the locked piece belonged to.
    pub side: Side,
    /// The piece at the position it locked in.
    pub piece: Piece,
    /// Columns cleared as a consequence.
    pub clears: ClearReport,
    /// Replacement piece, or `None` if it could not be placed and the match
    /// is over.
    pub next: Option<Piece>,
}

/// Serializable view of a match for presentation and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Grid rows, top first, as rendered by [`Grid::render_rows`].
    pub rows: Vec<String>,
    pub wall_column: i32,
    #[serde(with = "super::serde_duration", rename = "fall_interval_ms")]
    pub fall_interval: Duration,
    /// Left score, then right score.
    pub scores: [u64; 2],
    /// Left falling piece, then right falling piece.
    pub falling_pieces: [Option<Piece>; 2],
    /// Upcoming kind per side, if the spawner previews it.
    pub next_kinds: [Option<PieceKind>; 2],
    pub state: SessionState,
}

/// A complete two-player match.
///
/// Owns the grid, the wall, the scores and both falling pieces, and drives
/// them from [`tick`](Self::tick). Each tick first applies the players'
/// intents, then runs the automatic fall of every piece whose timer has
/// expired. The left side is always handled before the right side.
///
/// When a piece lands it is locked, full columns are cleared, and the
/// spawner is asked for a replacement on the same side. If the replacement
/// cannot be placed the match is over and the other side wins; nothing else
/// happens until [`reset`](Self::reset).
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use splitwall_engine::{Intent, MatchConfig, MatchSession, PieceSeed, RandomSpawner, Side};
///
/// let config = MatchConfig::default();
/// let spawner = RandomSpawner::with_seed(PieceSeed::from_bytes([0; 16]), config.spawn_inset);
/// let mut session = MatchSession::new(config, spawner).unwrap();
///
/// session.tick(Duration::from_millis(16), &[(Side::Left, Intent::Rotate)]);
///
/// assert!(!session.is_over());
/// assert_eq!(session.wall_column(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MatchSession<S> {
    config: MatchConfig,
    grid: Grid,
    border: BorderTracker,
    scores: ScoreKeeper,
    falling: [Option<FallingPiece>; 2],
    spawner: S,
    next_id: u64,
    stats: MatchStats,
    state: SessionState,
}

impl<S> MatchSession<S>
where
    S: Spawner,
{
    /// Builds a match and spawns the first piece of each side.
    pub fn new(config: MatchConfig, spawner: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut session = Self {
            grid: Grid::new(config.geometry()),
            border: BorderTracker::new(
                config.initial_fall_interval,
                config.min_fall_interval,
                config.speed_factor,
            ),
            scores: ScoreKeeper::new(config.points_per_column),
            falling: [None, None],
            spawner,
            next_id: 0,
            stats: MatchStats::new(),
            state: SessionState::Playing,
            config,
        };
        session.spawn_both();
        Ok(session)
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn wall_column(&self) -> i32 {
        self.border.wall_column()
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.border.fall_interval()
    }

    #[must_use]
    pub fn score(&self, side: Side) -> u64 {
        self.scores.score(side)
    }

    #[must_use]
    pub fn falling_piece(&self, side: Side) -> Option<&FallingPiece> {
        self.falling[side.index()].as_ref()
    }

    /// Kind of the piece `side` will get after its current one locks.
    #[must_use]
    pub fn next_kind(&self, side: Side) -> Option<PieceKind> {
        self.spawner.next_kind(side)
    }

    #[must_use]
    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match self.state {
            SessionState::Playing => None,
            SessionState::GameOver { winner } => Some(winner),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            rows: self.grid.render_rows(self.border.wall_column()),
            wall_column: self.border.wall_column(),
            fall_interval: self.border.fall_interval(),
            scores: Side::ALL.map(|side| self.scores.score(side)),
            falling_pieces: Side::ALL.map(|side| self.falling_piece(side).map(|f| *f.piece())),
            next_kinds: Side::ALL.map(|side| self.next_kind(side)),
            state: self.state,
        }
    }

    /// Advances the match by `elapsed`.
    ///
    /// `intents` are applied in order, all of the left side's before any of
    /// the right side's. A side whose piece locked during this tick skips its
    /// automatic fall. Does nothing once the match is over.
    pub fn tick(&mut self, elapsed: Duration, intents: &[(Side, Intent)]) -> Vec<LockOutcome> {
        let mut outcomes = Vec::new();
        if self.is_over() {
            return outcomes;
        }
        self.stats.advance(elapsed);

        for side in Side::ALL {
            let before = outcomes.len();
            for &(_, intent) in intents.iter().filter(|(s, _)| *s == side) {
                self.apply_into(side, intent, &mut outcomes);
            }
            if self.is_over() {
                break;
            }
            if outcomes[before..].iter().any(|o| o.side == side) {
                continue;
            }

            let interval = self.border.fall_interval();
            let Some(falling) = self.falling[side.index()].as_mut() else {
                continue;
            };
            if falling.advance(elapsed, interval) {
                self.fall(side, &mut outcomes);
            }
        }
        outcomes
    }

    /// Applies a single intent outside of a tick.
    pub fn apply(&mut self, side: Side, intent: Intent) -> Vec<LockOutcome> {
        let mut outcomes = Vec::new();
        self.apply_into(side, intent, &mut outcomes);
        outcomes
    }

    /// Starts the match over.
    ///
    /// Clears the grid, the wall position, the fall interval, the scores and
    /// the statistics, then spawns a fresh piece on each side. Afterwards the
    /// grid holds exactly those two falling pieces, not an empty board. The
    /// spawner is not rewound, so the new pieces continue its sequence.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.border.reset();
        self.scores.reset();
        self.stats = MatchStats::new();
        self.falling = [None, None];
        self.state = SessionState::Playing;
        self.spawn_both();
    }

    fn apply_into(&mut self, side: Side, intent: Intent, outcomes: &mut Vec<LockOutcome>) {
        if self.is_over() {
            return;
        }
        let wall = self.border.wall_column();
        let Some(falling) = self.falling[side.index()].as_mut() else {
            return;
        };
        // Rejected moves are expected input and leave everything as it was.
        let landed = match intent {
            Intent::MoveUp => {
                falling.try_move_up(&mut self.grid, wall).ok();
                false
            }
            Intent::MoveDown => {
                falling.try_move_down(&mut self.grid, wall).ok();
                false
            }
            Intent::Rotate => {
                falling.try_rotate(&mut self.grid, wall).ok();
                false
            }
            Intent::FastFall => falling.fall(&mut self.grid, wall).is_landed(),
        };
        if landed {
            self.land(side, outcomes);
        }
    }

    fn fall(&mut self, side: Side, outcomes: &mut Vec<LockOutcome>) {
        let wall = self.border.wall_column();
        let Some(falling) = self.falling[side.index()].as_mut() else {
            return;
        };
        if falling.fall(&mut self.grid, wall).is_landed() {
            self.land(side, outcomes);
        }
    }

    fn land(&mut self, side: Side, outcomes: &mut Vec<LockOutcome>) {
        let mut pending = vec![side];
        while let Some(side) = pending.pop() {
            let Some(falling) = self.falling[side.index()].take() else {
                continue;
            };
            let piece = falling.lock(&mut self.grid);
            let clears = scan_and_collapse(&mut self.grid, &mut self.border, &mut self.scores);
            self.stats.complete_lock(side, &clears);

            if !clears.is_empty() {
                for other in Side::ALL {
                    let Some(falling) = self.falling[other.index()].as_mut() else {
                        continue;
                    };
                    if falling.realign(&self.grid).is_err() {
                        pending.push(other);
                    }
                }
            }

            let next = self.spawn(side);
            outcomes.push(LockOutcome {
                side,
                piece,
                clears,
                next,
            });
            if self.is_over() {
                break;
            }
        }
    }

    fn spawn_both(&mut self) {
        for side in Side::ALL {
            if self.spawn(side).is_none() {
                break;
            }
        }
    }

    fn spawn(&mut self, side: Side) -> Option<Piece> {
        let placement = self.spawner.spawn_next(side, self.grid.geometry());
        self.next_id += 1;
        let piece = Piece::new(PieceId(self.next_id), placement.kind, side, placement.origin);
        match FallingPiece::spawn(piece, &mut self.grid, self.border.wall_column()) {
            Ok(falling) => {
                self.falling[side.index()] = Some(falling);
                Some(piece)
            }
            Err(_) => {
                self.state = SessionState::GameOver {
                    winner: side.opponent(),
                };
                None
            }
        }
    }
}
