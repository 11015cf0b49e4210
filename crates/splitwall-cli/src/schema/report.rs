use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitwall_engine::{MatchConfig, MatchSnapshot, MatchStats, PieceSeed, Side};

use crate::command::BotKind;

/// Result of a simulated match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Timestamp when the simulation finished (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Random seed used for piece generation
    pub seed: PieceSeed,
    /// Configuration the match was played with
    pub config: MatchConfig,
    /// Bot controlling each side, left first
    pub bots: [BotKind; 2],
    /// Frame rate of the simulation
    pub fps: u32,
    /// Side that won, or `None` if the time limit was reached first
    pub winner: Option<Side>,
    /// Board state at the end of the simulation
    pub final_snapshot: MatchSnapshot,
    /// Statistics at the end of the simulation
    pub final_stats: MatchStats,
}
