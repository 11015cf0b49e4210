use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use splitwall_engine::{Intent, MatchConfig, MatchSession, PieceSeed, RandomSpawner, Side};

use crate::{
    schema::report::SimulationReport,
    util::{self, Output},
};

/// How a simulated player picks its intents.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, Serialize, Deserialize)]
pub enum BotKind {
    /// Presses a random key on some frames
    #[default]
    Random,
    /// Occasionally rotates, mostly hurries the piece towards the wall
    Dropper,
    /// Never presses anything
    Idle,
}

impl BotKind {
    fn choose<R>(self, rng: &mut R) -> Option<Intent>
    where
        R: Rng + ?Sized,
    {
        match self {
            BotKind::Random => rng
                .random_bool(0.2)
                .then(|| Intent::ALL[rng.random_range(0..Intent::ALL.len())]),
            BotKind::Dropper => {
                let roll: f64 = rng.random();
                if roll < 0.05 {
                    Some(Intent::Rotate)
                } else if roll < 0.3 {
                    Some(Intent::FastFall)
                } else {
                    None
                }
            }
            BotKind::Idle => None,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Match configuration file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Piece seed as 32 hex digits; random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Bot playing the left side
    #[arg(long, default_value = "random")]
    left: BotKind,
    /// Bot playing the right side
    #[arg(long, default_value = "random")]
    right: BotKind,
    /// Simulated frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Stop after this many simulated seconds if nobody has lost
    #[arg(long, default_value_t = 300)]
    max_seconds: u32,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        seed,
        left,
        right,
        fps,
        max_seconds,
        output,
    } = arg;

    let config = match config {
        Some(path) => util::read_config_file(path)?,
        None => MatchConfig::default(),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let spawner = RandomSpawner::with_seed(seed, config.spawn_inset);
    let mut session =
        MatchSession::new(config.clone(), spawner).context("Match configuration is invalid")?;

    let bots = [*left, *right];
    let frame = Duration::from_secs(1) / *fps;
    let total_frames = u64::from(*max_seconds) * u64::from(*fps);
    let progress_frames = u64::from(*fps) * 30;

    eprintln!("Simulating {left:?} vs {right:?} (seed {seed}, {fps} fps, up to {max_seconds}s)...");

    let mut rng = rand::rng();
    for frame_index in 1..=total_frames {
        let intents: Vec<(Side, Intent)> = Side::ALL
            .into_iter()
            .zip(bots)
            .filter_map(|(side, bot)| bot.choose(&mut rng).map(|intent| (side, intent)))
            .collect();

        for outcome in session.tick(frame, &intents) {
            if !outcome.clears.is_empty() {
                eprintln!(
                    "  {:>7.2?}: {:?} cleared {} column(s), wall at {}",
                    session.stats().elapsed(),
                    outcome.side,
                    outcome.clears.total(),
                    session.wall_column()
                );
            }
        }
        if session.is_over() {
            break;
        }
        if frame_index % progress_frames == 0 {
            eprintln!(
                "  {:>7.2?}: score {} - {}, fall interval {:?}",
                session.stats().elapsed(),
                session.score(Side::Left),
                session.score(Side::Right),
                session.fall_interval()
            );
        }
    }

    match session.winner() {
        Some(side) => eprintln!("{side:?} wins after {:.2?}", session.stats().elapsed()),
        None => eprintln!("Time limit reached without a winner"),
    }
    eprintln!(
        "Final score: {} - {}",
        session.score(Side::Left),
        session.score(Side::Right)
    );

    let report = SimulationReport {
        recorded_at: Utc::now(),
        seed,
        config,
        bots,
        fps: *fps,
        winner: session.winner(),
        final_snapshot: session.snapshot(),
        final_stats: session.stats().clone(),
    };
    Output::save_json(&report, output.clone())?;

    if let Some(path) = output {
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}
