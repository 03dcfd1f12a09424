//! Simulation mode: many random-vs-random duels in parallel
//!
//! Each duel gets its own engine and controller seeds derived from the master
//! seed and the duel index, so a run is reproducible regardless of how rayon
//! schedules the work.

use crate::core::{ChatId, DuelConfig, Seat};
use crate::game::{DuelEndReason, DuelEngine, DuelLoop, DuelOutcome, RandomController, VerbosityLevel};
use crate::{DuelError, Result};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};

const FIRST_ID: ChatId = ChatId::new(1);
const SECOND_ID: ChatId = ChatId::new(2);

/// Aggregate results of a simulation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationReport {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    /// Duels stopped by the action limit
    pub unfinished: usize,
    pub total_actions: u64,
    pub elapsed: Duration,
}

impl SimulationReport {
    fn record(&mut self, outcome: &DuelOutcome) {
        self.games += 1;
        self.total_actions += u64::from(outcome.actions_taken);
        match outcome.end_reason {
            DuelEndReason::Victory(Seat::First) => self.first_wins += 1,
            DuelEndReason::Victory(Seat::Second) => self.second_wins += 1,
            DuelEndReason::ActionLimit | DuelEndReason::Abandoned => self.unfinished += 1,
        }
    }

    pub fn average_actions(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_actions as f64 / self.games as f64
        }
    }

    /// Running score as the engine keeps it: +1 per first-seat win, -1 per second-seat win
    pub fn score(&self) -> i64 {
        self.first_wins as i64 - self.second_wins as i64
    }

    pub fn first_win_rate(&self) -> f64 {
        let decided = self.first_wins + self.second_wins;
        if decided == 0 {
            0.0
        } else {
            self.first_wins as f64 / decided as f64
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Results ===")?;
        writeln!(f, "Games:          {}", self.games)?;
        writeln!(
            f,
            "First seat:     {} ({:.1}%)",
            self.first_wins,
            self.first_win_rate() * 100.0
        )?;
        writeln!(f, "Second seat:    {}", self.second_wins)?;
        writeln!(f, "Unfinished:     {}", self.unfinished)?;
        writeln!(f, "Score:          {:+}", self.score())?;
        writeln!(f, "Avg actions:    {:.1}", self.average_actions())?;
        write!(
            f,
            "Elapsed:        {:.2}ms",
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

/// Play one seeded random duel to completion
pub fn play_random_duel(config: &DuelConfig, game_seed: u64) -> Result<DuelOutcome> {
    let mut engine = DuelEngine::new(config.clone(), game_seed)?;
    engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
    engine.seat_player("Player 1", FIRST_ID, Seat::First)?;
    engine.seat_player("Player 2", SECOND_ID, Seat::Second)?;
    engine.start()?;

    let mut first = RandomController::with_seed(FIRST_ID, game_seed.wrapping_add(0x1234_5678_9ABC_DEF0));
    let mut second = RandomController::with_seed(SECOND_ID, game_seed.wrapping_add(0xFEDC_BA98_7654_3210));
    DuelLoop::new(&mut engine).run_duel(&mut first, &mut second)
}

/// Run `games` random duels in parallel and aggregate the outcomes
pub fn run_simulation(games: usize, seed: u64, config: &DuelConfig) -> Result<SimulationReport> {
    if games == 0 {
        return Err(DuelError::Config(
            "simulation needs at least one game".to_string(),
        ));
    }
    config.validate()?;

    let start = Instant::now();
    let outcomes = (0..games)
        .into_par_iter()
        .map(|game_idx| {
            let mut seeder = Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(game_idx as u64));
            play_random_duel(config, seeder.gen())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut report = SimulationReport::default();
    for outcome in &outcomes {
        report.record(outcome);
    }
    report.elapsed = start.elapsed();
    Ok(report)
}
