//! Shooter session: state, randomness and the outcome sink wired together

use rand_pcg::Pcg32;

use super::state::{GameEvent, GameState, Hud};
use super::tick::{TickInput, tick};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::outcome::OutcomeReporter;
use crate::rng::{self, RandomSource};
use crate::tuning::Tuning;

/// Owns a shooter run and forwards its outcome to the host
pub struct ShooterSession<S: RandomSource, R: OutcomeReporter> {
    state: GameState,
    rng: S,
    reporter: R,
    accumulator: f32,
}

impl<R: OutcomeReporter> ShooterSession<Pcg32, R> {
    /// Session driven by a seeded generator
    pub fn seeded(seed: u64, tuning: Tuning, reporter: R) -> Self {
        log::info!("Shooter session seeded with {}", seed);
        Self::new(tuning, rng::seeded(seed), reporter)
    }
}

impl<S: RandomSource, R: OutcomeReporter> ShooterSession<S, R> {
    pub fn new(tuning: Tuning, rng: S, reporter: R) -> Self {
        Self {
            state: GameState::new(tuning),
            rng,
            reporter,
            accumulator: 0.0,
        }
    }

    /// Run exactly one tick
    pub fn update(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let out = tick(&mut self.state, input, &mut self.rng);
        if let Some(outcome) = out.outcome {
            self.reporter.report(outcome);
        }
        out.events
    }

    /// Run as many ticks as `dt` seconds of host time cover
    pub fn advance_time(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        self.accumulator += dt.min(0.1);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.update(input));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> Hud {
        self.state.hud()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}
