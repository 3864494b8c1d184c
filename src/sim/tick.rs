//! Fixed timestep simulation tick
//!
//! One call to [`tick`] is one simulation frame: input, spawning, movement,
//! collisions, then round progression.

use serde::{Deserialize, Serialize};

use super::collision;
use super::player;
use super::spawn::{self, Spawn};
use super::state::{EnemyKind, GameEvent, GameState, Phase, RunEnd};
use crate::consts::{SHOOTER_GAME_ID, TOTAL_ROUNDS};
use crate::outcome::Outcome;
use crate::rng::RandomSource;

/// Input state for a single tick (held actions)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub bomb: bool,
    /// Start / next round / restart (edge triggered)
    pub advance: bool,
}

/// What a tick produced besides the state change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub events: Vec<GameEvent>,
    /// Set on the single tick a run's result becomes final
    pub outcome: Option<Outcome>,
}

/// Run one simulation tick
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut dyn RandomSource) -> TickOutput {
    let mut events = Vec::new();

    let advance_pressed = input.advance && !state.latches.advance_held;
    state.latches.advance_held = input.advance;

    match state.phase {
        Phase::Idle | Phase::GameOver(_) if advance_pressed => {
            state.start_run(rng);
            events.push(GameEvent::RoundStarted { level: state.level });
            return TickOutput {
                events,
                outcome: None,
            };
        }
        Phase::StageClear if advance_pressed => {
            let next = state.level + 1;
            state.init_round(next, rng);
            events.push(GameEvent::RoundStarted { level: state.level });
            return TickOutput {
                events,
                outcome: None,
            };
        }
        Phase::Playing => simulate(state, input, rng, &mut events),
        _ => {}
    }

    let outcome = evaluate_progression(state, &mut events);
    TickOutput { events, outcome }
}

fn simulate(
    state: &mut GameState,
    input: &TickInput,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) {
    state.time_ticks += 1;

    // Player
    player::integrate(&mut state.player, input, &state.tuning);
    player::handle_weapons(state, input, events);

    // Spawning
    let (wave, spawns) = spawn::step(
        state.wave,
        state.level,
        state.enemies.len(),
        &state.tuning,
        rng,
    );
    state.wave = wave;
    for spawned in spawns {
        match spawned {
            Spawn::Enemy(enemy) => {
                log::debug!("Spawned {:?} at {:?}", enemy.kind, enemy.pos);
                if enemy.kind == EnemyKind::Boss {
                    events.push(GameEvent::BossSpawned { level: state.level });
                }
                state.enemies.push(enemy);
            }
            Spawn::Item(item) => state.items.push(item),
        }
    }

    // Movement
    for bullet in state.bullets.iter_mut() {
        bullet.pos += bullet.vel;
    }
    state.bullets.retain(|b| b.is_on_field());

    let mut enemy_fire = Vec::new();
    for enemy in state.enemies.iter_mut() {
        enemy.advance(rng, &mut enemy_fire);
    }
    state.bullets.extend(enemy_fire);

    for item in state.items.iter_mut() {
        item.pos += item.vel;
    }
    state.items.retain(|i| i.is_on_field());

    // Collisions
    collision::resolve_player_fire(state, rng, events);
    if !collision::resolve_player_contacts(state, events) {
        collision::resolve_pickups(state, events);
    }

    state.update_particles();
}

/// Move to StageClear or GameOver when the round objective is met, and
/// produce the run's outcome exactly once.
fn evaluate_progression(state: &mut GameState, events: &mut Vec<GameEvent>) -> Option<Outcome> {
    if state.phase == Phase::Playing && state.round_cleared() {
        events.push(GameEvent::StageCleared { level: state.level });
        if state.level >= TOTAL_ROUNDS {
            state.phase = Phase::GameOver(RunEnd::Completed);
            events.push(GameEvent::GameOver {
                end: RunEnd::Completed,
                score: state.score,
            });
            log::info!("All {} rounds cleared with {} points", TOTAL_ROUNDS, state.score);
        } else {
            state.phase = Phase::StageClear;
            log::info!("Round {} cleared", state.level);
        }
    }

    match state.phase {
        Phase::GameOver(end) if state.report.claim() => Some(Outcome {
            game_id: SHOOTER_GAME_ID.to_string(),
            level_reached: state.level,
            score: state.score,
            auxiliary_metric: 0,
            completed: end == RunEnd::Completed,
        }),
        _ => None,
    }
}
