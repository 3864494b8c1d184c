//! Retro Arcade headless runner
//!
//! Plays through the built-in puzzle pack and one autopiloted shooter run,
//! logging events and outcomes.
//!
//! Usage: `retro-arcade [seed] [max_ticks]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use retro_arcade::LogReporter;
    use retro_arcade::puzzle::levels::{BUILTIN_SOLUTIONS, builtin};
    use retro_arcade::puzzle::{Direction, LevelError, PuzzleSession};
    use retro_arcade::sim::{GameEvent, GameState, Phase, ShooterSession, TickInput};
    use retro_arcade::tuning::Tuning;

    const DEFAULT_SEED: u64 = 0x5eed;
    const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 5;

    pub fn run() {
        env_logger::init();
        log::info!("Retro Arcade (headless) starting...");

        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let max_ticks = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_TICKS);

        if let Err(e) = run_puzzles() {
            log::error!("Puzzle pack failed to load: {}", e);
        }
        run_shooter(seed, max_ticks);
    }

    fn run_puzzles() -> Result<(), LevelError> {
        let mut session = PuzzleSession::new(builtin()?, LogReporter)?;
        session.advance();

        for solution in BUILTIN_SOLUTIONS {
            println!("{}", session.state().to_text());
            for dir in solution.chars().filter_map(|c| c.to_string().parse::<Direction>().ok()) {
                // A few ticks of "thinking" per move
                for _ in 0..20 {
                    session.tick();
                }
                session.move_player(dir);
            }
            for event in session.drain_events() {
                log::info!("{:?}", event);
            }
            session.advance();
        }
        Ok(())
    }

    fn run_shooter(seed: u64, max_ticks: u64) {
        let mut session = ShooterSession::seeded(seed, Tuning::default(), LogReporter);
        let mut advance = false;

        for _ in 0..max_ticks {
            let input = autopilot(session.state(), advance);
            // Toggle so advance is seen as a fresh press each time it is needed
            advance = !advance;

            for event in session.update(&input) {
                match event {
                    GameEvent::ShotFired { .. } => {}
                    GameEvent::GameOver { .. } => {
                        log::info!("{:?}", event);
                        let hud = session.hud();
                        println!(
                            "Run over: round {} score {} lives {}",
                            hud.level, hud.score, hud.lives
                        );
                        return;
                    }
                    _ => log::info!("{:?}", event),
                }
            }
        }

        let hud = session.hud();
        println!(
            "Stopped after {} ticks: round {} score {} lives {}",
            max_ticks, hud.level, hud.score, hud.lives
        );
    }

    /// Track the nearest enemy horizontally, keep firing, bomb when crowded
    fn autopilot(state: &GameState, advance: bool) -> TickInput {
        if state.phase != Phase::Playing {
            return TickInput {
                advance,
                ..Default::default()
            };
        }

        let player = state.player.pos;
        let target = state
            .enemies
            .iter()
            .filter(|e| e.pos.y > 0.0)
            .min_by(|a, b| {
                let da = a.pos.distance_squared(player);
                let db = b.pos.distance_squared(player);
                da.total_cmp(&db)
            })
            .map(|e| e.pos.x);
        let threatened = state
            .bullets
            .iter()
            .filter(|b| !b.from_player)
            .any(|b| b.pos.distance(player) < 80.0);

        TickInput {
            left: target.is_some_and(|x| x < player.x - 8.0),
            right: target.is_some_and(|x| x > player.x + 8.0),
            fire: true,
            bomb: threatened && state.bombs > 0,
            ..Default::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
