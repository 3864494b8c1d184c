//! Puzzle session: a run through a sequence of levels
//!
//! Adds the pieces around the bare state machine that the portal needs: an
//! elapsed-tick clock (the score, lower is better), one outcome report per
//! solved level, and progression events the host can persist.

use serde::{Deserialize, Serialize};

use super::engine::{Direction, Puzzle, PuzzleState};
use super::level::{Level, LevelError};
use crate::consts::PUZZLE_GAME_ID;
use crate::outcome::{Outcome, OutcomeReporter, ReportLatch};

/// Where the session is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Level loaded, clock stopped, waiting for start
    Idle,
    Playing,
    /// Current level solved; waiting for `advance`
    LevelComplete,
    /// Last level solved
    Finished,
}

/// Progression notifications for the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    LevelSolved {
        level: u32,
        moves: u32,
        ticks: u64,
    },
    /// The host may persist this as the player's furthest level
    LevelUnlocked { level: u32 },
    AllLevelsCleared,
}

pub struct PuzzleSession<R: OutcomeReporter> {
    levels: Vec<Level>,
    index: usize,
    puzzle: Puzzle,
    phase: SessionPhase,
    elapsed_ticks: u64,
    latch: ReportLatch,
    events: Vec<SessionEvent>,
    reporter: R,
}

impl<R: OutcomeReporter> PuzzleSession<R> {
    /// Start a session at the first level
    pub fn new(levels: Vec<Level>, reporter: R) -> Result<Self, LevelError> {
        Self::starting_at(levels, 0, reporter)
    }

    /// Start a session at a 0-based level index (clamped to the pack)
    pub fn starting_at(levels: Vec<Level>, index: usize, reporter: R) -> Result<Self, LevelError> {
        let index = index.min(levels.len().saturating_sub(1));
        let first = levels.get(index).cloned().ok_or(LevelError::EmptyPack)?;
        Ok(Self {
            levels,
            index,
            puzzle: Puzzle::new(first),
            phase: SessionPhase::Idle,
            elapsed_ticks: 0,
            latch: ReportLatch::default(),
            events: Vec::new(),
            reporter,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// 0-based index of the current level
    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Render snapshot of the current attempt
    pub fn state(&self) -> &PuzzleState {
        self.puzzle.state()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Take pending progression events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start the clock on the loaded level
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Playing;
            log::info!("Puzzle level {} started", self.index + 1);
        }
    }

    /// Advance the clock by one tick while playing
    pub fn tick(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.elapsed_ticks += 1;
        }
    }

    /// Forward a move to the current level. Ignored unless playing.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        let moved = self.puzzle.move_player(direction);
        if moved && self.puzzle.is_complete() {
            self.finish_level();
        }
        moved
    }

    /// Restart the current level and its clock. Ignored unless playing.
    pub fn reset(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.puzzle.reset();
        self.elapsed_ticks = 0;
        self.latch.rearm();
    }

    /// Confirm signal: starts an idle session, moves past a solved level
    pub fn advance(&mut self) {
        match self.phase {
            SessionPhase::Idle => self.start(),
            SessionPhase::LevelComplete => {
                self.load_level(self.index + 1);
                self.phase = SessionPhase::Playing;
            }
            SessionPhase::Playing | SessionPhase::Finished => {}
        }
    }

    fn finish_level(&mut self) {
        let level = self.index as u32 + 1;
        let moves = self.puzzle.state().move_count();

        if self.latch.claim() {
            self.reporter.report(Outcome {
                game_id: PUZZLE_GAME_ID.to_string(),
                level_reached: level,
                score: self.elapsed_ticks,
                auxiliary_metric: moves as u64,
                completed: true,
            });
        }
        self.events.push(SessionEvent::LevelSolved {
            level,
            moves,
            ticks: self.elapsed_ticks,
        });

        if self.index + 1 < self.levels.len() {
            self.events.push(SessionEvent::LevelUnlocked { level: level + 1 });
            self.phase = SessionPhase::LevelComplete;
        } else {
            self.events.push(SessionEvent::AllLevelsCleared);
            self.phase = SessionPhase::Finished;
            log::info!("All {} puzzle levels cleared", self.levels.len());
        }
    }

    fn load_level(&mut self, index: usize) {
        if let Some(level) = self.levels.get(index) {
            self.index = index;
            self.puzzle = Puzzle::new(level.clone());
            self.elapsed_ticks = 0;
            self.latch.rearm();
            log::info!("Puzzle level {} loaded", index + 1);
        }
    }
}
