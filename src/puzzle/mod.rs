//! Warehouse box-pushing puzzle
//!
//! Fully synchronous: every call completes before returning and callers
//! serialize access.

pub mod engine;
pub mod level;
pub mod levels;
pub mod session;

pub use engine::{Direction, ParseDirectionError, Puzzle, PuzzlePhase, PuzzleState};
pub use level::{Grid, Level, LevelError, Overlay, Position, Tile};
pub use session::{PuzzleSession, SessionEvent, SessionPhase};
