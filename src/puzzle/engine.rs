//! Puzzle state machine
//!
//! `Puzzle` owns one level attempt. Moves are validated against terrain and
//! boxes; a successful move may push exactly one box. The attempt is
//! complete once every goal holds a box, after which moves are rejected.

use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::level::{Grid, Level, LevelError, Overlay, Position, Tile};

/// Cardinal move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid offset for one step
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Text that names no direction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction `{0}`")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// `U`/`D`/`L`/`R` or the full word, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "U" | "UP" => Ok(Direction::Up),
            "D" | "DOWN" => Ok(Direction::Down),
            "L" | "LEFT" => Ok(Direction::Left),
            "R" | "RIGHT" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Lifecycle of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzlePhase {
    Active,
    /// Terminal until reset
    Complete,
}

/// Mutable state of one attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleState {
    grid: Grid<Tile>,
    overlay: Grid<Overlay>,
    player: Position,
    move_count: u32,
    complete: bool,
}

impl PuzzleState {
    pub(super) fn new(grid: Grid<Tile>, overlay: Grid<Overlay>, player: Position) -> Self {
        Self {
            grid,
            overlay,
            player,
            move_count: 0,
            complete: false,
        }
    }

    pub fn grid(&self) -> &Grid<Tile> {
        &self.grid
    }

    pub fn overlay(&self) -> &Grid<Overlay> {
        &self.overlay
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn has_box(&self, pos: Position) -> bool {
        self.overlay.get(pos) == Some(Overlay::Box)
    }

    /// Walkable terrain; out-of-bounds counts as blocked
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.grid.get(pos).is_some_and(Tile::is_walkable)
    }

    /// Every goal cell is covered by a box. Extra boxes are ignored.
    pub fn goals_covered(&self) -> bool {
        self.grid
            .iter()
            .filter(|&(_, tile)| tile == Tile::Goal)
            .all(|(pos, _)| self.has_box(pos))
    }

    /// Boxes sitting on goals
    pub fn boxes_on_goals(&self) -> usize {
        self.grid
            .iter()
            .filter(|&(pos, tile)| tile == Tile::Goal && self.has_box(pos))
            .count()
    }

    /// Render rows back to level text (player drawn over the terrain)
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.grid.width() + 1) * self.grid.height());
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let pos = IVec2::new(x as i32, y as i32);
                let tile = self.grid.get(pos).unwrap_or_default();
                let ch = match (tile, self.has_box(pos), pos == self.player) {
                    (Tile::Goal, _, true) => '+',
                    (_, _, true) => '@',
                    (Tile::Goal, true, _) => '*',
                    (_, true, _) => '$',
                    (Tile::Wall, ..) => '#',
                    (Tile::Goal, ..) => '.',
                    (Tile::Floor, ..) => ' ',
                    (Tile::Empty, ..) => '-',
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

/// One level attempt with its reset template
#[derive(Debug, Clone)]
pub struct Puzzle {
    template: Level,
    state: PuzzleState,
}

impl Puzzle {
    pub fn new(level: Level) -> Self {
        let state = level.instantiate();
        Self {
            template: level,
            state,
        }
    }

    /// Parse level text and start an attempt
    pub fn from_text(text: &str) -> Result<Self, LevelError> {
        Ok(Self::new(Level::parse(text)?))
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn level(&self) -> &Level {
        &self.template
    }

    pub fn phase(&self) -> PuzzlePhase {
        if self.state.complete {
            PuzzlePhase::Complete
        } else {
            PuzzlePhase::Active
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    /// Try to move the player one cell. Returns false (state untouched) when
    /// blocked, when a push is blocked, or when the level is already complete.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        if self.state.complete {
            return false;
        }

        let step = direction.offset();
        let target = self.state.player + step;
        if !self.state.is_walkable(target) {
            return false;
        }

        if self.state.has_box(target) {
            let push_to = target + step;
            if !self.state.is_walkable(push_to) || self.state.has_box(push_to) {
                return false;
            }
            self.state.overlay.set(target, Overlay::Clear);
            self.state.overlay.set(push_to, Overlay::Box);
        }

        self.state.player = target;
        self.state.move_count += 1;
        self.state.complete = self.state.goals_covered();
        if self.state.complete {
            log::info!("Puzzle solved in {} moves", self.state.move_count);
        }
        true
    }

    /// Restore the freshly parsed attempt
    pub fn reset(&mut self) {
        self.state = self.template.instantiate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SINGLE: &str = "#####\n#@$.#\n#####";

    #[test]
    fn test_push_onto_goal_completes() {
        let mut puzzle = Puzzle::from_text(SINGLE).unwrap();
        assert_eq!(puzzle.state().player(), IVec2::new(1, 1));
        assert!(puzzle.move_player(Direction::Right));
        assert_eq!(puzzle.state().move_count(), 1);
        assert!(puzzle.state().has_box(IVec2::new(3, 1)));
        assert!(!puzzle.state().has_box(IVec2::new(2, 1)));
        assert!(puzzle.is_complete());
        assert_eq!(puzzle.phase(), PuzzlePhase::Complete);

        // Terminal: every further move is refused
        for dir in Direction::ALL {
            assert!(!puzzle.move_player(dir));
        }
        assert_eq!(puzzle.state().move_count(), 1);
    }

    #[test]
    fn test_push_into_wall_rejected() {
        let mut puzzle = Puzzle::from_text("#####\n#@$#.\n#####").unwrap();
        let before = puzzle.state().clone();
        assert!(!puzzle.move_player(Direction::Right));
        assert_eq!(puzzle.state(), &before);
    }

    #[test]
    fn test_double_push_rejected() {
        let mut puzzle = Puzzle::from_text("######\n#@$$.#\n######").unwrap();
        let before = puzzle.state().clone();
        assert!(!puzzle.move_player(Direction::Right));
        assert_eq!(puzzle.state(), &before);
    }

    #[test]
    fn test_empty_and_out_of_bounds_block() {
        // `x` is unknown -> Empty; left edge is out of bounds
        let mut puzzle = Puzzle::from_text("@x\n  ").unwrap();
        assert!(!puzzle.move_player(Direction::Right));
        assert!(!puzzle.move_player(Direction::Left));
        assert!(!puzzle.move_player(Direction::Up));
        assert!(puzzle.move_player(Direction::Down));
        assert_eq!(puzzle.state().move_count(), 1);
    }

    #[test]
    fn test_push_into_empty_rejected() {
        let mut puzzle = Puzzle::from_text("@$?").unwrap();
        assert!(!puzzle.move_player(Direction::Right));
        assert_eq!(puzzle.state().player(), IVec2::new(0, 0));
    }

    #[test]
    fn test_walk_without_box() {
        let mut puzzle = Puzzle::from_text("#####\n#@ .#\n#####").unwrap();
        assert!(puzzle.move_player(Direction::Right));
        assert!(puzzle.move_player(Direction::Right));
        assert_eq!(puzzle.state().player(), IVec2::new(3, 1));
        // Standing on a goal is not covering it
        assert!(!puzzle.is_complete());
    }

    #[test]
    fn test_goal_coverage_ignores_extra_boxes() {
        let mut puzzle = Puzzle::from_text("######\n#@$.$#\n######").unwrap();
        assert!(puzzle.move_player(Direction::Right));
        assert!(puzzle.is_complete());
        assert_eq!(puzzle.state().boxes_on_goals(), 1);
    }

    #[test]
    fn test_level_without_goals_never_starts_complete() {
        let mut puzzle = Puzzle::from_text("#@ #").unwrap();
        assert!(!puzzle.is_complete());
        // No goals: trivially covered after the first successful move
        assert!(puzzle.move_player(Direction::Right));
        assert!(puzzle.is_complete());
    }

    #[test]
    fn test_reset_restores_parsed_state() {
        let mut puzzle = Puzzle::from_text(SINGLE).unwrap();
        let fresh = puzzle.state().clone();
        assert!(puzzle.move_player(Direction::Right));
        puzzle.reset();
        assert_eq!(puzzle.state(), &fresh);
        assert_eq!(puzzle.state().move_count(), 0);
        assert!(!puzzle.is_complete());

        // Template must not have been touched by the previous attempt
        assert!(puzzle.move_player(Direction::Right));
        puzzle.reset();
        assert_eq!(puzzle.state(), &fresh);
    }

    #[test]
    fn test_to_text_round_trips() {
        let text = "#####\n#+$ #\n# * #\n#####\n";
        let puzzle = Puzzle::from_text(text).unwrap();
        assert_eq!(puzzle.state().to_text(), text);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("r".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("Left".parse(), Ok(Direction::Left));
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(ParseDirectionError("sideways".to_string()))
        );
        assert!("".parse::<Direction>().is_err());
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    fn level_text() -> impl Strategy<Value = String> {
        let cell = prop::sample::select(vec!['#', ' ', ' ', '.', '$', '*', 'x']);
        let row = prop::collection::vec(cell, 1..8).prop_map(|r| r.into_iter().collect::<String>());
        (prop::collection::vec(row, 1..7), 0usize..6, 0usize..8).prop_map(|(mut rows, py, px)| {
            let y = py % rows.len();
            let mut chars: Vec<char> = rows[y].chars().collect();
            let x = px % chars.len();
            chars[x] = '@';
            rows[y] = chars.into_iter().collect();
            rows.join("\n")
        })
    }

    proptest! {
        #[test]
        fn prop_reset_restores_parse(
            text in level_text(),
            moves in prop::collection::vec(direction(), 0..40),
        ) {
            let mut puzzle = Puzzle::from_text(&text).unwrap();
            let fresh = Level::parse(&text).unwrap().instantiate();
            for dir in moves {
                puzzle.move_player(dir);
            }
            puzzle.reset();
            prop_assert_eq!(puzzle.state(), &fresh);
        }

        #[test]
        fn prop_box_count_is_conserved(
            text in level_text(),
            moves in prop::collection::vec(direction(), 0..40),
        ) {
            let mut puzzle = Puzzle::from_text(&text).unwrap();
            let boxes = puzzle.level().box_count();
            for dir in moves {
                let before = puzzle.state().move_count();
                let moved = puzzle.move_player(dir);
                prop_assert_eq!(puzzle.state().move_count(), before + moved as u32);
                prop_assert!(puzzle.state().is_walkable(puzzle.state().player()));
            }
            let after = puzzle.state().overlay().iter().filter(|&(_, o)| o == Overlay::Box).count();
            prop_assert_eq!(after, boxes);
        }
    }
}
