//! Level text parsing
//!
//! A level is parsed once into an immutable `Level` template. Every fresh
//! attempt, including resets, is rebuilt from that template.

use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::PuzzleState;

/// Integer grid coordinate (x to the right, y downward)
pub type Position = IVec2;

/// Static terrain of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
    Goal,
    /// Outside the level or unknown character; never walkable
    #[default]
    Empty,
}

impl Tile {
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Goal)
    }
}

/// Movable occupant of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Overlay {
    #[default]
    Clear,
    Box,
}

/// Fixed-size row-major grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![T::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Cell value, or `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<T> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrite a cell. Returns false when out of bounds.
    pub fn set(&mut self, pos: Position, value: T) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// All cells with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, T)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &cell)| {
            let pos = IVec2::new((i % self.width) as i32, (i / self.width) as i32);
            (pos, cell)
        })
    }
}

/// Level parsing failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level text contains no rows")]
    Empty,
    #[error("level has no player start (`@` or `+`)")]
    MissingPlayer,
    #[error("level pack is empty")]
    EmptyPack,
}

/// Immutable parsed level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    tiles: Grid<Tile>,
    overlay: Grid<Overlay>,
    start: Position,
}

impl Level {
    /// Parse level text.
    ///
    /// `#` wall, `.` goal, `@` player, `+` player on goal, `$` box,
    /// `*` box on goal, space floor. Any other character becomes `Empty`.
    /// Rows shorter than the widest one are padded with `Empty`; blank rows
    /// are skipped. If several player starts appear the last one wins.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(LevelError::Empty);
        }

        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let height = rows.len();
        let mut tiles = Grid::new(width, height);
        let mut overlay = Grid::new(width, height);
        let mut start = None;

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let pos = IVec2::new(x as i32, y as i32);
                let (tile, cell) = match ch {
                    '#' => (Tile::Wall, Overlay::Clear),
                    '.' => (Tile::Goal, Overlay::Clear),
                    '@' => {
                        start = Some(pos);
                        (Tile::Floor, Overlay::Clear)
                    }
                    '+' => {
                        start = Some(pos);
                        (Tile::Goal, Overlay::Clear)
                    }
                    '$' => (Tile::Floor, Overlay::Box),
                    '*' => (Tile::Goal, Overlay::Box),
                    ' ' => (Tile::Floor, Overlay::Clear),
                    _ => (Tile::Empty, Overlay::Clear),
                };
                tiles.set(pos, tile);
                overlay.set(pos, cell);
            }
        }

        let start = start.ok_or(LevelError::MissingPlayer)?;
        Ok(Self {
            tiles,
            overlay,
            start,
        })
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal_count(&self) -> usize {
        self.tiles.iter().filter(|&(_, t)| t == Tile::Goal).count()
    }

    pub fn box_count(&self) -> usize {
        self.overlay.iter().filter(|&(_, o)| o == Overlay::Box).count()
    }

    /// Build a fresh attempt from this template
    pub fn instantiate(&self) -> PuzzleState {
        PuzzleState::new(self.tiles.clone(), self.overlay.clone(), self.start)
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::parse(s)
    }
}
