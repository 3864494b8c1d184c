//! Built-in level pack

use super::level::{Level, LevelError};

/// Levels in play order
pub const BUILTIN_LEVELS: &[&str] = &[
    // 1: single push
    "
#####
#@$.#
#####
",
    // 2: push up, walk round, push left twice
    "
#######
#.    #
#  $  #
#  @  #
#######
",
    // 3: two boxes, two goals
    "
  #####
###   #
#.$ $.#
#  @  #
#######
",
];

/// Known solutions for the pack, in `U`/`D`/`L`/`R` notation
pub const BUILTIN_SOLUTIONS: &[&str] = &["R", "URULL", "ULRR"];

/// Parse the whole built-in pack
pub fn builtin() -> Result<Vec<Level>, LevelError> {
    BUILTIN_LEVELS.iter().map(|text| Level::parse(text)).collect()
}
