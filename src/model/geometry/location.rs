use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// a fixed-point 2D coordinate. all geometry decisions are made with exact
/// integer arithmetic on these values; equality is exact and ordering is
/// lexicographic on (x, y).
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Location {
        Location { x, y }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
