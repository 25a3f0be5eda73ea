use serde::{Deserialize, Serialize};

use crate::modules::sheep::Sheep;
use crate::modules::walk::{Position, Roam};

/// Squared Euclidean reach of a strike: the eight neighbours and the own cell.
pub const STRIKE_RANGE_SQUARED: i32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wolf {
    pub position: Position,
    pub kills: u32,
}

impl Wolf {
    pub const fn new(position: Position) -> Self {
        Self { position, kills: 0 }
    }

    /// Pick the first sheep in flock order within strike range. The wolf
    /// counts the kill but leaves the flock untouched; the caller removes
    /// the returned index once every wolf has hunted.
    pub fn hunt(&mut self, flock: &[Sheep]) -> Option<usize> {
        let prey = flock
            .iter()
            .position(|sheep| in_strike_range(self.position, sheep.position))?;
        self.kills = self.kills.saturating_add(1);
        Some(prey)
    }

    pub fn reproduce(&mut self, threshold: u32) -> Option<Wolf> {
        if self.kills < threshold {
            return None;
        }
        self.kills = 0;
        Some(Wolf::new(self.position))
    }
}

impl Roam for Wolf {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

fn in_strike_range(a: Position, b: Position) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy <= STRIKE_RANGE_SQUARED
}
