use std::fmt;

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest coordinate on either axis.
pub const DOMAIN_MIN: i32 = 0;
/// Highest coordinate on either axis (inclusive).
pub const DOMAIN_MAX: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Uniformly random cell anywhere in the domain, bounds included.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(DOMAIN_MIN..=DOMAIN_MAX),
            y: rng.gen_range(DOMAIN_MIN..=DOMAIN_MAX),
        }
    }

    pub fn distance(self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub const fn in_domain(self) -> bool {
        self.x >= DOMAIN_MIN && self.x <= DOMAIN_MAX && self.y >= DOMAIN_MIN && self.y <= DOMAIN_MAX
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How an agent behaves when it reaches the edge of the domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryRule {
    /// Each axis steps inward off its own edge; interior steps never wrap.
    #[default]
    Reflect,
    /// Bit-for-bit replay of the historical walk: steps are taken modulo 100
    /// and the x-axis edge correction reads the freshly moved y coordinate.
    Legacy,
}

impl BoundaryRule {
    /// Advance one cell on both axes, y first, each axis with its own draw.
    pub fn step<R: Rng + ?Sized>(self, from: Position, rng: &mut R) -> Position {
        match self {
            BoundaryRule::Reflect => {
                let y = reflect_axis(from.y, rng);
                let x = reflect_axis(from.x, rng);
                Position { x, y }
            }
            BoundaryRule::Legacy => {
                let y = legacy_axis(from.y, from.y, rng);
                let x = legacy_axis(from.x, y, rng);
                Position { x, y }
            }
        }
    }
}

fn reflect_axis<R: Rng + ?Sized>(value: i32, rng: &mut R) -> i32 {
    if value <= DOMAIN_MIN {
        DOMAIN_MIN + 1
    } else if value >= DOMAIN_MAX {
        DOMAIN_MAX - 1
    } else if rng.gen_bool(0.5) {
        value + 1
    } else {
        value - 1
    }
}

// `direction_key` is the coordinate whose upper edge decides the corrective
// direction. For y that is y itself; for x it is the already moved y.
fn legacy_axis<R: Rng + ?Sized>(value: i32, direction_key: i32, rng: &mut R) -> i32 {
    let next = if value == DOMAIN_MAX || value == DOMAIN_MIN {
        if direction_key == DOMAIN_MAX {
            value - 1
        } else {
            value + 1
        }
    } else if rng.gen_bool(0.5) {
        value + 1
    } else {
        value - 1
    };
    next.rem_euclid(DOMAIN_MAX)
}

/// Movement capability shared by every agent kind.
pub trait Roam {
    fn position(&self) -> Position;

    fn set_position(&mut self, position: Position);

    fn wander<R: Rng + ?Sized>(&mut self, rule: BoundaryRule, rng: &mut R) -> Position {
        let next = rule.step(self.position(), rng);
        self.set_position(next);
        next
    }
}
