use serde::{Deserialize, Serialize};

use crate::modules::grid::{GRAZE_AMOUNT, ResourceGrid};
use crate::modules::walk::{Position, Roam};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sheep {
    pub position: Position,
    pub store: f64,
}

impl Sheep {
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            store: 0.0,
        }
    }

    /// Graze the occupied cell and bank whatever was actually taken.
    pub fn eat(&mut self, grid: &mut ResourceGrid) -> f64 {
        let taken = grid.consume(self.position.x, self.position.y, GRAZE_AMOUNT);
        self.store += taken;
        taken
    }

    /// Spend the whole store on a lamb at the same spot once `threshold` is met.
    pub fn reproduce(&mut self, threshold: f64) -> Option<Sheep> {
        if self.store < threshold {
            return None;
        }
        self.store = 0.0;
        Some(Sheep::new(self.position))
    }
}

impl Roam for Sheep {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Average the store of `flock[idx]` with every sheep within `radius`,
/// pair by pair in flock order, so later pairs see already averaged stores.
/// Returns how many pairs shared.
pub fn share_with_neighbours(flock: &mut [Sheep], idx: usize, radius: f64) -> usize {
    let mut shared = 0;
    for other in 0..flock.len() {
        if other == idx {
            continue;
        }
        if flock[idx].position.distance(flock[other].position) > radius {
            continue;
        }
        let mean = (flock[idx].store + flock[other].store) / 2.0;
        flock[idx].store = mean;
        flock[other].store = mean;
        shared += 1;
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheep_with(x: i32, y: i32, store: f64) -> Sheep {
        Sheep {
            position: Position::new(x, y),
            store,
        }
    }

    fn grid_with_cell(x: usize, y: usize, value: f64) -> ResourceGrid {
        let mut rows = vec![vec![0.0; 20]; 20];
        rows[y][x] = value;
        ResourceGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn eating_a_poor_cell_takes_everything_in_it() {
        let mut grid = grid_with_cell(5, 5, 4.0);
        let mut sheep = sheep_with(5, 5, 3.0);

        assert_eq!(sheep.eat(&mut grid), 4.0);
        assert_eq!(sheep.store, 7.0);
        assert_eq!(grid.read(5, 5), 0.0);
    }

    #[test]
    fn eating_a_rich_cell_takes_ten() {
        let mut grid = grid_with_cell(2, 3, 42.5);
        let mut sheep = sheep_with(2, 3, 0.0);

        let before = grid.read(2, 3);
        let taken = sheep.eat(&mut grid);
        assert_eq!(taken, GRAZE_AMOUNT);
        assert_eq!(before - grid.read(2, 3), sheep.store);
    }

    #[test]
    fn co_located_sheep_meet_in_the_middle() {
        let mut flock = vec![sheep_with(8, 8, 10.0), sheep_with(8, 8, 30.0)];
        assert_eq!(share_with_neighbours(&mut flock, 0, 5.0), 1);
        assert_eq!(flock[0].store, 20.0);
        assert_eq!(flock[1].store, 20.0);
    }

    #[test]
    fn sharing_conserves_the_pair_sum() {
        let mut flock = vec![sheep_with(10, 10, 7.25), sheep_with(13, 14, 91.5)];
        let before: f64 = flock.iter().map(|s| s.store).sum();
        share_with_neighbours(&mut flock, 1, 5.0);
        assert_eq!(flock[0].store, flock[1].store);
        assert_eq!(flock[0].store + flock[1].store, before);
    }

    #[test]
    fn distant_sheep_keep_their_stores() {
        let mut flock = vec![sheep_with(0, 0, 10.0), sheep_with(6, 0, 30.0)];
        assert_eq!(share_with_neighbours(&mut flock, 0, 5.0), 0);
        assert_eq!(flock[0].store, 10.0);
        assert_eq!(flock[1].store, 30.0);
    }

    #[test]
    fn sharing_is_sequential() {
        let mut flock = vec![
            sheep_with(0, 0, 0.0),
            sheep_with(1, 0, 40.0),
            sheep_with(0, 1, 80.0),
        ];
        share_with_neighbours(&mut flock, 0, 2.0);
        // (0 + 40) / 2 = 20, then (20 + 80) / 2 = 50.
        assert_eq!(flock[0].store, 50.0);
        assert_eq!(flock[1].store, 20.0);
        assert_eq!(flock[2].store, 50.0);
    }

    #[test]
    fn reproduction_fires_at_exact_threshold() {
        let mut sheep = sheep_with(12, 34, 100.0);
        let lamb = sheep.reproduce(100.0).expect("threshold reached");
        assert_eq!(sheep.store, 0.0);
        assert_eq!(lamb.position, Position::new(12, 34));
        assert_eq!(lamb.store, 0.0);
    }

    #[test]
    fn no_reproduction_below_threshold() {
        let mut sheep = sheep_with(1, 1, 99.5);
        assert!(sheep.reproduce(100.0).is_none());
        assert_eq!(sheep.store, 99.5);
    }
}
