use rand::Rng;
use rand::seq::SliceRandom;

use crate::modules::sheep::Sheep;
use crate::modules::walk::Position;
use crate::modules::wolf::Wolf;

/// Live sheep and wolves. Order is only meaningful within a tick.
#[derive(Clone, Debug, Default)]
pub struct Population {
    sheep: Vec<Sheep>,
    wolves: Vec<Wolf>,
}

impl Population {
    pub fn new(sheep: Vec<Sheep>, wolves: Vec<Wolf>) -> Self {
        Self { sheep, wolves }
    }

    /// Flock placed on `seeds` when given, otherwise uniformly at random;
    /// wolves always random. Seeds beyond `sheep` are ignored.
    pub fn populate<R: Rng + ?Sized>(
        sheep: usize,
        wolves: usize,
        seeds: Option<&[Position]>,
        rng: &mut R,
    ) -> Self {
        let flock = match seeds {
            Some(seeds) if seeds.len() >= sheep => {
                seeds.iter().take(sheep).copied().map(Sheep::new).collect()
            }
            _ => (0..sheep).map(|_| Sheep::new(Position::random(rng))).collect(),
        };
        let pack = (0..wolves)
            .map(|_| Wolf::new(Position::random(rng)))
            .collect();
        Self::new(flock, pack)
    }

    pub fn sheep(&self) -> &[Sheep] {
        &self.sheep
    }

    pub fn wolves(&self) -> &[Wolf] {
        &self.wolves
    }

    pub fn sheep_mut(&mut self) -> &mut [Sheep] {
        &mut self.sheep
    }

    /// Flock read-only alongside a mutable pack, for the hunting pass.
    pub fn hunting_view(&mut self) -> (&[Sheep], &mut [Wolf]) {
        (&self.sheep, &mut self.wolves)
    }

    pub fn sheep_count(&self) -> usize {
        self.sheep.len()
    }

    pub fn wolf_count(&self) -> usize {
        self.wolves.len()
    }

    /// Fresh, independent processing order for both kinds.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.sheep.shuffle(rng);
        self.wolves.shuffle(rng);
    }

    pub fn add_sheep(&mut self, sheep: Sheep) {
        self.sheep.push(sheep);
    }

    pub fn add_wolf(&mut self, wolf: Wolf) {
        self.wolves.push(wolf);
    }

    /// Drop every listed sheep exactly once. Indices refer to the flock as it
    /// stood when they were collected; duplicates collapse and removal runs
    /// from the highest index down so pending indices stay valid.
    pub fn remove_sheep(&mut self, mut indices: Vec<usize>) -> usize {
        indices.sort_unstable();
        indices.dedup();
        for &idx in indices.iter().rev() {
            assert!(
                idx < self.sheep.len(),
                "stale prey index {} for flock of {}",
                idx,
                self.sheep.len()
            );
            self.sheep.remove(idx);
        }
        indices.len()
    }
}
