use rand::rngs::StdRng;
use tracing::debug;

use crate::modules::config::{BirthPolicy, SimConfig};
use crate::modules::grid::ResourceGrid;
use crate::modules::population::Population;
use crate::modules::sheep::share_with_neighbours;
use crate::modules::view::Snapshot;
use crate::modules::walk::{Position, Roam};

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    TickStarted { tick: u64 },
    LambBorn { position: Position },
    PupBorn { position: Position },
    SheepTaken { wolf: Position, prey: Position },
    TickCompleted { tick: u64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickResult {
    /// 1-based number of the tick just run.
    pub tick: u64,
    pub events: Vec<Event>,
    pub grazed: f64,
    pub lambs: usize,
    pub pups: usize,
    /// Distinct sheep removed; two wolves on one sheep count once.
    pub sheep_lost: usize,
}

/// Owns every piece of mutable run state and advances it one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    grid: ResourceGrid,
    population: Population,
    tick: u64,
    rng: StdRng,
}

impl Simulation {
    /// Random source seeded from `config.rng_seed`, or from entropy without one.
    pub fn new(config: SimConfig, grid: ResourceGrid, population: Population) -> Self {
        let rng = config.rng();
        Self::with_rng(config, grid, population, rng)
    }

    pub fn with_rng(
        config: SimConfig,
        grid: ResourceGrid,
        population: Population,
        rng: StdRng,
    ) -> Self {
        Self {
            config,
            grid,
            population,
            tick: 0,
            rng,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &ResourceGrid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.config.num_of_iterations
    }

    pub fn step(&mut self) -> TickResult {
        let tick = self.tick + 1;
        let mut events = vec![Event::TickStarted { tick }];

        self.population.shuffle(&mut self.rng);

        let (grazed, lambs) = self.graze_pass(&mut events);
        let (prey, pups) = self.hunt_pass(&mut events);
        let sheep_lost = self.population.remove_sheep(prey);

        events.push(Event::TickCompleted { tick });
        self.tick = tick;

        debug!(
            tick,
            grazed,
            lambs,
            pups,
            sheep_lost,
            sheep = self.population.sheep_count(),
            wolves = self.population.wolf_count(),
            "tick completed"
        );

        TickResult {
            tick,
            events,
            grazed,
            lambs,
            pups,
            sheep_lost,
        }
    }

    /// Run every remaining tick, handing each result and snapshot to `observe`.
    pub fn run<F>(&mut self, mut observe: F)
    where
        F: FnMut(&TickResult, &Snapshot),
    {
        while !self.is_finished() {
            let result = self.step();
            let snapshot = self.snapshot();
            observe(&result, &snapshot);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            iteration: self.tick,
            sheep: self.population.sheep().iter().map(|s| s.position).collect(),
            wolves: self.population.wolves().iter().map(|w| w.position).collect(),
            sheep_count: self.population.sheep_count(),
            wolf_count: self.population.wolf_count(),
            grid: self.grid.rows(),
        }
    }

    fn graze_pass(&mut self, events: &mut Vec<Event>) -> (f64, usize) {
        let boundary = self.config.boundary;
        let radius = self.config.neighbourhood_radius();
        let threshold = self.config.sheep_threshold_store();
        let flock_at_start = self.population.sheep_count();

        let mut grazed = 0.0;
        let mut lambs = 0;
        let mut idx = 0;
        loop {
            let bound = match self.config.births {
                BirthPolicy::NextTick => flock_at_start,
                BirthPolicy::SameTick => self.population.sheep_count(),
            };
            if idx >= bound {
                break;
            }

            let flock = self.population.sheep_mut();
            flock[idx].wander(boundary, &mut self.rng);
            grazed += flock[idx].eat(&mut self.grid);
            share_with_neighbours(flock, idx, radius);
            if let Some(lamb) = flock[idx].reproduce(threshold) {
                events.push(Event::LambBorn {
                    position: lamb.position,
                });
                self.population.add_sheep(lamb);
                lambs += 1;
            }
            idx += 1;
        }

        (grazed, lambs)
    }

    // Pups always wait for the next tick: a pup hunting the same not yet
    // removed sheep as its parent could otherwise breed without bound.
    fn hunt_pass(&mut self, events: &mut Vec<Event>) -> (Vec<usize>, usize) {
        let boundary = self.config.boundary;
        let threshold = self.config.wolf_threshold;
        let pack_at_start = self.population.wolf_count();

        let mut prey = Vec::new();
        let mut pups = 0;
        for idx in 0..pack_at_start {
            let pup = {
                let (flock, pack) = self.population.hunting_view();
                let wolf = &mut pack[idx];
                wolf.wander(boundary, &mut self.rng);
                if let Some(target) = wolf.hunt(flock) {
                    events.push(Event::SheepTaken {
                        wolf: wolf.position,
                        prey: flock[target].position,
                    });
                    prey.push(target);
                }
                wolf.reproduce(threshold)
            };
            if let Some(pup) = pup {
                events.push(Event::PupBorn {
                    position: pup.position,
                });
                self.population.add_wolf(pup);
                pups += 1;
            }
        }

        (prey, pups)
    }
}
