use std::fs;
use std::path::Path;

use clap::ValueEnum;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::modules::error::ConfigError;
use crate::modules::walk::BoundaryRule;

/// Whether lambs born during the grazing pass graze in that same tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BirthPolicy {
    /// The pass covers the flock as it stood when the tick began. Lambs join
    /// the flock at once (they share and can be hunted) but first act next tick.
    #[default]
    NextTick,
    /// The pass runs until it catches up with the growing flock.
    SameTick,
}

/// Parameters as a user supplies them. Signs are not trusted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParameters {
    pub num_of_sheep: i64,
    pub num_of_wolves: i64,
    pub neighbourhood: i64,
    pub num_of_iterations: i64,
    pub wolf_threshold: i64,
    pub sheep_threshold: i64,
}

impl Default for SimParameters {
    fn default() -> Self {
        Self {
            num_of_sheep: 10,
            num_of_wolves: 5,
            neighbourhood: 5,
            num_of_iterations: 50,
            wolf_threshold: 1,
            sheep_threshold: 100,
        }
    }
}

impl SimParameters {
    /// Read a JSON parameter file; absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Take absolute values and narrow into a run configuration.
    pub fn normalize(&self) -> Result<SimConfig, ConfigError> {
        Ok(SimConfig {
            num_of_sheep: magnitude("num_of_sheep", self.num_of_sheep)?,
            num_of_wolves: magnitude("num_of_wolves", self.num_of_wolves)?,
            neighbourhood: magnitude("neighbourhood", self.neighbourhood)?,
            num_of_iterations: self.num_of_iterations.unsigned_abs(),
            wolf_threshold: magnitude("wolf_threshold", self.wolf_threshold)?,
            sheep_threshold: magnitude("sheep_threshold", self.sheep_threshold)?,
            rng_seed: None,
            boundary: BoundaryRule::default(),
            births: BirthPolicy::default(),
        })
    }
}

fn magnitude<T: TryFrom<u64>>(field: &'static str, value: i64) -> Result<T, ConfigError> {
    T::try_from(value.unsigned_abs()).map_err(|_| ConfigError::OutOfRange { field, value })
}

/// Immutable settings for one run, handed to the scheduler at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub num_of_sheep: usize,
    pub num_of_wolves: usize,
    pub neighbourhood: u32,
    pub num_of_iterations: u64,
    pub wolf_threshold: u32,
    pub sheep_threshold: u32,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub boundary: BoundaryRule,
    #[serde(default)]
    pub births: BirthPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_of_sheep: 10,
            num_of_wolves: 5,
            neighbourhood: 5,
            num_of_iterations: 50,
            wolf_threshold: 1,
            sheep_threshold: 100,
            rng_seed: None,
            boundary: BoundaryRule::default(),
            births: BirthPolicy::default(),
        }
    }
}

impl SimConfig {
    pub fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryRule) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_births(mut self, births: BirthPolicy) -> Self {
        self.births = births;
        self
    }

    /// A zero threshold breeds every agent every tick, doubling the population.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wolf_threshold == 0 {
            return Err(ConfigError::ZeroThreshold {
                field: "wolf_threshold",
            });
        }
        if self.sheep_threshold == 0 {
            return Err(ConfigError::ZeroThreshold {
                field: "sheep_threshold",
            });
        }
        Ok(())
    }

    /// One random source for the whole run: seeded when `rng_seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn neighbourhood_radius(&self) -> f64 {
        f64::from(self.neighbourhood)
    }

    pub fn sheep_threshold_store(&self) -> f64 {
        f64::from(self.sheep_threshold)
    }
}
