pub mod modules;

pub use modules::config::{BirthPolicy, SimConfig, SimParameters};
pub use modules::error::{ConfigError, GridError, SeedError};
pub use modules::grid::{GRAZE_AMOUNT, ResourceGrid};
pub use modules::population::Population;
pub use modules::scheduler::{Event, Simulation, TickResult};
pub use modules::seed::{DEFAULT_SEED_URL, Placement, SeedClient, parse_seed_page, place_flock};
pub use modules::sheep::{Sheep, share_with_neighbours};
pub use modules::state::{self, RuntimeState, Status};
pub use modules::view::{
    Snapshot, load_snapshot, pasture_dir, save_snapshot, snapshot_file_path,
};
pub use modules::walk::{BoundaryRule, DOMAIN_MAX, DOMAIN_MIN, Position, Roam};
pub use modules::wolf::{STRIKE_RANGE_SQUARED, Wolf};
