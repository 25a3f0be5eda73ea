use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use pasture::{
    BirthPolicy, BoundaryRule, DEFAULT_SEED_URL, Event, Placement, Population, ResourceGrid,
    SeedClient, SimConfig, SimParameters, Simulation, Snapshot, TickResult, pasture_dir,
    place_flock, save_snapshot,
    state::{self, Status},
};
use tracing::{info, warn};

mod view;

use view::{run_status, run_view};

#[derive(Parser)]
#[command(
    name = "pasture",
    version,
    about = "Sheep graze, wolves hunt: a predator-prey pasture simulation",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the simulation for the configured number of iterations
    Run {
        /// Initial number of sheep
        #[arg(long, allow_negative_numbers = true)]
        sheep: Option<i64>,
        /// Initial number of wolves
        #[arg(long, allow_negative_numbers = true)]
        wolves: Option<i64>,
        /// Distance within which sheep share their stores
        #[arg(long, allow_negative_numbers = true)]
        neighbourhood: Option<i64>,
        /// Number of ticks to run
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        iterations: Option<i64>,
        /// Kills a wolf needs before it breeds
        #[arg(long, allow_negative_numbers = true)]
        wolf_threshold: Option<i64>,
        /// Store a sheep needs before it breeds
        #[arg(long, allow_negative_numbers = true)]
        sheep_threshold: Option<i64>,
        /// JSON file with any of the six parameters (flags take precedence)
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,
        /// Comma-separated resource grid
        #[arg(short = 'g', long, default_value = "in.txt")]
        grid: PathBuf,
        /// Seed for every random decision, for reproducible runs
        #[arg(long)]
        rng_seed: Option<u64>,
        /// Edge behaviour of the random walk
        #[arg(long, default_value_t = BoundaryRule::Reflect, value_enum)]
        boundary: BoundaryRule,
        /// When lambs born mid-tick first act
        #[arg(long, default_value_t = BirthPolicy::NextTick, value_enum)]
        births: BirthPolicy,
        /// Page listing starting cells for the flock
        #[arg(long, default_value = DEFAULT_SEED_URL)]
        seed_url: String,
        /// Skip the seed page and place the flock randomly
        #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
        no_fetch: bool,
        /// Seed page timeout in ms
        #[arg(long, default_value_t = 5_000)]
        seed_timeout_ms: u64,
        /// Delay between ticks in milliseconds
        #[arg(short = 'd', long, default_value_t = 0)]
        delay_ms: u64,
        /// Only print the final legend
        #[arg(short = 'q', long, action = ArgAction::SetTrue, default_value_t = false)]
        quiet: bool,
        /// Print births and kills for every tick
        #[arg(short = 'v', long, action = ArgAction::SetTrue, default_value_t = false)]
        verbose: bool,
    },
    /// Show the status of the last run
    Status,
    /// Summarize the latest snapshot
    View {
        /// Print the snapshot JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

/// Parameter flags as given; `None` leaves the file or default value.
struct ParameterFlags {
    sheep: Option<i64>,
    wolves: Option<i64>,
    neighbourhood: Option<i64>,
    iterations: Option<i64>,
    wolf_threshold: Option<i64>,
    sheep_threshold: Option<i64>,
}

impl ParameterFlags {
    fn apply(self, params: &mut SimParameters) {
        let overrides = [
            (self.sheep, &mut params.num_of_sheep),
            (self.wolves, &mut params.num_of_wolves),
            (self.neighbourhood, &mut params.neighbourhood),
            (self.iterations, &mut params.num_of_iterations),
            (self.wolf_threshold, &mut params.wolf_threshold),
            (self.sheep_threshold, &mut params.sheep_threshold),
        ];
        for (flag, slot) in overrides {
            if let Some(value) = flag {
                *slot = value;
            }
        }
    }
}

struct RunOptions {
    params: Option<PathBuf>,
    grid: PathBuf,
    rng_seed: Option<u64>,
    boundary: BoundaryRule,
    births: BirthPolicy,
    seed_url: Option<String>,
    seed_timeout: Duration,
    delay: Duration,
    quiet: bool,
    verbose: bool,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<(), String> {
    match command {
        Command::Run {
            sheep,
            wolves,
            neighbourhood,
            iterations,
            wolf_threshold,
            sheep_threshold,
            params,
            grid,
            rng_seed,
            boundary,
            births,
            seed_url,
            no_fetch,
            seed_timeout_ms,
            delay_ms,
            quiet,
            verbose,
        } => run_simulation(
            ParameterFlags {
                sheep,
                wolves,
                neighbourhood,
                iterations,
                wolf_threshold,
                sheep_threshold,
            },
            RunOptions {
                params,
                grid,
                rng_seed,
                boundary,
                births,
                seed_url: (!no_fetch).then_some(seed_url),
                seed_timeout: Duration::from_millis(seed_timeout_ms),
                delay: Duration::from_millis(delay_ms),
                quiet,
                verbose,
            },
        ),
        Command::Status => run_status(),
        Command::View { json } => run_view(json),
    }
}

fn run_simulation(flags: ParameterFlags, options: RunOptions) -> Result<(), String> {
    let config = build_config(flags, &options).map_err(record_abort)?;
    let grid = ResourceGrid::load(&options.grid)
        .map_err(|e| record_abort(format!("grid {}: {}", options.grid.display(), e)))?;
    info!(
        path = %options.grid.display(),
        width = grid.width(),
        height = grid.height(),
        total = grid.total(),
        "loaded resource grid"
    );

    let mut rng = config.rng();

    let client = match options.seed_url.as_deref() {
        Some(url) => match SeedClient::new(url, options.seed_timeout) {
            Ok(client) => Some(client),
            Err(err) => {
                warn!(error = %err, "could not build seed client");
                None
            }
        },
        None => None,
    };
    let (cells, placement) = place_flock(client.as_ref(), config.num_of_sheep, &mut rng);
    if placement == Placement::Random && client.is_some() && config.num_of_sheep > 0 {
        println!(
            "Unable to retrieve initial sheep starting locations. Scenario will be initialised with random data."
        );
    }

    let population = Population::populate(
        config.num_of_sheep,
        config.num_of_wolves,
        Some(&cells),
        &mut rng,
    );
    let mut sim = Simulation::with_rng(config, grid, population, rng);

    info!(
        sheep = sim.population().sheep_count(),
        wolves = sim.population().wolf_count(),
        iterations = sim.config().num_of_iterations,
        placement = ?placement,
        "starting run"
    );
    state::set_status(Status::Running, 0, Some("simulation running".into()))
        .map_err(|e| e.to_string())?;

    let mut last = sim.snapshot();
    while !sim.is_finished() {
        let tick = sim.step();
        let snapshot = sim.snapshot();
        if !options.quiet {
            print_tick(&tick, &snapshot, options.verbose);
        }
        persist_snapshot(&snapshot);
        state::set_status(
            Status::Running,
            sim.tick(),
            Some("simulation running".into()),
        )
        .map_err(|e| e.to_string())?;
        last = snapshot;

        if options.delay > Duration::ZERO && !sim.is_finished() {
            std::thread::sleep(options.delay);
        }
    }

    if sim.tick() == 0 {
        persist_snapshot(&last);
    }
    if options.quiet {
        println!("{}", last.legend());
    }
    state::set_status(
        Status::Completed,
        sim.tick(),
        Some(format!("completed {} iteration(s)", sim.tick())),
    )
    .map_err(|e| e.to_string())?;
    info!(
        ticks = sim.tick(),
        sheep = last.sheep_count,
        wolves = last.wolf_count,
        "run finished"
    );

    Ok(())
}

fn build_config(flags: ParameterFlags, options: &RunOptions) -> Result<SimConfig, String> {
    let mut params = match &options.params {
        Some(path) => SimParameters::load(path).map_err(|e| e.to_string())?,
        None => SimParameters::default(),
    };
    flags.apply(&mut params);

    let config = params
        .normalize()
        .map_err(|e| e.to_string())?
        .with_rng_seed(options.rng_seed)
        .with_boundary(options.boundary)
        .with_births(options.births);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Record the run as aborted before it started, passing the message through.
fn record_abort(message: String) -> String {
    record_abort_in(&pasture_dir(), message)
}

fn record_abort_in(dir: &Path, message: String) -> String {
    if let Err(err) = state::set_status_in(dir, Status::Aborted, 0, Some(message.clone())) {
        warn!(error = %err, "failed to record aborted run");
    }
    message
}

fn persist_snapshot(snapshot: &Snapshot) {
    if let Err(err) = save_snapshot(snapshot) {
        eprintln!("warning: failed to write snapshot: {}", err);
    }
}

fn print_tick(tick: &TickResult, snapshot: &Snapshot, verbose: bool) {
    println!("{}", snapshot.legend());
    if !verbose {
        return;
    }
    println!(
        " grazed={:.1} | lambs={} | pups={} | sheep_lost={}",
        tick.grazed, tick.lambs, tick.pups, tick.sheep_lost
    );
    for event in &tick.events {
        if let Some(line) = describe_event(event) {
            println!(" - {}", line);
        }
    }
}

fn describe_event(event: &Event) -> Option<String> {
    match event {
        Event::TickStarted { .. } | Event::TickCompleted { .. } => None,
        Event::LambBorn { position } => Some(format!("lamb born at {}", position)),
        Event::PupBorn { position } => Some(format!("pup born at {}", position)),
        Event::SheepTaken { wolf, prey } => {
            Some(format!("wolf at {} took the sheep at {}", wolf, prey))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_negative_parameters() {
        let cli = Cli::try_parse_from([
            "pasture",
            "run",
            "--sheep",
            "-12",
            "--iterations",
            "-3",
            "--no-fetch",
            "--boundary",
            "legacy",
            "--births",
            "same-tick",
        ])
        .unwrap();
        let Command::Run {
            sheep,
            iterations,
            no_fetch,
            boundary,
            births,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(sheep, Some(-12));
        assert_eq!(iterations, Some(-3));
        assert!(no_fetch);
        assert_eq!(boundary, BoundaryRule::Legacy);
        assert_eq!(births, BirthPolicy::SameTick);
    }

    #[test]
    fn non_integer_parameter_is_rejected() {
        assert!(Cli::try_parse_from(["pasture", "run", "--wolves", "three"]).is_err());
    }

    #[test]
    fn flags_override_parameter_file_values() {
        let mut params = SimParameters {
            num_of_sheep: 40,
            ..SimParameters::default()
        };
        ParameterFlags {
            sheep: None,
            wolves: Some(-9),
            neighbourhood: None,
            iterations: Some(7),
            wolf_threshold: None,
            sheep_threshold: None,
        }
        .apply(&mut params);
        assert_eq!(params.num_of_sheep, 40);
        assert_eq!(params.num_of_wolves, -9);
        assert_eq!(params.num_of_iterations, 7);

        let config = params.normalize().unwrap();
        assert_eq!(config.num_of_wolves, 9);
    }

    fn options() -> RunOptions {
        RunOptions {
            params: None,
            grid: PathBuf::from("in.txt"),
            rng_seed: None,
            boundary: BoundaryRule::Reflect,
            births: BirthPolicy::NextTick,
            seed_url: None,
            seed_timeout: Duration::from_millis(10),
            delay: Duration::ZERO,
            quiet: true,
            verbose: false,
        }
    }

    fn no_flags() -> ParameterFlags {
        ParameterFlags {
            sheep: None,
            wolves: None,
            neighbourhood: None,
            iterations: None,
            wolf_threshold: None,
            sheep_threshold: None,
        }
    }

    #[test]
    fn zero_threshold_flag_fails_before_the_run() {
        let flags = ParameterFlags {
            wolf_threshold: Some(0),
            ..no_flags()
        };
        let err = build_config(flags, &options()).unwrap_err();
        assert!(err.contains("wolf_threshold"));
    }

    #[test]
    fn unreadable_params_file_fails_config() {
        let dir = tempfile::tempdir().unwrap();
        let opts = RunOptions {
            params: Some(dir.path().join("missing.json")),
            ..options()
        };
        assert!(build_config(no_flags(), &opts).is_err());
    }

    #[test]
    fn config_failure_records_aborted_status() {
        let dir = tempfile::tempdir().unwrap();
        let message = record_abort_in(dir.path(), "sheep_threshold must be at least 1".into());
        assert_eq!(message, "sheep_threshold must be at least 1");

        let recorded = state::load_state_in(dir.path()).unwrap().unwrap();
        assert_eq!(recorded.status, Status::Aborted);
        assert_eq!(recorded.last_tick, 0);
        assert_eq!(recorded.message.as_deref(), Some(message.as_str()));
    }
}
