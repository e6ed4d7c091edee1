use ballpit_core::{AdvanceReport, Bounds, SimConfig, Simulation};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "ballpit")]
#[command(about = "Ballpit - bouncing bodies in a box, run headless", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and report the final state
    Run {
        /// JSON config file; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Arena width
        #[arg(long, default_value_t = 800.0)]
        width: f64,

        /// Arena height
        #[arg(long, default_value_t = 600.0)]
        height: f64,

        /// Seed for the random source, overrides the config file
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated time to run, in milliseconds
        #[arg(long, default_value_t = 10_000, conflicts_with = "ticks")]
        duration_ms: u64,

        /// Run exactly this many simulation ticks instead of a duration
        #[arg(long)]
        ticks: Option<u64>,

        /// Pace the run against the wall clock instead of running flat out
        #[arg(long)]
        realtime: bool,

        /// Print final body states as JSON
        #[arg(long)]
        json: bool,
    },
}

struct RunOptions {
    config: Option<PathBuf>,
    width: f64,
    height: f64,
    seed: Option<u64>,
    duration: Duration,
    ticks: Option<u64>,
    realtime: bool,
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            width,
            height,
            seed,
            duration_ms,
            ticks,
            realtime,
            json,
        } => {
            let options = RunOptions {
                config,
                width,
                height,
                seed,
                duration: Duration::from_millis(duration_ms),
                ticks,
                realtime,
                json,
            };
            if let Err(e) = run(&options) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(options: &RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &options.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            SimConfig::load(path)?
        }
        None => SimConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    let bounds = Bounds::new(options.width, options.height)?;
    let mut sim = Simulation::new(&config, bounds)?;

    let totals = if options.realtime {
        drive_realtime(&mut sim, options)
    } else {
        drive_virtual(&mut sim, &config, options)
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&sim.body_states())?);
    } else {
        println!(
            "ticks = {}, bodies = {}, collisions = {}, degenerate = {}, dropped = {}, elapsed = {:?}",
            sim.tick_count(),
            sim.arena().len(),
            totals.step.collisions,
            totals.step.degenerate,
            sim.scheduler().dropped(),
            sim.scheduler().clock()
        );
    }

    Ok(())
}

/// Advance without overshooting `--ticks` when a late call has catch-up work
fn step_clock(sim: &mut Simulation, elapsed: Duration, options: &RunOptions) -> AdvanceReport {
    match options.ticks {
        Some(n) => sim.advance_until(elapsed, n),
        None => sim.advance(elapsed),
    }
}

fn done(sim: &Simulation, options: &RunOptions) -> bool {
    match options.ticks {
        Some(n) => sim.tick_count() >= n,
        None => sim.scheduler().clock() >= options.duration,
    }
}

/// Feed the scheduler one tick period at a time without sleeping
fn drive_virtual(sim: &mut Simulation, config: &SimConfig, options: &RunOptions) -> AdvanceReport {
    let mut totals = AdvanceReport::default();
    let frame = config.tick_interval();
    while !done(sim, options) {
        totals.merge(step_clock(sim, frame, options));
    }
    totals
}

/// Sleep until the next activity is due, then report the real elapsed time
fn drive_realtime(sim: &mut Simulation, options: &RunOptions) -> AdvanceReport {
    let mut totals = AdvanceReport::default();
    let mut last = Instant::now();
    while !done(sim, options) {
        thread::sleep(sim.scheduler().until_next());
        let now = Instant::now();
        totals.merge(step_clock(sim, now - last, options));
        last = now;
    }
    totals
}
