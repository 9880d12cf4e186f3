use std::{error::Error, fs::File, io::Write, path::PathBuf};

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};

use kaleido_json::{deserialize_config, serialize_outcome, serde_json};
use kaleido_sim::Simulation;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Run a kaleidoscope simulation from a JSON configuration file.
#[derive(Parser)]
#[command(name = "run_kaleido_json")]
#[command(about = "Trace a kaleidoscope configuration and emit the pattern as JSON")]
struct Args {
    /// Path to the scene configuration JSON
    config: PathBuf,

    /// Number of primary rays to cast
    #[arg(long, default_value = "100")]
    num_rays: usize,

    /// Maximum reflections per ray
    #[arg(long, default_value = "10")]
    max_bounces: usize,

    /// Seed for the random source; omit for a nondeterministic run
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the result JSON (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Logging verbosity
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let config = deserialize_config(&serde_json::from_reader(File::open(&args.config)?)?)?;
    info!(
        "loaded configuration {:?}: {} mirrors, {} light sources",
        config.name,
        config.mirror_count,
        config.light_sources.len(),
    );

    let simulation = Simulation::new(config)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let outcome = simulation.run(args.num_rays, args.max_bounces, &mut rng)?;
    let performance = &outcome.performance;
    info!(
        "{} rays traced in {:.3}s, avg bounces {:.2}, quality {:.3}",
        performance.ray_count,
        performance.computation_time,
        performance.avg_bounces,
        performance.quality_score,
    );

    let json = serialize_outcome(&outcome);
    match &args.output {
        Some(path) => serde_json::to_writer_pretty(File::create(path)?, &json)?,
        None => {
            let stdout = std::io::stdout();
            let mut stdout = stdout.lock();
            serde_json::to_writer_pretty(&mut stdout, &json)?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
