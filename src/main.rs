use anyhow::{Context, Result};
use clap::Parser;
use sugarscape_core::config::AppConfig;
use sugarscape_core::{init_logging, Metrics, Simulation};
use sugarscape_lib::report;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured maximum cycle count
    #[arg(long)]
    max_cycle: Option<u64>,

    /// Print the final state as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Also dump every cell of the final environment
    #[arg(long)]
    cells: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let content = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config))?;
    let mut config = AppConfig::from_toml(&content)?;
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(max_cycle) = args.max_cycle {
        config.simulation.max_cycle = max_cycle;
    }

    let metrics = Metrics::new();
    let mut sim = Simulation::from_config(&config)?;
    sim.start();
    loop {
        let started = std::time::Instant::now();
        if !sim.advance()? {
            break;
        }
        metrics.record_cycle(
            started.elapsed(),
            sim.population().len(),
            sim.population().dead_count(),
        );
    }
    tracing::info!(
        cycles = metrics.cycle_count(),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        "experiment finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report::run_summary(&sim))?);
    } else {
        if args.cells {
            print!("{}", report::environment_report(&sim));
        }
        print!("{}", report::population_report(&sim));
    }
    Ok(())
}
