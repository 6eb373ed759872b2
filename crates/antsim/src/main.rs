use std::path::PathBuf;

use antsim::headless::{TrainingConfig, TrainingEnv};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of generations to train
    #[arg(long, default_value = "100")]
    generations: u32,

    /// Ants per generation (overrides the config file)
    #[arg(long)]
    population: Option<usize>,

    /// Ticks per generation (overrides the config file)
    #[arg(long)]
    ticks: Option<u32>,

    /// Seed for the master RNG (random when unset)
    #[arg(long)]
    seed: Option<u64>,

    /// RON config file (default: antsim.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Warm start from a saved network; a missing file starts from random weights
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where to save the best network (default: <output>/best.weights)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Save a checkpoint every N generations (0 disables checkpoints)
    #[arg(long, default_value = "10")]
    checkpoint_every: u32,

    /// Output directory for checkpoints and the run summary
    #[arg(long, default_value = "training_output")]
    output: PathBuf,

    /// Disable the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut simulation = antsim::config::load(args.config.as_deref())?;
    // Command-line flags override every config layer
    if let Some(population) = args.population {
        simulation.population_size = population;
    }
    if let Some(ticks) = args.ticks {
        simulation.generation_ticks = ticks;
    }
    if args.seed.is_some() {
        simulation.seed = args.seed;
    }

    log::info!("Starting headless evolution training");
    log::info!("  Generations: {}", args.generations);
    log::info!("  Population: {}", simulation.population_size);
    log::info!("  Ticks per generation: {}", simulation.generation_ticks);
    log::info!("  Output: {}", args.output.display());

    let training = TrainingConfig {
        generations: args.generations,
        checkpoint_interval: args.checkpoint_every,
        output_dir: args.output,
        load_path: args.load,
        save_path: args.save,
        show_progress: !args.quiet,
    };

    let mut env = TrainingEnv::new(training, simulation)?;
    let summary = env.run()?;
    if let Some(best) = summary.best_reward() {
        log::info!(
            "Best reward over {} generations: {:.4}",
            summary.generations.len(),
            best
        );
    }
    Ok(())
}
