//! Training environment for ant evolution
//!
//! Main training loop with progress reporting and checkpointing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use antsim_brain::Network;
use antsim_core::{GenerationStats, SimulationConfig, SimulationState};
use indicatif::{ProgressBar, ProgressStyle};

use super::report::RunSummary;

/// Configuration for the training run
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Number of generations to run
    pub generations: u32,
    /// How often to save checkpoints (every N generations, 0 = never)
    pub checkpoint_interval: u32,
    /// Output directory for checkpoints and the run summary
    pub output_dir: PathBuf,
    /// Network to warm start from; a missing file means a random start
    pub load_path: Option<PathBuf>,
    /// Where to write the final champion (default: `<output_dir>/best.weights`)
    pub save_path: Option<PathBuf>,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            checkpoint_interval: 10,
            output_dir: PathBuf::from("training_output"),
            load_path: None,
            save_path: None,
            show_progress: true,
        }
    }
}

/// Best ranked ant over every finished generation
#[derive(Debug, Clone)]
pub struct Champion {
    pub generation: u32,
    pub reward: f64,
    pub network: Network,
}

/// Main training environment
pub struct TrainingEnv {
    /// Training configuration
    pub config: TrainingConfig,
    state: SimulationState,
    champion: Option<Champion>,
}

impl TrainingEnv {
    pub fn new(config: TrainingConfig, simulation: SimulationConfig) -> Result<Self> {
        let warm_start = match &config.load_path {
            Some(path) => antsim_brain::load_if_exists(simulation.layers(), path)
                .with_context(|| format!("Failed to load network from {}", path.display()))?,
            None => None,
        };
        let state = match warm_start {
            Some(network) => {
                log::info!("Warm starting from {}", network);
                SimulationState::with_network(simulation, network)
            }
            None => SimulationState::new(simulation),
        }
        .context("Failed to create simulation")?;

        Ok(Self {
            config,
            state,
            champion: None,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }

    /// Create a progress bar style
    fn progress_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }

    /// Run every configured generation and write the results
    pub fn run(&mut self) -> Result<RunSummary> {
        let started_at = chrono::Utc::now();

        let pb = if self.config.show_progress {
            ProgressBar::new(u64::from(self.config.generations))
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(Self::progress_style());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let sim = self.state.config();
        pb.println(format!(
            "Starting training: {} generations, {} ants, {} ticks per generation, seed {}",
            self.config.generations,
            sim.population_size,
            sim.generation_ticks,
            self.state.seed()
        ));

        std::fs::create_dir_all(&self.config.output_dir)
            .context("Failed to create output directory")?;

        for _ in 0..self.config.generations {
            let stats = self.run_generation()?;
            pb.println(format!(
                "Gen {:4}: best {:8.4}, mean {:8.4}, alive {}, collisions {}",
                stats.generation,
                stats.best_reward,
                stats.mean_reward,
                stats.alive,
                stats.total_collisions
            ));
            pb.inc(1);

            let finished = stats.generation + 1;
            if self.config.checkpoint_interval > 0
                && finished % self.config.checkpoint_interval == 0
            {
                self.save_checkpoint(&pb)?;
            }
        }

        let save_path = self
            .config
            .save_path
            .clone()
            .unwrap_or_else(|| self.config.output_dir.join("best.weights"));
        if let Some(champion) = &self.champion {
            save_network(&champion.network, &save_path)?;
            pb.println(format!(
                "Saved champion from generation {} (reward {:.4}) to {}",
                champion.generation,
                champion.reward,
                save_path.display()
            ));
        }

        let summary = RunSummary::new(started_at, &self.state, self.champion.as_ref());
        let summary_path = summary.write(&self.config.output_dir)?;
        pb.finish_with_message("Training complete!");
        log::info!("Run summary written to {}", summary_path.display());

        Ok(summary)
    }

    /// Tick through one generation and keep its best ant if it beats the champion
    fn run_generation(&mut self) -> Result<GenerationStats> {
        let stats = self
            .state
            .run_generation()
            .context("Simulation step failed")?;
        self.record_champion();
        Ok(stats)
    }

    fn record_champion(&mut self) {
        let Some(best) = self.state.last_best() else {
            return;
        };
        let improved = self
            .champion
            .as_ref()
            .is_none_or(|champion| best.reward > champion.reward);
        if improved {
            self.champion = Some(Champion {
                generation: best.generation,
                reward: best.reward,
                network: best.network.clone(),
            });
        }
    }

    /// Save a checkpoint
    fn save_checkpoint(&self, pb: &ProgressBar) -> Result<()> {
        let Some(champion) = &self.champion else {
            return Ok(());
        };
        let checkpoint_dir = self.config.output_dir.join("checkpoints");
        std::fs::create_dir_all(&checkpoint_dir)
            .context("Failed to create checkpoint directory")?;

        let path = checkpoint_dir.join(format!("gen_{:04}_best.weights", self.state.generation()));
        save_network(&champion.network, &path)?;

        pb.println(format!(
            "Saved checkpoint at generation {}",
            self.state.generation()
        ));
        Ok(())
    }
}

fn save_network(network: &Network, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    network
        .save_to_file(path)
        .with_context(|| format!("Failed to write network to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_simulation() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.population_size = 10;
        config.generation_ticks = 15;
        config.evolution.tournament_size = 3;
        config.seed = Some(21);
        config
    }

    fn tiny_training(dir: &Path) -> TrainingConfig {
        TrainingConfig {
            generations: 4,
            checkpoint_interval: 2,
            output_dir: dir.to_path_buf(),
            show_progress: false,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.generations, 100);
        assert_eq!(config.checkpoint_interval, 10);
        assert!(config.load_path.is_none());
    }

    #[test]
    fn test_training_env_creation() {
        let dir = tempfile::tempdir().unwrap();
        let env = TrainingEnv::new(tiny_training(dir.path()), tiny_simulation()).unwrap();
        assert_eq!(env.state().generation(), 0);
        assert!(env.state().history().is_empty());
        assert!(env.champion().is_none());
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = TrainingEnv::new(tiny_training(dir.path()), tiny_simulation()).unwrap();
        let summary = env.run().unwrap();

        assert_eq!(summary.generations.len(), 4);
        assert_eq!(env.state().generation(), 4);
        assert!(dir.path().join("best.weights").exists());
        assert!(dir.path().join("summary.ron").exists());
        assert!(dir.path().join("checkpoints/gen_0002_best.weights").exists());
        assert!(dir.path().join("checkpoints/gen_0004_best.weights").exists());

        let champion = env.champion().unwrap();
        let saved =
            antsim_brain::load_from_file(tiny_simulation().layers(), dir.path().join("best.weights"))
                .unwrap();
        assert_eq!(saved, champion.network);
    }

    #[test]
    fn test_champion_matches_ranked_best() {
        let dir = tempfile::tempdir().unwrap();
        let training = TrainingConfig {
            generations: 1,
            ..tiny_training(dir.path())
        };
        let mut env = TrainingEnv::new(training, tiny_simulation()).unwrap();
        let summary = env.run().unwrap();

        let champion = env.champion().unwrap();
        assert_eq!(champion.generation, 0);
        assert_eq!(champion.reward, summary.generations[0].best_reward);
        assert_eq!(summary.champion_reward, Some(summary.generations[0].best_reward));
    }

    #[test]
    fn test_champion_is_best_over_all_generations() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = TrainingEnv::new(tiny_training(dir.path()), tiny_simulation()).unwrap();
        let summary = env.run().unwrap();

        let champion = env.champion().unwrap();
        assert_eq!(Some(champion.reward), summary.best_reward());
        let generation = &summary.generations[champion.generation as usize];
        assert_eq!(generation.best_reward, champion.reward);
    }

    #[test]
    fn test_warm_start_from_saved_network() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = TrainingEnv::new(tiny_training(dir.path()), tiny_simulation()).unwrap();
        first.run().unwrap();
        let champion = first.champion().unwrap().network.clone();

        let training = TrainingConfig {
            load_path: Some(dir.path().join("best.weights")),
            ..tiny_training(dir.path())
        };
        let second = TrainingEnv::new(training, tiny_simulation()).unwrap();
        assert_eq!(second.state().population().ants()[0].network, champion);
    }

    #[test]
    fn test_missing_load_path_starts_random() {
        let dir = tempfile::tempdir().unwrap();
        let training = TrainingConfig {
            load_path: Some(dir.path().join("nothing.weights")),
            ..tiny_training(dir.path())
        };
        let env = TrainingEnv::new(training, tiny_simulation()).unwrap();
        assert_eq!(env.state().population().len(), 10);
    }
}
