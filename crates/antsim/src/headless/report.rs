//! Run summary written at the end of training
//!
//! A single RON file with the configuration, per-generation statistics and
//! the champion's score, so runs can be compared without re-reading logs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use antsim_core::{GenerationStats, SimulationConfig, SimulationState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::training_env::Champion;

/// File name of the summary inside the output directory
pub const SUMMARY_FILE: &str = "summary.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// RFC 3339 timestamps
    pub started_at: String,
    pub finished_at: String,
    pub seed: u64,
    /// Layer sizes, e.g. `18-4-2`
    pub topology: String,
    pub config: SimulationConfig,
    pub champion_generation: Option<u32>,
    pub champion_reward: Option<f64>,
    pub generations: Vec<GenerationStats>,
}

impl RunSummary {
    pub fn new(
        started_at: DateTime<Utc>,
        state: &SimulationState,
        champion: Option<&Champion>,
    ) -> Self {
        Self {
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            seed: state.seed(),
            topology: state.report().topology,
            config: state.config().clone(),
            champion_generation: champion.map(|c| c.generation),
            champion_reward: champion.map(|c| c.reward),
            generations: state.history().to_vec(),
        }
    }

    /// Best reward of any finished generation
    pub fn best_reward(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|stats| stats.best_reward)
            .max_by(f64::total_cmp)
    }

    /// Write `summary.ron` into `dir`, returning its path
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).context("Failed to create output directory")?;
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize run summary")?;
        let path = dir.join(SUMMARY_FILE);
        fs::write(&path, ron).context("Failed to write run summary")?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ron::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
