//! Trainer configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults ([`SimulationConfig::default`])
//! 2. `antsim.ron` in the working directory (if it exists), or the file given
//!    with `--config`
//! 3. Environment variables prefixed with `ANTSIM_`
//!
//! Command-line flags are applied on top by the binary.
//!
//! Example environment variable: `ANTSIM_EVOLUTION__TOURNAMENT_SIZE=5`

use std::path::Path;

use anyhow::{Context, Result};
use antsim_core::SimulationConfig;
use config::{Config, Environment, File, FileFormat};

/// Name of the optional config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "antsim";

/// Load the simulation configuration
///
/// An explicit `path` must exist; the default file is optional.
pub fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let defaults = Config::try_from(&SimulationConfig::default())
        .context("Failed to serialize default configuration")?;

    let file = match path {
        Some(path) => File::from(path).format(FileFormat::Ron).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE)
            .format(FileFormat::Ron)
            .required(false),
    };

    let config = Config::builder()
        .add_source(defaults)
        .add_source(file)
        .add_source(
            Environment::with_prefix("ANTSIM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let config: SimulationConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    if let Some(path) = path {
        log::info!("Loaded configuration from {}", path.display());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        // No antsim.ron in the crate directory
        let config = load(None).expect("Failed to load config");
        let defaults = SimulationConfig::default();
        assert_eq!(config.population_size, defaults.population_size);
        assert_eq!(config.sensor.ray_count, defaults.sensor.ray_count);
        assert_eq!(config.arena.barriers, defaults.arena.barriers);
        assert_eq!(config.brain.hidden, defaults.brain.hidden);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        writeln!(
            file,
            "(population_size: 64, generation_ticks: 120, evolution: (tournament_size: 5))"
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.population_size, 64);
        assert_eq!(config.generation_ticks, 120);
        assert_eq!(config.evolution.tournament_size, 5);
        // Untouched values keep their defaults
        assert_eq!(config.evolution.mutation_probability, 0.05);
        assert_eq!(config.sensor.ray_length, 200.0);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("missing.ron"))).is_err());
    }
}
