//! Settings file shared by the subcommands.
//!
//! ```toml
//! [generator]
//! seed = 7
//! loop_probability = 0.1
//!
//! [simulation]
//! turn_weight = 2.0
//! max_ticks = 20000
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Args;
use micromaze_system_exploration::SimulationConfig;
use micromaze_system_generator::GeneratorConfig;
use serde::Deserialize;

/// Ticks a simulation may run when neither the file nor the flags set a limit.
pub(crate) const DEFAULT_MAX_TICKS: u64 = 50_000;

/// Contents of a settings file; every value is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) generator: GeneratorSettings,
    pub(crate) simulation: SimulationSettings,
}

impl Settings {
    /// Reads the settings file, or returns empty settings when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = Self::parse(&source)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    pub(crate) fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Generator values, accepted both from the `[generator]` table and as flags.
#[derive(Args, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GeneratorSettings {
    /// Seed for the maze generator.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Chance of removing each remaining interior wall after carving.
    #[arg(long)]
    pub(crate) loop_probability: Option<f64>,
    /// Whether enclosed interior posts receive an opened edge.
    #[arg(long)]
    pub(crate) repair_posts: Option<bool>,
    /// Regeneration attempts before giving up.
    #[arg(long)]
    pub(crate) max_attempts: Option<u32>,
}

impl GeneratorSettings {
    /// Values set here win; unset values come from `fallback`.
    #[must_use]
    pub(crate) fn or(self, fallback: Self) -> Self {
        Self {
            seed: self.seed.or(fallback.seed),
            loop_probability: self.loop_probability.or(fallback.loop_probability),
            repair_posts: self.repair_posts.or(fallback.repair_posts),
            max_attempts: self.max_attempts.or(fallback.max_attempts),
        }
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }

    pub(crate) fn config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        if let Some(probability) = self.loop_probability {
            config = config.with_loop_probability(probability);
        }
        if let Some(repair) = self.repair_posts {
            config = config.with_repair_posts(repair);
        }
        if let Some(attempts) = self.max_attempts {
            config = config.with_max_attempts(attempts);
        }
        config
    }
}

/// Simulation and planning values, accepted both from the `[simulation]` table and as flags.
#[derive(Args, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationSettings {
    /// Extra cost charged for every change of heading.
    #[arg(long)]
    pub(crate) turn_weight: Option<f64>,
    /// Upper bound on simulated ticks.
    #[arg(long)]
    pub(crate) max_ticks: Option<u64>,
}

impl SimulationSettings {
    /// Values set here win; unset values come from `fallback`.
    #[must_use]
    pub(crate) fn or(self, fallback: Self) -> Self {
        Self {
            turn_weight: self.turn_weight.or(fallback.turn_weight),
            max_ticks: self.max_ticks.or(fallback.max_ticks),
        }
    }

    pub(crate) fn turn_weight(&self) -> f64 {
        self.turn_weight
            .unwrap_or_else(|| SimulationConfig::default().turn_weight())
    }

    pub(crate) fn max_ticks(&self) -> u64 {
        self.max_ticks.unwrap_or(DEFAULT_MAX_TICKS)
    }

    pub(crate) fn config(&self) -> SimulationConfig {
        SimulationConfig::default().with_turn_weight(self.turn_weight())
    }
}
