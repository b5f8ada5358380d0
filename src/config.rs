//! Run configuration: `strata.toml` values overridden by CLI flags

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strata_core::{GeneratorConfig, StrategyKind};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "strata.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Node count for generated graphs
    pub nodes: usize,
    /// Edge probability for generated graphs
    pub edge_density: f64,
    /// Seed for the run's random source; entropy when absent
    pub seed: Option<u64>,
    pub strategy: StrategyKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            nodes: generator.nodes,
            edge_density: generator.edge_density,
            seed: None,
            strategy: StrategyKind::default(),
        }
    }
}

/// Values given on the command line. `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub nodes: Option<usize>,
    pub edge_density: Option<f64>,
    pub seed: Option<u64>,
    pub strategy: Option<StrategyKind>,
}

impl RunConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load an explicit config file, or `strata.toml` if it exists.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(nodes) = overrides.nodes {
            self.nodes = nodes;
        }
        if let Some(density) = overrides.edge_density {
            self.edge_density = density;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }
        self
    }

    /// Check the generator settings. Nothing to check when the graph comes
    /// from a snapshot.
    pub fn validate(&self, generating: bool) -> anyhow::Result<()> {
        if !generating {
            return Ok(());
        }
        if !(0.0..=1.0).contains(&self.edge_density) {
            bail!("edge_density must be within [0, 1], got {}", self.edge_density);
        }
        if self.nodes == 0 {
            bail!("nodes must be at least 1");
        }
        Ok(())
    }

    pub fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            nodes: self.nodes,
            edge_density: self.edge_density,
        }
    }
}
