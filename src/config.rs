//! Ranking parameters shared by both engines.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Parameters for [`crate::pagerank`] and [`crate::random_surfer`].
///
/// `damping` is the teleport probability `m`: at each step the walk jumps to a uniformly
/// random node with probability `m` and follows an out-link otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankConfig {
    pub damping: f64,
    /// Iteration cap for PageRank.
    pub max_depth: usize,
    /// Mean absolute change below which PageRank stops.
    pub tolerance: f64,
    /// Random-surfer steps per node.
    pub surfer_multiplier: usize,
    /// Seed for the random surfer; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Number of entries in reports.
    pub top_k: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: 0.15,
            max_depth: 100,
            tolerance: 1e-6,
            surfer_multiplier: 100,
            seed: None,
            top_k: 10,
        }
    }
}

impl RankConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_surfer_multiplier(mut self, multiplier: usize) -> Self {
        self.surfer_multiplier = multiplier;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Reject parameters the engines cannot run with.
    pub fn validate(&self) -> Result<()> {
        // Negated comparisons so NaN fails too.
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "damping must be in (0, 1), got {}",
                self.damping
            )));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidParameter("max_depth must be positive".into()));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.surfer_multiplier == 0 {
            return Err(Error::InvalidParameter("surfer_multiplier must be positive".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
