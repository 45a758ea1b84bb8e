//! Configuration for driving a postlist tree to a ranked result set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PostListError, Result};
use crate::postlist::Weight;

/// Configuration for [`Matcher`](crate::matcher::Matcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum number of hits to return.
    pub limit: usize,

    /// Documents weighing less than this are never returned.
    pub min_weight: Weight,

    /// Ignore weights: return the first `limit` matches in docid order.
    pub boolean: bool,

    /// Recompute max weights every this many examined documents, on top of
    /// recalculations requested by pruning. 0 disables it.
    pub recalc_interval: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            min_weight: 0.0,
            boolean: false,
            recalc_interval: 0,
        }
    }
}

impl MatchConfig {
    /// Create a config returning up to `limit` hits.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Set the minimum weight a hit must have.
    pub fn with_min_weight(mut self, min_weight: Weight) -> Self {
        self.min_weight = min_weight;
        self
    }

    /// Switch to boolean matching.
    pub fn with_boolean(mut self, boolean: bool) -> Self {
        self.boolean = boolean;
        self
    }

    /// Set the periodic max weight recalculation interval.
    pub fn with_recalc_interval(mut self, interval: u64) -> Self {
        self.recalc_interval = interval;
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.min_weight.is_finite() || self.min_weight < 0.0 {
            return Err(PostListError::invalid_config(format!(
                "min_weight must be a finite non-negative number, got {}",
                self.min_weight
            )));
        }
        Ok(())
    }
}
