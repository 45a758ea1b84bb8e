//! Driving a postlist tree to a ranked set of hits.
//!
//! The [`Matcher`] pulls documents from the root of a query tree, passing
//! down the weight a document needs to enter the current top-k. It owns the
//! [`RecalcFlag`] that pruning inside the tree raises, and recomputes the
//! tree's max weights whenever the flag is set. Once the root's max weight
//! drops below the entry threshold nothing further can qualify and matching
//! stops early.

pub mod collector;
pub mod config;

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::postlist::{BoxedPostList, PruneObserver, RecalcFlag, Weight};

pub use self::collector::{Hit, TopDocs};
pub use self::config::MatchConfig;

/// The outcome of a match run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResults {
    /// Best hits first; in boolean mode, in docid order.
    pub hits: Vec<Hit>,
    /// Number of documents the root postlist produced.
    pub examined: u64,
    /// Number of times the tree's max weights were recomputed.
    pub recalculations: u64,
}

/// Runs a query tree under a [`MatchConfig`].
#[derive(Debug)]
pub struct Matcher {
    config: MatchConfig,
    recalc: Arc<RecalcFlag>,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Matcher {
            config,
            recalc: RecalcFlag::shared(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The observer to hand to combinators built for this matcher.
    pub fn observer(&self) -> Arc<dyn PruneObserver> {
        self.recalc.clone()
    }

    /// Pull matches from `root` until it is exhausted or nothing left in it
    /// can enter the results.
    pub fn run(&self, root: &mut BoxedPostList) -> Result<MatchResults> {
        self.config.validate()?;
        if self.config.boolean {
            return self.run_boolean(root);
        }

        let mut results = MatchResults::default();
        let mut top = TopDocs::new(self.config.limit);
        if self.config.limit == 0 {
            return Ok(results);
        }

        self.recalc.take();
        let mut max_weight = root.recompute_max_weight();
        results.recalculations += 1;

        loop {
            if self.recalc.take() {
                max_weight = root.recompute_max_weight();
                results.recalculations += 1;
            }
            let threshold = top.threshold(self.config.min_weight);
            if max_weight < threshold {
                debug!(
                    "stopping: max weight {max_weight} below threshold {threshold} for {}",
                    root.describe()
                );
                break;
            }

            if let Some(replacement) = root.advance(threshold)? {
                debug!("root pruned to {}", replacement.describe());
                *root = replacement;
                self.recalc.request_recalc();
            }
            let Some(doc_id) = root.current_id() else {
                break;
            };
            results.examined += 1;

            let weight: Weight = root.current_weight();
            if weight >= self.config.min_weight {
                top.collect(doc_id, weight);
            }

            if self.config.recalc_interval > 0
                && results.examined % self.config.recalc_interval == 0
            {
                self.recalc.request_recalc();
            }
        }

        results.hits = top.into_hits();
        debug!(
            "matched {} hits from {} examined documents",
            results.hits.len(),
            results.examined
        );
        Ok(results)
    }

    /// Collect the first `limit` matches, ignoring weights.
    fn run_boolean(&self, root: &mut BoxedPostList) -> Result<MatchResults> {
        let mut results = MatchResults::default();
        while results.hits.len() < self.config.limit {
            if let Some(replacement) = root.advance(0.0)? {
                *root = replacement;
            }
            let Some(doc_id) = root.current_id() else {
                break;
            };
            results.examined += 1;
            results.hits.push(Hit {
                doc_id,
                weight: 0.0,
            });
        }
        Ok(results)
    }
}
