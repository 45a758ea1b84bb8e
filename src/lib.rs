//! # postlist
//!
//! Query evaluation over trees of postlists: lazy, docid-ordered iterators
//! annotated with relevance weights and term statistics.
//!
//! ## Features
//!
//! - A single [`PostList`](postlist::PostList) trait shared by leaves and
//!   combinators
//! - A leapfrog AND that pushes weight thresholds down into its children
//! - Replacement-based pruning with max weight recalculation
//! - Independence-based term frequency estimation
//! - A top-k [`Matcher`](matcher::Matcher)

pub mod cli;
pub mod error;
pub mod matcher;
pub mod postlist;

pub mod prelude {
    pub use crate::error::{PostListError, Result};
    pub use crate::matcher::{Hit, MatchConfig, MatchResults, Matcher};
    pub use crate::postlist::{
        AndPostList, BoxedPostList, DocCount, DocId, EmptyPostList, Position, PostList, Posting,
        PruneObserver, RecalcFlag, TermCount, TermFreqs, VecPostList, Weight, WeightStats,
        and_all,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
