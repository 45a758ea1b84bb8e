//! Postlists: lazy, docid-ordered iterators that make up a query tree.
//!
//! Every node of a query tree, leaf or combinator, implements [`PostList`].
//! A parent owns its children as [`BoxedPostList`]s and never needs to know
//! what kind of postlist it is talking to.

pub mod and;
pub mod branch;
pub mod leaf;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use self::and::{AndPostList, and_all};
pub use self::branch::{Branch, PruneObserver, RecalcFlag};
pub use self::leaf::{EmptyPostList, Posting, VecPostList};

/// Document identifier. Real documents are numbered from 1.
pub type DocId = u32;

/// A count of documents.
pub type DocCount = u32;

/// A count of term occurrences (wdf, document length).
pub type TermCount = u32;

/// A relevance weight.
///
/// Thresholds are computed as `w_min - bound` and may go negative, which
/// means "accept anything".
pub type Weight = f64;

/// An owned child postlist.
pub type BoxedPostList = Box<dyn PostList>;

/// Outcome of `advance`/`skip_to`: `Some` carries a replacement postlist the
/// caller must install in place of the callee. The replacement is already
/// positioned.
pub type PruneResult = Result<Option<BoxedPostList>>;

/// Where a postlist currently sits in its docid sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// `advance`/`skip_to` has not been called yet.
    Unstarted,
    /// Positioned at a document.
    At(DocId),
    /// Run past the last document. Terminal.
    Exhausted,
}

impl Position {
    /// The document id, if positioned at one.
    pub fn doc_id(&self) -> Option<DocId> {
        match self {
            Position::At(did) => Some(*did),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Position::Exhausted)
    }
}

/// Term frequency estimates for a postlist, over the whole collection and
/// over the relevance set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFreqs {
    /// Estimated number of matching documents in the collection.
    pub term_freq: DocCount,
    /// Estimated number of matching documents in the relevance set.
    pub rel_term_freq: DocCount,
}

impl TermFreqs {
    pub fn new(term_freq: DocCount, rel_term_freq: DocCount) -> Self {
        TermFreqs {
            term_freq,
            rel_term_freq,
        }
    }
}

/// Read-only collection statistics used by weighting and estimation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightStats {
    /// Number of documents in the collection. Must be non-zero when used
    /// for estimation.
    pub collection_size: DocCount,
    /// Number of documents marked relevant.
    pub relevance_set_size: DocCount,
}

impl WeightStats {
    pub fn new(collection_size: DocCount, relevance_set_size: DocCount) -> Self {
        WeightStats {
            collection_size,
            relevance_set_size,
        }
    }
}

/// The capability set shared by every node of a query tree.
///
/// Callers must drive a postlist in increasing docid order from a single
/// thread of control. `advance` and `skip_to` take a minimum weight `w_min`:
/// the postlist may skip any document whose own weight is below it. A
/// non-positive `w_min` means no document may be skipped on weight grounds.
pub trait PostList: Send + Debug {
    /// A lower bound on the number of matching documents.
    fn term_freq_lower_bound(&self) -> DocCount;

    /// An upper bound on the number of matching documents.
    fn term_freq_upper_bound(&self) -> DocCount;

    /// An estimate of the number of matching documents.
    fn term_freq_estimate(&self) -> DocCount;

    /// Estimates of the number of matching documents, in the collection and
    /// in the relevance set, computed from `stats`.
    fn term_freq_estimate_using_stats(&self, stats: &WeightStats) -> TermFreqs;

    /// The cached upper bound on the weight of any remaining document.
    fn max_weight(&self) -> Weight;

    /// Recompute the upper bound on remaining weight, recursively.
    fn recompute_max_weight(&mut self) -> Weight;

    /// The current document, or `None` when unstarted or exhausted.
    fn current_id(&self) -> Option<DocId>;

    /// Whether the postlist has run off the end.
    fn is_exhausted(&self) -> bool;

    /// The weight of the current document. Only meaningful when positioned.
    fn current_weight(&self) -> Weight;

    /// The length of the current document.
    fn doc_length(&self) -> TermCount;

    /// The within-document frequency at the current document.
    fn within_doc_term_freq(&self) -> TermCount;

    /// Move to the next document that could reach `w_min`.
    fn advance(&mut self, w_min: Weight) -> PruneResult;

    /// Move to the first document `>= did` that could reach `w_min`.
    fn skip_to(&mut self, did: DocId, w_min: Weight) -> PruneResult;

    /// A human-readable description of this subtree.
    fn describe(&self) -> String;
}
