//! In-memory leaf postlists.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{PostListError, Result};
use crate::postlist::{
    BoxedPostList, DocCount, DocId, Position, PostList, PruneResult, TermCount, TermFreqs, Weight,
    WeightStats,
};

/// One entry of a term's posting list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Within-document frequency of the term.
    pub wdf: TermCount,
    pub doc_length: TermCount,
    /// The term's weight contribution for this document.
    pub weight: Weight,
}

impl Posting {
    pub fn new(doc_id: DocId, wdf: TermCount, doc_length: TermCount, weight: Weight) -> Self {
        Posting {
            doc_id,
            wdf,
            doc_length,
            weight,
        }
    }
}

/// A term postlist over postings held in memory.
///
/// Postings whose weight is below a positive `w_min` are skipped. When no
/// remaining posting can reach `w_min` the list prunes itself, handing back
/// an [`EmptyPostList`] to take its place.
#[derive(Debug, Clone)]
pub struct VecPostList {
    term: String,
    postings: Vec<Posting>,
    /// `suffix_max[i]` is the largest weight in `postings[i..]`; one extra
    /// trailing zero.
    suffix_max: Vec<Weight>,
    /// Index of the current posting while positioned.
    index: usize,
    position: Position,
    max_weight: Weight,
    rel_term_freq: DocCount,
}

impl VecPostList {
    /// Create a postlist for `term`. Doc ids must be non-zero and strictly
    /// increasing.
    pub fn new<S: Into<String>>(term: S, postings: Vec<Posting>) -> Result<Self> {
        let term = term.into();
        if postings.len() > DocCount::MAX as usize {
            return Err(PostListError::index(format!(
                "too many postings for term {term}"
            )));
        }
        let mut prev = 0;
        for posting in &postings {
            if posting.doc_id <= prev {
                return Err(PostListError::index(format!(
                    "doc ids for term {term} must be non-zero and strictly increasing (got {} after {prev})",
                    posting.doc_id
                )));
            }
            if !posting.weight.is_finite() || posting.weight < 0.0 {
                return Err(PostListError::index(format!(
                    "weight {} for term {term} in doc {} must be finite and non-negative",
                    posting.weight, posting.doc_id
                )));
            }
            prev = posting.doc_id;
        }

        let mut suffix_max: Vec<Weight> = vec![0.0; postings.len() + 1];
        for i in (0..postings.len()).rev() {
            suffix_max[i] = suffix_max[i + 1].max(postings[i].weight);
        }
        let max_weight = suffix_max[0];

        Ok(VecPostList {
            term,
            postings,
            suffix_max,
            index: 0,
            position: Position::Unstarted,
            max_weight,
            rel_term_freq: 0,
        })
    }

    /// A boolean postlist: every posting has wdf 1, length 1 and weight 0.
    pub fn from_doc_ids<S: Into<String>>(term: S, doc_ids: &[DocId]) -> Result<Self> {
        let postings = doc_ids
            .iter()
            .map(|&did| Posting::new(did, 1, 1, 0.0))
            .collect();
        Self::new(term, postings)
    }

    /// A weighted postlist with wdf 1 and length 1.
    pub fn from_weighted<S: Into<String>>(term: S, entries: &[(DocId, Weight)]) -> Result<Self> {
        let postings = entries
            .iter()
            .map(|&(did, weight)| Posting::new(did, 1, 1, weight))
            .collect();
        Self::new(term, postings)
    }

    /// Set how many of the postings fall in the relevance set.
    pub fn with_rel_term_freq(mut self, rel_term_freq: DocCount) -> Self {
        self.rel_term_freq = rel_term_freq;
        self
    }

    fn len(&self) -> DocCount {
        self.postings.len() as DocCount
    }

    fn current(&self) -> Option<&Posting> {
        match self.position {
            Position::At(_) => self.postings.get(self.index),
            _ => None,
        }
    }

    /// Index of the first posting not yet returned.
    fn next_index(&self) -> usize {
        match self.position {
            Position::Unstarted => 0,
            Position::At(_) => self.index + 1,
            Position::Exhausted => self.postings.len(),
        }
    }

    /// Settle on the first posting at or after `from` whose weight can reach
    /// `w_min`.
    fn settle(&mut self, from: usize, w_min: Weight) {
        let found = self.postings[from..]
            .iter()
            .position(|p| w_min <= 0.0 || p.weight >= w_min);
        match found {
            Some(offset) => {
                self.index = from + offset;
                self.position = Position::At(self.postings[self.index].doc_id);
            }
            None => {
                self.index = self.postings.len();
                self.position = Position::Exhausted;
            }
        }
        trace!("{}: settled at {:?} (w_min={})", self.term, self.position, w_min);
    }

    /// The replacement to hand back when nothing from `from` on reaches
    /// `w_min`.
    fn prune_if_hopeless(&mut self, from: usize, w_min: Weight) -> Option<BoxedPostList> {
        if w_min > 0.0 && self.suffix_max[from] < w_min {
            self.index = self.postings.len();
            self.position = Position::Exhausted;
            return Some(Box::new(EmptyPostList::new()));
        }
        None
    }
}

impl PostList for VecPostList {
    fn term_freq_lower_bound(&self) -> DocCount {
        self.len()
    }

    fn term_freq_upper_bound(&self) -> DocCount {
        self.len()
    }

    fn term_freq_estimate(&self) -> DocCount {
        self.len()
    }

    fn term_freq_estimate_using_stats(&self, _stats: &WeightStats) -> TermFreqs {
        TermFreqs::new(self.len(), self.rel_term_freq)
    }

    fn max_weight(&self) -> Weight {
        self.max_weight
    }

    fn recompute_max_weight(&mut self) -> Weight {
        let from = match self.position {
            Position::At(_) => self.index,
            _ => self.next_index(),
        };
        self.max_weight = self.suffix_max[from];
        self.max_weight
    }

    fn current_id(&self) -> Option<DocId> {
        self.position.doc_id()
    }

    fn is_exhausted(&self) -> bool {
        self.position.is_exhausted()
    }

    fn current_weight(&self) -> Weight {
        self.current().map_or(0.0, |p| p.weight)
    }

    fn doc_length(&self) -> TermCount {
        self.current().map_or(0, |p| p.doc_length)
    }

    fn within_doc_term_freq(&self) -> TermCount {
        self.current().map_or(0, |p| p.wdf)
    }

    fn advance(&mut self, w_min: Weight) -> PruneResult {
        if self.position.is_exhausted() {
            return Ok(None);
        }
        let from = self.next_index();
        if let Some(replacement) = self.prune_if_hopeless(from, w_min) {
            return Ok(Some(replacement));
        }
        self.settle(from, w_min);
        Ok(None)
    }

    fn skip_to(&mut self, did: DocId, w_min: Weight) -> PruneResult {
        let from = match self.position {
            Position::Exhausted => return Ok(None),
            Position::At(current) if did <= current => return Ok(None),
            _ => self.next_index(),
        };
        let from = from + self.postings[from..].partition_point(|p| p.doc_id < did);
        if let Some(replacement) = self.prune_if_hopeless(from, w_min) {
            return Ok(Some(replacement));
        }
        self.settle(from, w_min);
        Ok(None)
    }

    fn describe(&self) -> String {
        self.term.clone()
    }
}

/// A postlist that matches nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyPostList;

impl EmptyPostList {
    pub fn new() -> Self {
        EmptyPostList
    }
}

impl PostList for EmptyPostList {
    fn term_freq_lower_bound(&self) -> DocCount {
        0
    }

    fn term_freq_upper_bound(&self) -> DocCount {
        0
    }

    fn term_freq_estimate(&self) -> DocCount {
        0
    }

    fn term_freq_estimate_using_stats(&self, _stats: &WeightStats) -> TermFreqs {
        TermFreqs::default()
    }

    fn max_weight(&self) -> Weight {
        0.0
    }

    fn recompute_max_weight(&mut self) -> Weight {
        0.0
    }

    fn current_id(&self) -> Option<DocId> {
        None
    }

    fn is_exhausted(&self) -> bool {
        true
    }

    fn current_weight(&self) -> Weight {
        0.0
    }

    fn doc_length(&self) -> TermCount {
        0
    }

    fn within_doc_term_freq(&self) -> TermCount {
        0
    }

    fn advance(&mut self, _w_min: Weight) -> PruneResult {
        Ok(None)
    }

    fn skip_to(&mut self, _did: DocId, _w_min: Weight) -> PruneResult {
        Ok(None)
    }

    fn describe(&self) -> String {
        "Empty".to_string()
    }
}
