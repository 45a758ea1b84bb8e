//! AND: the intersection of two postlists.
//!
//! The merge is a leapfrog join. Each child is moved with a weight threshold
//! discounted by the most the other child could contribute, so a child may
//! skip runs of documents that cannot reach the combined threshold.

use std::sync::Arc;

use log::{debug, trace};

use crate::error::{PostListError, Result};
use crate::postlist::branch::Side;
use crate::postlist::{
    Branch, BoxedPostList, DocCount, DocId, Position, PostList, PruneObserver, PruneResult,
    TermCount, TermFreqs, Weight, WeightStats,
};

/// Relative slack taken off a child's threshold.
const THRESHOLD_SLACK: Weight = 1e-9;

/// The weight a child must reach for the sum with its sibling, which
/// contributes at most `other_max`, to reach `w_min`.
///
/// `w_min - other_max` is rounded, and may land just above a child weight
/// whose rounded sum with the sibling still reaches `w_min`. Lowering it by
/// a small relative margin keeps every such document.
fn discount(w_min: Weight, other_max: Weight) -> Weight {
    (w_min - other_max) - THRESHOLD_SLACK * (w_min.abs() + other_max.abs())
}

/// Yields only documents present in both children.
#[derive(Debug)]
pub struct AndPostList {
    branch: Branch,
    position: Position,
    /// Cached upper bound on the left child's weight.
    left_max_weight: Weight,
    /// Cached upper bound on the right child's weight.
    right_max_weight: Weight,
    collection_size: DocCount,
}

impl AndPostList {
    /// Intersect `left` and `right`.
    ///
    /// The child with the smaller term frequency estimate becomes the left
    /// child. With `seed_max_weights` the cached bounds are taken from the
    /// children's current `max_weight()`; otherwise they stay zero and the
    /// caller must run `recompute_max_weight()` before passing a positive
    /// threshold.
    pub fn new(
        left: BoxedPostList,
        right: BoxedPostList,
        observer: Option<Arc<dyn PruneObserver>>,
        collection_size: DocCount,
        seed_max_weights: bool,
    ) -> Self {
        let mut branch = Branch::new(left, right, observer);
        if branch.left().term_freq_estimate() > branch.right().term_freq_estimate() {
            branch.swap_children();
        }
        let (left_max_weight, right_max_weight) = if seed_max_weights {
            (branch.left().max_weight(), branch.right().max_weight())
        } else {
            (0.0, 0.0)
        };
        AndPostList {
            branch,
            position: Position::Unstarted,
            left_max_weight,
            right_max_weight,
            collection_size,
        }
    }

    pub fn left(&self) -> &dyn PostList {
        self.branch.left()
    }

    pub fn right(&self) -> &dyn PostList {
        self.branch.right()
    }

    pub fn collection_size(&self) -> DocCount {
        self.collection_size
    }

    pub fn position(&self) -> Position {
        self.position
    }

    fn exhaust(&mut self) -> Result<()> {
        self.position = Position::Exhausted;
        Ok(())
    }

    /// Finish an `advance` or `skip_to` once the right child has moved.
    fn merge(&mut self, w_min: Weight) -> Result<()> {
        // The right child has just moved past the old position, and the left
        // child is at or before the old position.
        let Some(mut right_id) = self.branch.right().current_id() else {
            return self.exhaust();
        };
        trace!(
            "AND merge: right at {right_id}, w_min={w_min}, left_max={}, right_max={}",
            self.left_max_weight, self.right_max_weight
        );
        let left_w_min = discount(w_min, self.right_max_weight);
        let right_w_min = discount(w_min, self.left_max_weight);

        self.branch
            .skip_to_handling_prune(Side::Left, right_id, left_w_min)?;
        let Some(mut left_id) = self.branch.left().current_id() else {
            return self.exhaust();
        };

        while left_id != right_id {
            if left_id < right_id {
                self.branch
                    .skip_to_handling_prune(Side::Left, right_id, left_w_min)?;
                match self.branch.left().current_id() {
                    Some(did) => left_id = did,
                    None => return self.exhaust(),
                }
                trace!("AND merge: left at {left_id}");
            } else {
                self.branch
                    .skip_to_handling_prune(Side::Right, left_id, right_w_min)?;
                match self.branch.right().current_id() {
                    Some(did) => right_id = did,
                    None => return self.exhaust(),
                }
                trace!("AND merge: right at {right_id}");
            }
        }

        self.position = Position::At(left_id);
        Ok(())
    }
}

impl PostList for AndPostList {
    fn term_freq_lower_bound(&self) -> DocCount {
        // The overlap is smallest when both operands are as small and as
        // disjoint as possible within the collection.
        let left_min = self.left().term_freq_lower_bound();
        let right_min = self.right().term_freq_lower_bound();
        match left_min.checked_add(right_min) {
            Some(sum) if sum > self.collection_size => sum - self.collection_size,
            Some(_) => 0,
            // The true sum exceeds any collection size; the wrapped
            // subtraction yields the exact difference.
            None => left_min
                .wrapping_add(right_min)
                .wrapping_sub(self.collection_size),
        }
    }

    fn term_freq_upper_bound(&self) -> DocCount {
        self.left()
            .term_freq_upper_bound()
            .min(self.right().term_freq_upper_bound())
    }

    fn term_freq_estimate(&self) -> DocCount {
        if self.collection_size == 0 {
            return 0;
        }
        // P(l and r) = P(l) . P(r)
        let left_est = f64::from(self.left().term_freq_estimate());
        let right_est = f64::from(self.right().term_freq_estimate());
        (left_est * right_est / f64::from(self.collection_size) + 0.5) as DocCount
    }

    fn term_freq_estimate_using_stats(&self, stats: &WeightStats) -> TermFreqs {
        assert!(
            stats.collection_size != 0,
            "term frequency estimation needs a non-empty collection"
        );
        let left = self.left().term_freq_estimate_using_stats(stats);
        let right = self.right().term_freq_estimate_using_stats(stats);

        let freq_est =
            f64::from(left.term_freq) * f64::from(right.term_freq) / f64::from(stats.collection_size);
        let rel_freq_est = if stats.relevance_set_size == 0 {
            0.0
        } else {
            f64::from(left.rel_term_freq) * f64::from(right.rel_term_freq)
                / f64::from(stats.relevance_set_size)
        };

        TermFreqs::new((freq_est + 0.5) as DocCount, (rel_freq_est + 0.5) as DocCount)
    }

    fn max_weight(&self) -> Weight {
        self.left_max_weight + self.right_max_weight
    }

    fn recompute_max_weight(&mut self) -> Weight {
        self.left_max_weight = self.branch.child_mut(Side::Left).recompute_max_weight();
        self.right_max_weight = self.branch.child_mut(Side::Right).recompute_max_weight();
        debug!(
            "AND max weight recomputed: {} + {}",
            self.left_max_weight, self.right_max_weight
        );
        self.max_weight()
    }

    fn current_id(&self) -> Option<DocId> {
        self.position.doc_id()
    }

    fn is_exhausted(&self) -> bool {
        self.position.is_exhausted()
    }

    fn current_weight(&self) -> Weight {
        debug_assert!(
            matches!(self.position, Position::At(_)),
            "current_weight() on an AND that is not positioned ({:?})",
            self.position
        );
        self.left().current_weight() + self.right().current_weight()
    }

    fn doc_length(&self) -> TermCount {
        let doc_length = self.left().doc_length();
        assert_eq!(
            doc_length,
            self.right().doc_length(),
            "children of {} disagree on the length of doc {:?}",
            self.describe(),
            self.position
        );
        doc_length
    }

    fn within_doc_term_freq(&self) -> TermCount {
        self.left().within_doc_term_freq() + self.right().within_doc_term_freq()
    }

    fn advance(&mut self, w_min: Weight) -> PruneResult {
        if self.position.is_exhausted() {
            return Ok(None);
        }
        self.branch
            .advance_handling_prune(Side::Right, discount(w_min, self.left_max_weight))?;
        self.merge(w_min)?;
        Ok(None)
    }

    fn skip_to(&mut self, did: DocId, w_min: Weight) -> PruneResult {
        match self.position {
            Position::Exhausted => return Ok(None),
            Position::At(current) if did <= current => return Ok(None),
            _ => {}
        }
        self.branch
            .skip_to_handling_prune(Side::Right, did, discount(w_min, self.left_max_weight))?;
        self.merge(w_min)?;
        Ok(None)
    }

    fn describe(&self) -> String {
        self.branch.describe_with("And")
    }
}

/// Intersect any number of postlists as a left-deep chain of binary ANDs,
/// rarest first.
pub fn and_all(
    mut children: Vec<BoxedPostList>,
    observer: Option<Arc<dyn PruneObserver>>,
    collection_size: DocCount,
) -> Result<BoxedPostList> {
    if children.is_empty() {
        return Err(PostListError::query("AND needs at least one subquery"));
    }
    children.sort_by_key(|child| child.term_freq_estimate());

    let mut children = children.into_iter();
    let mut tree = children
        .next()
        .ok_or_else(|| PostListError::query("AND needs at least one subquery"))?;
    for child in children {
        tree = Box::new(AndPostList::new(
            tree,
            child,
            observer.clone(),
            collection_size,
            true,
        ));
    }
    Ok(tree)
}
