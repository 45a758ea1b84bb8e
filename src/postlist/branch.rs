//! Shared two-child base for binary combinators, and the pruning hook.
//!
//! When a child answers `advance`/`skip_to` with a replacement postlist, the
//! branch drops the old child, installs the replacement in its slot and tells
//! the match driver (through a [`PruneObserver`]) that cached max weights
//! somewhere in the tree are now stale.

use std::fmt::Debug;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::error::Result;
use crate::postlist::{BoxedPostList, DocId, PostList, Weight};

/// Receives notification that part of the tree was replaced by pruning.
pub trait PruneObserver: Send + Sync + Debug {
    /// Ask for max weights to be recomputed before the next call into the
    /// tree.
    fn request_recalc(&self);
}

/// The match driver's side of the pruning hook: a sticky flag read and
/// cleared by the driver between calls into the tree.
#[derive(Debug, Default)]
pub struct RecalcFlag {
    pending: AtomicBool,
}

impl RecalcFlag {
    pub fn new() -> Self {
        RecalcFlag {
            pending: AtomicBool::new(false),
        }
    }

    /// Create a flag ready to be shared with a query tree.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Whether a recalculation has been requested and not yet taken.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Read and clear the flag.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

impl PruneObserver for RecalcFlag {
    fn request_recalc(&self) {
        self.pending.store(true, Ordering::Release);
    }
}

/// Which child of a [`Branch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Two exclusively owned children plus the observer pruning reports go to.
#[derive(Debug)]
pub struct Branch {
    left: BoxedPostList,
    right: BoxedPostList,
    observer: Option<Arc<dyn PruneObserver>>,
}

impl Branch {
    pub fn new(
        left: BoxedPostList,
        right: BoxedPostList,
        observer: Option<Arc<dyn PruneObserver>>,
    ) -> Self {
        Branch {
            left,
            right,
            observer,
        }
    }

    pub fn left(&self) -> &dyn PostList {
        self.left.as_ref()
    }

    pub fn right(&self) -> &dyn PostList {
        self.right.as_ref()
    }

    fn child(&self, side: Side) -> &dyn PostList {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut BoxedPostList {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Exchange the two children. Only done while building the tree.
    pub fn swap_children(&mut self) {
        mem::swap(&mut self.left, &mut self.right);
    }

    /// Install `replacement`, if any, in place of the child on `side`.
    ///
    /// Returns true when a replacement happened.
    pub fn handle_prune(&mut self, side: Side, replacement: Option<BoxedPostList>) -> bool {
        let Some(replacement) = replacement else {
            return false;
        };
        debug!(
            "pruned {:?} child {} -> {}",
            side,
            self.child(side).describe(),
            replacement.describe()
        );
        *self.child_mut(side) = replacement;
        if let Some(observer) = &self.observer {
            observer.request_recalc();
        }
        true
    }

    /// `advance` the child on `side`, installing any replacement it returns.
    pub fn advance_handling_prune(&mut self, side: Side, w_min: Weight) -> Result<()> {
        let replacement = self.child_mut(side).advance(w_min)?;
        self.handle_prune(side, replacement);
        Ok(())
    }

    /// `skip_to` the child on `side`, installing any replacement it returns.
    pub fn skip_to_handling_prune(&mut self, side: Side, did: DocId, w_min: Weight) -> Result<()> {
        let replacement = self.child_mut(side).skip_to(did, w_min)?;
        self.handle_prune(side, replacement);
        Ok(())
    }

    /// The description of a binary operator over the two children.
    pub fn describe_with(&self, op: &str) -> String {
        format!("({} {} {})", self.left.describe(), op, self.right.describe())
    }
}
