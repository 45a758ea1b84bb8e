//! Top-k hit collection.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::postlist::{DocId, Weight};

/// A matching document and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub weight: Weight,
}

/// Heap entry ordered so the worst hit sits on top.
#[derive(Debug, Clone, Copy)]
struct Ranked(Hit);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower weight is worse; on a tie the later document is worse.
        other
            .0
            .weight
            .total_cmp(&self.0.weight)
            .then_with(|| self.0.doc_id.cmp(&other.0.doc_id))
    }
}

/// Keeps the best `max_hits` documents seen so far.
#[derive(Debug)]
pub struct TopDocs {
    max_hits: usize,
    hits: BinaryHeap<Ranked>,
    total_collected: u64,
}

impl TopDocs {
    pub fn new(max_hits: usize) -> Self {
        TopDocs {
            max_hits,
            hits: BinaryHeap::with_capacity(max_hits),
            total_collected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.hits.len() >= self.max_hits
    }

    /// Number of documents offered to the collector.
    pub fn total_collected(&self) -> u64 {
        self.total_collected
    }

    /// The weight a new document must reach to have any chance of entering
    /// the results.
    pub fn threshold(&self, min_weight: Weight) -> Weight {
        match self.hits.peek() {
            Some(worst) if self.is_full() => worst.0.weight.max(min_weight),
            _ => min_weight,
        }
    }

    /// Offer a document. Documents must be offered in increasing docid order.
    pub fn collect(&mut self, doc_id: DocId, weight: Weight) {
        self.total_collected += 1;
        if self.max_hits == 0 {
            return;
        }
        let hit = Ranked(Hit { doc_id, weight });
        if !self.is_full() {
            self.hits.push(hit);
            return;
        }
        if let Some(worst) = self.hits.peek()
            && weight > worst.0.weight
        {
            self.hits.pop();
            self.hits.push(hit);
        }
    }

    /// The hits, best first.
    pub fn into_hits(self) -> Vec<Hit> {
        self.hits
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_best_hits() {
        let mut top = TopDocs::new(2);
        assert!(top.is_empty());
        top.collect(1, 1.0);
        top.collect(2, 3.0);
        assert!(top.is_full());
        top.collect(3, 2.0);
        top.collect(4, 0.5);
        assert_eq!(top.total_collected(), 4);

        let hits = top.into_hits();
        assert_eq!(
            hits,
            vec![
                Hit { doc_id: 2, weight: 3.0 },
                Hit { doc_id: 3, weight: 2.0 },
            ]
        );
    }

    #[test]
    fn test_ties_favour_earlier_documents() {
        let mut top = TopDocs::new(2);
        top.collect(1, 1.0);
        top.collect(2, 1.0);
        top.collect(3, 1.0);
        let ids: Vec<DocId> = top.into_hits().iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_threshold() {
        let mut top = TopDocs::new(2);
        assert_eq!(top.threshold(0.5), 0.5);
        top.collect(1, 2.0);
        assert_eq!(top.threshold(0.5), 0.5);
        top.collect(2, 4.0);
        assert_eq!(top.threshold(0.5), 2.0);
        assert_eq!(top.threshold(3.0), 3.0);
    }

    #[test]
    fn test_zero_capacity() {
        let mut top = TopDocs::new(0);
        top.collect(1, 1.0);
        assert!(top.is_empty());
        assert_eq!(top.total_collected(), 1);
    }
}
