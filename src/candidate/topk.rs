//! Top-K selection across per-class blocks.

use std::cmp::Ordering;

use crate::candidate::{ClassBlock, Detection, FrameResult};

fn confidence_cmp_desc(a: &Detection, b: &Detection) -> Ordering {
    b.confidence.total_cmp(&a.confidence)
}

/// Sorts detections by descending confidence; equal scores keep their order.
pub(crate) fn sort_detections_desc(detections: &mut [Detection]) {
    detections.sort_by(confidence_cmp_desc);
}

#[derive(Clone, Copy, Debug)]
struct Ranked {
    seq: usize,
    detection: Detection,
}

fn ranked_cmp_desc(a: &Ranked, b: &Ranked) -> Ordering {
    confidence_cmp_desc(&a.detection, &b.detection).then_with(|| a.seq.cmp(&b.seq))
}

/// Top-K container keeping the `k` best detections seen so far.
///
/// Ties on confidence are broken by insertion order: an earlier push always
/// outranks a later one with the same score.
pub struct TopK {
    k: usize,
    seq: usize,
    worst: usize,
    items: Vec<Ranked>,
}

impl TopK {
    /// Creates a new Top-K collector.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seq: 0,
            worst: 0,
            items: Vec::with_capacity(k),
        }
    }

    /// Pushes a detection, evicting the lowest-ranked one if at capacity.
    pub fn push(&mut self, detection: Detection) {
        let ranked = Ranked {
            seq: self.seq,
            detection,
        };
        self.seq += 1;
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(ranked);
            if self.items.len() == self.k {
                self.worst = self.find_worst();
            }
            return;
        }

        if ranked_cmp_desc(&ranked, &self.items[self.worst]) == Ordering::Less {
            self.items[self.worst] = ranked;
            self.worst = self.find_worst();
        }
    }

    fn find_worst(&self) -> usize {
        let mut worst_idx = 0usize;
        for (idx, item) in self.items.iter().enumerate().skip(1) {
            if ranked_cmp_desc(item, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }
        worst_idx
    }

    /// Returns the number of retained detections.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns retained detections sorted by descending confidence.
    pub fn into_sorted_desc(mut self) -> Vec<Detection> {
        self.items.sort_by(ranked_cmp_desc);
        self.items.into_iter().map(|r| r.detection).collect()
    }
}

/// Merges per-class blocks into exactly `top_k` rows.
///
/// Blocks are visited in class order and rows in emission order, which fixes
/// the tie-break among equal confidences. Sentinels are identical and always
/// rank last, so only the real rows of each block compete; the result is
/// padded back to `top_k`.
pub fn select_top_k(blocks: &[ClassBlock], top_k: usize) -> FrameResult {
    let mut topk = TopK::new(top_k);
    for block in blocks {
        for detection in block.real() {
            topk.push(*detection);
        }
    }
    FrameResult::from_valid(topk.into_sorted_desc(), top_k)
}
