//! Detection of a cluster touching all four lattice edges.
//!
//! Each edge's canonical labels are collected, sorted and deduplicated; the
//! labels of the top edge are then looked up in the other three lists with a
//! binary search. With at most `size` labels per edge this costs
//! `O(size log size)` instead of comparing every pair of edge sites.

use crate::labels::{Label, LabelStore};
use crate::lattice::{Edge, Lattice};

/// Per-edge label buffers reused across detections on one run.
#[derive(Debug, Default, Clone)]
pub struct SpanningDetector {
    top: Vec<Label>,
    bottom: Vec<Label>,
    left: Vec<Label>,
    right: Vec<Label>,
}

impl SpanningDetector {
    pub fn new(size: usize) -> Self {
        Self {
            top: Vec::with_capacity(size),
            bottom: Vec::with_capacity(size),
            left: Vec::with_capacity(size),
            right: Vec::with_capacity(size),
        }
    }

    /// Canonical label of a cluster present on every edge.
    ///
    /// When several clusters qualify the smallest canonical label among them
    /// wins, since the top-edge labels are tried in ascending order.
    pub fn detect(&mut self, lattice: &Lattice, labels: &mut LabelStore) -> Option<Label> {
        for edge in Edge::ALL {
            let buffer = match edge {
                Edge::Top => &mut self.top,
                Edge::Bottom => &mut self.bottom,
                Edge::Left => &mut self.left,
                Edge::Right => &mut self.right,
            };
            collect_edge(lattice, labels, edge, buffer);
        }

        let Self {
            top,
            bottom,
            left,
            right,
        } = self;

        top.iter().copied().find(|label| {
            bottom.binary_search(label).is_ok()
                && left.binary_search(label).is_ok()
                && right.binary_search(label).is_ok()
        })
    }
}

/// One-shot detection with freshly allocated buffers.
pub fn find_spanning_cluster(lattice: &Lattice, labels: &mut LabelStore) -> Option<Label> {
    SpanningDetector::new(lattice.size()).detect(lattice, labels)
}

fn collect_edge(lattice: &Lattice, labels: &mut LabelStore, edge: Edge, buffer: &mut Vec<Label>) {
    buffer.clear();
    buffer.extend(
        lattice
            .edge(edge)
            .map(|position| lattice.label(position))
            .filter(|&label| label != 0)
            .map(|label| labels.resolve(label)),
    );
    buffer.sort_unstable();
    buffer.dedup();
}
