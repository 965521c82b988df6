use crate::labels::{Label, LabelStore};
use bitvec::prelude::BitVec;
use itertools::iproduct;
use std::ops::{Index, IndexMut};

/// `(row, col)` on the lattice.
pub type Position = (usize, usize);

/// Progress of the breadth-first relabeling over one site.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum VisitState {
    #[default]
    Unvisited,
    Frontier,
    Settled,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Site {
    /// `0` while unoccupied, otherwise a possibly non-canonical cluster label.
    pub label: Label,
    pub visit: VisitState,
}

impl Site {
    #[inline(always)]
    pub fn is_occupied(&self) -> bool {
        self.label != 0
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

/// Square grid of sites stored row-major.
#[derive(Clone)]
pub struct Lattice {
    memory: Vec<Site>,
    size: usize,
}

impl Lattice {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "lattice needs at least one site");
        let memory = std::iter::repeat(Site::default())
            .take(size * size)
            .collect();
        Self { memory, size }
    }

    /// Builds a lattice from row-major labels, `0` meaning unoccupied.
    pub fn from_labels(size: usize, labels: &[Label]) -> Self {
        assert_eq!(labels.len(), size * size, "expected {size}x{size} labels");
        let mut lattice = Self::new(size);
        for (site, &label) in lattice.memory.iter_mut().zip(labels) {
            site.label = label;
        }
        lattice
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn area(&self) -> usize {
        self.memory.len()
    }

    #[inline(always)]
    pub fn row(&self, row: usize) -> &[Site] {
        &self.memory[row * self.size..(row + 1) * self.size]
    }

    #[inline(always)]
    pub fn label(&self, position: Position) -> Label {
        self[position].label
    }

    #[inline(always)]
    pub fn set_label(&mut self, position: Position, label: Label) {
        self[position].label = label;
    }

    #[inline(always)]
    pub fn is_occupied(&self, position: Position) -> bool {
        self[position].is_occupied()
    }

    #[inline(always)]
    pub fn is_on_edge(&self, (row, col): Position) -> bool {
        let last = self.size - 1;
        row == 0 || col == 0 || row == last || col == last
    }

    /// Row-major positions of every site.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        iproduct!(0..self.size, 0..self.size)
    }

    /// The up-to-4 in-bounds neighbours of `position`.
    pub fn neighbors(&self, (row, col): Position) -> impl Iterator<Item = Position> {
        let last = self.size - 1;
        let up = (row > 0).then(|| (row - 1, col));
        let down = (row < last).then(|| (row + 1, col));
        let left = (col > 0).then(|| (row, col - 1));
        let right = (col < last).then(|| (row, col + 1));
        [up, down, left, right].into_iter().flatten()
    }

    pub fn edge(&self, edge: Edge) -> impl Iterator<Item = Position> {
        let last = self.size - 1;
        (0..self.size).map(move |i| match edge {
            Edge::Top => (0, i),
            Edge::Bottom => (last, i),
            Edge::Left => (i, 0),
            Edge::Right => (i, last),
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.memory.iter().filter(|s| s.is_occupied()).count()
    }

    /// Canonical labels of every site, resolved through `labels`.
    pub fn snapshot(&self, store: &mut LabelStore) -> Snapshot {
        let labels = self
            .memory
            .iter()
            .map(|s| if s.is_occupied() { store.resolve(s.label) } else { 0 })
            .collect();
        Snapshot {
            size: self.size,
            labels,
        }
    }
}

impl Index<Position> for Lattice {
    type Output = Site;

    #[inline(always)]
    fn index(&self, (row, col): Position) -> &Self::Output {
        &self.memory[row * self.size + col]
    }
}

impl IndexMut<Position> for Lattice {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): Position) -> &mut Self::Output {
        &mut self.memory[row * self.size + col]
    }
}

/// Read-only copy of a lattice's canonical labels, detached from the run
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    size: usize,
    labels: Vec<Label>,
}

impl Snapshot {
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[inline(always)]
    pub fn row(&self, row: usize) -> &[Label] {
        &self.labels[row * self.size..(row + 1) * self.size]
    }

    /// Row-major membership mask of one cluster.
    pub fn cluster_mask(&self, label: Label) -> BitVec {
        self.labels.iter().map(|&l| l != 0 && l == label).collect()
    }

    pub fn cluster_size(&self, label: Label) -> usize {
        self.cluster_mask(label).count_ones()
    }
}

impl Index<Position> for Snapshot {
    type Output = Label;

    #[inline(always)]
    fn index(&self, (row, col): Position) -> &Self::Output {
        &self.labels[row * self.size + col]
    }
}
