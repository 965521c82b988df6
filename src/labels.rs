//! Disjoint-set store of cluster labels.
//!
//! Labels are issued from `1..=capacity`; slot `0` is reserved for
//! "unoccupied" and is never resolved. A slot either names itself as the
//! canonical label of its cluster or forwards to another slot. Forwarding only
//! ever points at a smaller label, so every chain ends at a root.

use std::fmt;

pub type Label = u32;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Slot {
    /// Canonical label of a cluster.
    Root(Label),
    /// Merged into the cluster reachable through this label.
    Forward(Label),
}

#[derive(Clone)]
pub struct LabelStore {
    slots: Vec<Slot>,
    trace: Vec<Label>,
}

impl LabelStore {
    /// Store with labels `1..=capacity`, each initially its own root.
    ///
    /// # Panics
    ///
    /// If `capacity` does not fit in a [`Label`].
    pub fn new(capacity: usize) -> Self {
        let last = Label::try_from(capacity)
            .unwrap_or_else(|_| panic!("capacity {} exceeds the label range", capacity));
        let slots = (0..=last).map(Slot::Root).collect();
        Self {
            slots,
            trace: Vec::new(),
        }
    }

    /// Store sized for every site of a `size × size` lattice.
    pub fn for_lattice(size: usize) -> Self {
        Self::new(size * size)
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline(always)]
    pub fn slot(&self, label: Label) -> Slot {
        self.slots[self.checked(label)]
    }

    #[inline(always)]
    pub fn is_root(&self, label: Label) -> bool {
        matches!(self.slot(label), Slot::Root(_))
    }

    /// Returns the canonical label of `label`.
    ///
    /// Every forwarding slot visited on the way, except the last one, is
    /// rewritten to forward straight to the root, so a second call on the same
    /// label follows at most one reference.
    ///
    /// # Panics
    ///
    /// On label `0` or a label beyond the store's capacity.
    pub fn resolve(&mut self, label: Label) -> Label {
        let mut current = label;
        self.trace.clear();

        let root = loop {
            match self.slots[self.checked(current)] {
                Slot::Root(root) => break root,
                Slot::Forward(next) => {
                    self.trace.push(current);
                    current = next;
                }
            }
        };

        if let Some((_, compressible)) = self.trace.split_last() {
            for &visited in compressible {
                self.slots[visited as usize] = Slot::Forward(root);
            }
        }

        root
    }

    /// Redirects cluster `old` into cluster `new`.
    ///
    /// Both labels must already be canonical and `new < old`; the store does
    /// no resolution of its own.
    pub fn merge(&mut self, old: Label, new: Label) {
        debug_assert!(new < old, "merge target {new} must precede {old}");
        debug_assert!(self.is_root(old) && self.is_root(new));
        let index = self.checked(old);
        self.slots[index] = Slot::Forward(new);
    }

    /// Number of forwarding references between `label` and its root.
    pub fn depth(&self, label: Label) -> usize {
        let mut depth = 0;
        let mut current = label;
        while let Slot::Forward(next) = self.slot(current) {
            depth += 1;
            current = next;
        }
        depth
    }

    #[inline(always)]
    fn checked(&self, label: Label) -> usize {
        let index = label as usize;
        assert!(
            index != 0 && index < self.slots.len(),
            "label {} is not a label issued by this store (capacity {})",
            label,
            self.capacity()
        );
        index
    }
}

impl fmt::Debug for LabelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().skip(1))
            .finish()
    }
}
