//! Fixed occupation probability: every site is occupied independently in one
//! pass, then clusters are found by breadth-first relabeling.

use crate::config::{validate_probability, LatticeConfig};
use crate::error::Result;
use crate::labels::{Label, LabelStore};
use crate::lattice::{Lattice, Snapshot, VisitState};
use crate::random::RandomSource;
use crate::spanning::find_spanning_cluster;
use crate::traversal::merge_cluster;
use log::debug;
use std::collections::VecDeque;

/// A fully generated and labeled lattice.
pub struct FixedProbabilityRun {
    lattice: Lattice,
    labels: LabelStore,
    occupied: usize,
    spanning: Option<Label>,
}

impl FixedProbabilityRun {
    pub fn generate<R: RandomSource + ?Sized>(
        config: &LatticeConfig,
        size: usize,
        p: f64,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate_size(size)?;
        validate_probability(p)?;

        let mut lattice = Lattice::new(size);
        let occupied = populate(&mut lattice, p, rng);
        Ok(Self::from_lattice(lattice, occupied))
    }

    /// Labels clusters of a lattice whose occupied sites carry distinct
    /// labels increasing in row-major order.
    pub fn from_lattice(mut lattice: Lattice, occupied: usize) -> Self {
        let mut labels = LabelStore::for_lattice(lattice.size());
        label_clusters(&mut lattice, &mut labels);
        let spanning = find_spanning_cluster(&lattice, &mut labels);

        debug!(
            "{0}x{0} lattice: {1} occupied, spanning cluster {2:?}",
            lattice.size(),
            occupied,
            spanning
        );

        Self {
            lattice,
            labels,
            occupied,
            spanning,
        }
    }

    #[inline(always)]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    #[inline(always)]
    pub fn spanning_cluster(&self) -> Option<Label> {
        self.spanning
    }

    #[inline(always)]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn occupied_fraction(&self) -> f64 {
        self.occupied as f64 / self.lattice.area() as f64
    }

    pub fn resolve(&mut self, label: Label) -> Label {
        self.labels.resolve(label)
    }

    /// Fraction of occupied sites that belong to the spanning cluster.
    pub fn spanning_fraction(&mut self) -> Option<f64> {
        let spanning = self.spanning?;
        let members = self
            .lattice
            .positions()
            .map(|position| self.lattice.label(position))
            .filter(|&label| label != 0 && self.labels.resolve(label) == spanning)
            .count();
        Some(members as f64 / self.occupied as f64)
    }

    pub fn snapshot(&mut self) -> Snapshot {
        self.lattice.snapshot(&mut self.labels)
    }
}

/// One Bernoulli trial per site in row-major order; occupied sites get
/// increasing fresh labels. Returns the number of occupied sites.
pub fn populate<R: RandomSource + ?Sized>(lattice: &mut Lattice, p: f64, rng: &mut R) -> usize {
    let mut next_label: Label = 1;
    for position in lattice.positions() {
        if rng.trial(p) {
            lattice.set_label(position, next_label);
            next_label += 1;
        }
    }
    next_label as usize - 1
}

/// Merges every cluster under its smallest label.
pub fn label_clusters(lattice: &mut Lattice, labels: &mut LabelStore) {
    let mut frontier = VecDeque::new();
    for position in lattice.positions() {
        let site = lattice[position];
        if site.is_occupied() && site.visit == VisitState::Unvisited {
            merge_cluster(lattice, labels, position, &mut frontier);
        }
    }
}

/// Spanning-cluster fraction `F` of one lattice at probability `p`, or
/// `None` when no cluster spans.
pub fn run_fixed_probability<R: RandomSource + ?Sized>(
    config: &LatticeConfig,
    size: usize,
    p: f64,
    rng: &mut R,
) -> Result<Option<f64>> {
    let mut run = FixedProbabilityRun::generate(config, size, p, rng)?;
    Ok(run.spanning_fraction())
}
