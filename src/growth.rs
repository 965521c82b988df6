//! Incremental growth: sites are occupied one at a time at random until a
//! cluster spans the lattice.

use crate::config::LatticeConfig;
use crate::error::Result;
use crate::labels::{Label, LabelStore};
use crate::lattice::{Lattice, Position, Snapshot};
use crate::random::RandomSource;
use crate::spanning::SpanningDetector;
use log::debug;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GrowthState {
    Growing,
    Spanned(Label),
}

pub struct GrowthEngine {
    lattice: Lattice,
    labels: LabelStore,
    detector: SpanningDetector,
    roots: Vec<Label>,
    next_label: Label,
    occupied: usize,
    state: GrowthState,
}

impl GrowthEngine {
    pub fn new(config: &LatticeConfig, size: usize) -> Result<Self> {
        config.validate_size(size)?;

        Ok(Self {
            lattice: Lattice::new(size),
            labels: LabelStore::for_lattice(size),
            detector: SpanningDetector::new(size),
            roots: Vec::with_capacity(4),
            next_label: 1,
            occupied: 0,
            state: GrowthState::Growing,
        })
    }

    #[inline(always)]
    pub fn state(&self) -> GrowthState {
        self.state
    }

    #[inline(always)]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
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

    pub fn snapshot(&mut self) -> Snapshot {
        self.lattice.snapshot(&mut self.labels)
    }

    /// Occupies `position` and joins it to its neighbouring clusters.
    ///
    /// # Panics
    ///
    /// If the site is already occupied.
    pub fn occupy(&mut self, position: Position) -> GrowthState {
        let Self {
            lattice,
            labels,
            detector,
            roots,
            next_label,
            occupied,
            state,
        } = self;

        assert!(
            !lattice.is_occupied(position),
            "site {:?} is already occupied",
            position
        );

        roots.clear();
        for neighbor in lattice.neighbors(position) {
            let label = lattice.label(neighbor);
            if label != 0 {
                roots.push(labels.resolve(label));
            }
        }
        roots.sort_unstable();
        roots.dedup();

        let (label, merged) = match roots.as_slice() {
            [] => {
                let fresh = *next_label;
                *next_label += 1;
                (fresh, false)
            }
            [only] => (*only, false),
            [smallest, rest @ ..] => {
                for &root in rest {
                    labels.merge(root, *smallest);
                }
                (*smallest, true)
            }
        };

        lattice.set_label(position, label);
        *occupied += 1;

        // A merge can join edge-touching clusters without the new site being
        // on an edge itself.
        if lattice.is_on_edge(position) || merged {
            if let Some(spanning) = detector.detect(lattice, labels) {
                debug!(
                    "spanning cluster {} after {} of {} sites",
                    spanning,
                    occupied,
                    lattice.area()
                );
                *state = GrowthState::Spanned(spanning);
            }
        }

        *state
    }

    /// Occupies one uniformly random unoccupied site.
    pub fn step<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> GrowthState {
        if let GrowthState::Spanned(_) = self.state {
            return self.state;
        }
        assert!(
            self.occupied < self.lattice.area(),
            "lattice saturated without a spanning cluster"
        );

        let size = self.lattice.size();
        let position = loop {
            let candidate = (rng.next_int(size), rng.next_int(size));
            if !self.lattice.is_occupied(candidate) {
                break candidate;
            }
        };

        self.occupy(position)
    }

    /// Grows until a cluster spans and returns its label.
    pub fn run<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Label {
        loop {
            if let GrowthState::Spanned(label) = self.step(rng) {
                return label;
            }
        }
    }
}

/// Occupied fraction at the moment a spanning cluster first appears.
pub fn run_growth<R: RandomSource + ?Sized>(
    config: &LatticeConfig,
    size: usize,
    rng: &mut R,
) -> Result<f64> {
    let mut engine = GrowthEngine::new(config, size)?;
    engine.run(rng);
    Ok(engine.occupied_fraction())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PercolationError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn three_sites_span_two_by_two() {
        let mut engine = GrowthEngine::new(&LatticeConfig::default(), 2).unwrap();

        assert_eq!(engine.occupy((0, 0)), GrowthState::Growing);
        assert_eq!(engine.occupy((1, 1)), GrowthState::Growing);
        assert_eq!(engine.occupy((0, 1)), GrowthState::Spanned(1));
        assert_eq!(engine.occupied_fraction(), 0.75);
    }

    #[test]
    fn bridging_site_merges_into_smallest_label() {
        let mut engine = GrowthEngine::new(&LatticeConfig::default(), 5).unwrap();

        engine.occupy((2, 1));
        engine.occupy((2, 3));
        engine.occupy((1, 2));
        assert_eq!(engine.lattice().label((1, 2)), 3);

        engine.occupy((2, 2));

        assert_eq!(engine.lattice().label((2, 2)), 1);
        for position in [(2, 1), (2, 3), (1, 2), (2, 2)] {
            let label = engine.lattice().label(position);
            assert_eq!(engine.resolve(label), 1);
        }
    }

    #[test]
    fn interior_bridge_triggers_spanning() {
        let mut engine = GrowthEngine::new(&LatticeConfig::default(), 3).unwrap();

        // a cross missing only its centre touches every edge in four pieces
        for position in [(0, 1), (1, 0), (1, 2), (2, 1)] {
            assert_eq!(engine.occupy(position), GrowthState::Growing);
        }
        assert_eq!(engine.occupy((1, 1)), GrowthState::Spanned(1));
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn occupying_twice_is_a_defect() {
        let mut engine = GrowthEngine::new(&LatticeConfig::default(), 3).unwrap();
        engine.occupy((1, 1));
        engine.occupy((1, 1));
    }

    #[test]
    fn growth_terminates_with_fraction_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        for size in 2..12 {
            let fraction = run_growth(&LatticeConfig::default(), size, &mut rng).unwrap();
            assert!(fraction > 0.0 && fraction <= 1.0, "size {size}: {fraction}");
        }
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = LatticeConfig::new(8);

        assert_eq!(
            run_growth(&config, 1, &mut rng),
            Err(PercolationError::InvalidSize { size: 1, max: 8 })
        );
        assert!(run_growth(&config, 9, &mut rng).is_err());
    }
}
