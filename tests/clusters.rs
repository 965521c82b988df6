//! Cluster labels and spanning detection checked against a brute-force flood
//! fill for both engines.

mod common;

use common::{assert_partition, flood_fill, label_of, spanning_components};
use percolation::{FixedProbabilityRun, GrowthEngine, GrowthState, LatticeConfig};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Labels partition the occupied sites exactly like a flood fill, and
    /// each cluster keeps the label of its first site in row-major order.
    #[test]
    fn fixed_probability_labels_match_flood_fill(
        size in 2usize..24,
        p in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut run = FixedProbabilityRun::generate(&LatticeConfig::default(), size, p, &mut rng).unwrap();
        let snapshot = run.snapshot();
        let components = flood_fill(&snapshot);

        assert_partition(&snapshot, &components);
        prop_assert_eq!(snapshot.labels().iter().filter(|&&l| l != 0).count(), run.occupied());

        let mut seen = std::collections::HashSet::new();
        let mut occupied_before = 0;
        for (index, component) in components.iter().enumerate() {
            if let Some(id) = component {
                if seen.insert(*id) {
                    prop_assert_eq!(snapshot.labels()[index] as usize, occupied_before + 1);
                }
                occupied_before += 1;
            }
        }
    }

    #[test]
    fn fixed_probability_spanning_matches_brute_force(
        size in 2usize..24,
        p in 0.4f64..0.8,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut run = FixedProbabilityRun::generate(&LatticeConfig::default(), size, p, &mut rng).unwrap();
        let snapshot = run.snapshot();
        let components = flood_fill(&snapshot);

        let expected = spanning_components(size, &components)
            .into_iter()
            .map(|id| label_of(&snapshot, &components, id))
            .min();
        prop_assert_eq!(run.spanning_cluster(), expected);

        if let Some(label) = expected {
            let fraction = run.spanning_fraction().unwrap();
            let members = snapshot.cluster_size(label) as f64;
            prop_assert!((fraction - members / run.occupied() as f64).abs() < 1e-12);
        }
    }

    /// After every step the engine reports spanning exactly when a flood
    /// fill finds a cluster touching all four edges.
    #[test]
    fn growth_tracks_brute_force_every_step(size in 2usize..12, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = GrowthEngine::new(&LatticeConfig::default(), size).unwrap();

        loop {
            let state = engine.step(&mut rng);
            let snapshot = engine.snapshot();
            let components = flood_fill(&snapshot);
            assert_partition(&snapshot, &components);

            let spanning = spanning_components(size, &components);
            match state {
                GrowthState::Growing => prop_assert!(spanning.is_empty()),
                GrowthState::Spanned(label) => {
                    prop_assert!(!spanning.is_empty());
                    let expected = spanning
                        .into_iter()
                        .map(|id| label_of(&snapshot, &components, id))
                        .min();
                    prop_assert_eq!(Some(label), expected);
                    break;
                }
            }
        }

        let fraction = engine.occupied_fraction();
        prop_assert!(fraction > 0.0 && fraction <= 1.0);
        prop_assert_eq!(engine.lattice().occupied_count(), engine.occupied());
    }

    #[test]
    fn growth_labels_never_exceed_area(size in 2usize..40, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = GrowthEngine::new(&LatticeConfig::default(), size).unwrap();
        engine.run(&mut rng);

        let area = (size * size) as u32;
        prop_assert!(engine.snapshot().labels().iter().all(|&l| l <= area));
    }
}
