use crate::labels::LabelStore;
use crate::lattice::{Lattice, Position, VisitState};
use std::collections::VecDeque;

/// Breadth-first relabeling of the cluster around `start`.
///
/// The start site's own label becomes the target: every occupied,
/// still-unvisited site reachable from it is merged into that label. Callers
/// must start from the smallest label of the cluster, which holds when starts
/// are taken in row-major order over freshly labeled sites. `frontier` is
/// scratch space reused across calls.
///
/// # Panics
///
/// If `start` is unoccupied.
pub fn merge_cluster(
    lattice: &mut Lattice,
    labels: &mut LabelStore,
    start: Position,
    frontier: &mut VecDeque<Position>,
) {
    assert!(
        lattice.is_occupied(start),
        "cannot relabel from unoccupied site {:?}",
        start
    );

    let target = lattice.label(start);
    frontier.clear();
    frontier.push_back(start);
    lattice[start].visit = VisitState::Frontier;

    while let Some(position) = frontier.pop_front() {
        for neighbor in lattice.neighbors(position) {
            let site = lattice[neighbor];
            if site.is_occupied() && site.visit == VisitState::Unvisited {
                labels.merge(site.label, target);
                lattice[neighbor].visit = VisitState::Frontier;
                frontier.push_back(neighbor);
            }
        }
        lattice[position].visit = VisitState::Settled;
    }
}
