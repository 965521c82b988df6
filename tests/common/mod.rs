#![allow(dead_code)]

use percolation::{Label, RandomSource, Snapshot};
use std::collections::VecDeque;

/// Component id of every site by plain flood fill, `None` for empty sites.
pub fn flood_fill(snapshot: &Snapshot) -> Vec<Option<usize>> {
    let size = snapshot.size();
    let mut components = vec![None; size * size];
    let mut next = 0;

    for start in 0..size * size {
        if snapshot.labels()[start] == 0 || components[start].is_some() {
            continue;
        }
        components[start] = Some(next);
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            let (row, col) = (index / size, index % size);
            let mut around = Vec::with_capacity(4);
            if row > 0 {
                around.push(index - size);
            }
            if row + 1 < size {
                around.push(index + size);
            }
            if col > 0 {
                around.push(index - 1);
            }
            if col + 1 < size {
                around.push(index + 1);
            }
            for neighbor in around {
                if snapshot.labels()[neighbor] != 0 && components[neighbor].is_none() {
                    components[neighbor] = Some(next);
                    stack.push(neighbor);
                }
            }
        }
        next += 1;
    }
    components
}

/// Components touching all four edges.
pub fn spanning_components(size: usize, components: &[Option<usize>]) -> Vec<usize> {
    let on = |index: usize| components[index];
    let touches = |edge: &dyn Fn(usize) -> bool, id: usize| {
        (0..size * size).any(|index| edge(index) && on(index) == Some(id))
    };
    let ids = components.iter().flatten().copied().max().map_or(0, |m| m + 1);

    (0..ids)
        .filter(|&id| {
            touches(&|i| i < size, id)
                && touches(&|i| i >= size * (size - 1), id)
                && touches(&|i| i % size == 0, id)
                && touches(&|i| i % size == size - 1, id)
        })
        .collect()
}

/// Panics unless sites share a label exactly when they share a component.
pub fn assert_partition(snapshot: &Snapshot, components: &[Option<usize>]) {
    let mut by_component = std::collections::HashMap::new();
    let mut by_label = std::collections::HashMap::new();

    for (&label, component) in snapshot.labels().iter().zip(components) {
        match component {
            None => assert_eq!(label, 0),
            Some(id) => {
                assert_ne!(label, 0);
                assert_eq!(*by_component.entry(*id).or_insert(label), label);
                assert_eq!(*by_label.entry(label).or_insert(*id), *id);
            }
        }
    }
}

/// Canonical label of a component.
pub fn label_of(snapshot: &Snapshot, components: &[Option<usize>], id: usize) -> Label {
    components
        .iter()
        .position(|c| *c == Some(id))
        .map(|index| snapshot.labels()[index])
        .expect("component has no sites")
}

/// Replays fixed draws; panics once a queue runs dry.
#[derive(Debug, Default)]
pub struct Scripted {
    pub ints: VecDeque<usize>,
    pub reals: VecDeque<f64>,
}

impl Scripted {
    pub fn positions(positions: &[(usize, usize)]) -> Self {
        Self {
            ints: positions.iter().flat_map(|&(row, col)| [row, col]).collect(),
            reals: VecDeque::new(),
        }
    }

    pub fn reals(reals: &[f64]) -> Self {
        Self {
            ints: VecDeque::new(),
            reals: reals.iter().copied().collect(),
        }
    }
}

impl RandomSource for Scripted {
    fn next_int(&mut self, n: usize) -> usize {
        let value = self.ints.pop_front().expect("integer script exhausted");
        assert!(value < n, "scripted {} is out of [0, {})", value, n);
        value
    }

    fn next_unit_real(&mut self) -> f64 {
        self.reals.pop_front().expect("real script exhausted")
    }
}
