use crate::config::LatticeConfig;
use crate::ensemble::{Ensemble, Experiment, Summary};
use crate::error::Result;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Lattice size or occupation probability.
    pub x: f64,
    pub summary: Summary,
}

/// Seed for the ensemble at sweep point `index`, far enough from its
/// neighbours that per-trial seeds never overlap.
fn point_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64) << 32)
}

/// Mean occupied fraction at first spanning for each lattice size.
pub fn sweep_sizes(
    config: &LatticeConfig,
    sizes: &[usize],
    trials: usize,
    seed: u64,
) -> Result<Vec<SweepPoint>> {
    sizes
        .iter()
        .enumerate()
        .map(|(index, &size)| -> Result<SweepPoint> {
            measure_time::print_time!("size {}", size);
            let samples = Ensemble::new(Experiment::Growth { size }, trials)
                .run_parallel(config, point_seed(seed, index))?;
            let summary = Summary::from_samples(&samples)?;
            info!("size {}: pc = {} ± {}", size, summary.mean, summary.std_error());
            Ok(SweepPoint {
                x: size as f64,
                summary,
            })
        })
        .collect()
}

/// Mean spanning-cluster fraction for each occupation probability.
pub fn sweep_probabilities(
    config: &LatticeConfig,
    size: usize,
    probabilities: &[f64],
    trials: usize,
    max_attempts: Option<usize>,
    seed: u64,
) -> Result<Vec<SweepPoint>> {
    probabilities
        .iter()
        .enumerate()
        .map(|(index, &p)| -> Result<SweepPoint> {
            measure_time::print_time!("p = {}", p);
            let mut ensemble = Ensemble::new(Experiment::FixedProbability { size, p }, trials);
            ensemble.max_attempts = max_attempts;
            let samples = ensemble.run_parallel(config, point_seed(seed, index))?;
            let summary = Summary::from_samples(&samples)?;
            info!("p = {}: F = {} ± {}", p, summary.mean, summary.std_error());
            Ok(SweepPoint { x: p, summary })
        })
        .collect()
}

/// `from, from + step, ...` without passing `to`, closed with `to` itself
/// when the last step falls short of it. Points are rounded to the decimal
/// places of `from` and `step`.
pub fn linear_grid(from: f64, to: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || to < from {
        return vec![from];
    }
    let scale = 10f64.powi(decimal_places(from).max(decimal_places(step)));
    let count = ((to - from) / step + 1e-9).floor() as usize;

    let mut grid: Vec<f64> = (0..=count)
        .map(|i| ((from + i as f64 * step) * scale).round() / scale)
        .collect();
    if grid.last().map_or(false, |&last| to - last > step * 1e-6) {
        grid.push(to);
    }
    grid
}

/// Fewest decimal places that represent `x`, up to 12.
fn decimal_places(x: f64) -> i32 {
    (0..12)
        .find(|&places| {
            let scaled = x * 10f64.powi(places);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.abs().max(1.0)
        })
        .unwrap_or(12)
}

/// A coarse grid over `from..=to` with a finer grid over
/// `from..fine_until`, the way critical-region scans are usually taken.
pub fn probability_grid(from: f64, to: f64, step: f64, fine: Option<(f64, f64)>) -> Vec<f64> {
    match fine {
        Some((fine_until, fine_step)) if fine_until > from && fine_until < to => {
            let mut grid = linear_grid(from, fine_until, fine_step);
            grid.retain(|&p| p < fine_until - fine_step * 0.5);
            grid.extend(linear_grid(fine_until, to, step));
            grid
        }
        _ => linear_grid(from, to, step),
    }
}
