use crate::config::{validate_probability, LatticeConfig};
use crate::error::{PercolationError, Result};
use crate::fixed_probability::run_fixed_probability;
use crate::growth::run_growth;
use crate::random::RandomSource;
use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::{IntoParallelIterator, ParallelIterator};

/// What a single trial measures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Experiment {
    /// Occupied fraction when a spanning cluster first appears.
    Growth { size: usize },
    /// Fraction of occupied sites in the spanning cluster at probability `p`.
    FixedProbability { size: usize, p: f64 },
}

impl Experiment {
    pub fn size(&self) -> usize {
        match *self {
            Experiment::Growth { size } | Experiment::FixedProbability { size, .. } => size,
        }
    }

    pub fn validate(&self, config: &LatticeConfig) -> Result<()> {
        config.validate_size(self.size())?;
        if let Experiment::FixedProbability { p, .. } = *self {
            validate_probability(p)?;
        }
        Ok(())
    }

    /// `None` when the lattice has no spanning cluster.
    pub fn trial<R: RandomSource + ?Sized>(
        &self,
        config: &LatticeConfig,
        rng: &mut R,
    ) -> Result<Option<f64>> {
        match *self {
            Experiment::Growth { size } => run_growth(config, size, rng).map(Some),
            Experiment::FixedProbability { size, p } => run_fixed_probability(config, size, p, rng),
        }
    }
}

/// A batch of independent trials of one experiment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ensemble {
    pub experiment: Experiment,
    pub trials: usize,
    /// Cap on lattices generated per sample while waiting for a spanning
    /// cluster. `None` retries until one appears.
    pub max_attempts: Option<usize>,
}

impl Ensemble {
    pub fn new(experiment: Experiment, trials: usize) -> Self {
        Self {
            experiment,
            trials,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    fn validate(&self, config: &LatticeConfig) -> Result<()> {
        if self.trials == 0 {
            return Err(PercolationError::NoTrials);
        }
        self.experiment.validate(config)
    }

    /// One sample; lattices without a spanning cluster are discarded.
    fn sample<R: RandomSource + ?Sized>(&self, config: &LatticeConfig, rng: &mut R) -> Result<f64> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            if let Some(value) = self.experiment.trial(config, rng)? {
                return Ok(value);
            }
            if let Some(max_attempts) = self.max_attempts {
                if attempts >= max_attempts {
                    return Err(PercolationError::RetriesExhausted { attempts });
                }
            }
            debug!("attempt {} of {:?} did not span, retrying", attempts, self.experiment);
        }
    }

    /// Runs every trial on the calling thread from one random source.
    pub fn run<R: RandomSource + ?Sized>(&self, config: &LatticeConfig, rng: &mut R) -> Result<Vec<f64>> {
        self.validate(config)?;
        measure_time::info_time!("{} trials of {:?}", self.trials, self.experiment);

        let samples = (0..self.trials)
            .map(|_| self.sample(config, &mut *rng))
            .collect::<Result<Vec<_>>>()?;

        info!("{:?}: mean {}", self.experiment, mean(&samples)?);
        Ok(samples)
    }

    /// Runs trials on the rayon pool. Trial `i` draws from its own generator
    /// seeded with `seed + i`, so the result does not depend on scheduling.
    pub fn run_parallel(&self, config: &LatticeConfig, seed: u64) -> Result<Vec<f64>> {
        self.validate(config)?;
        measure_time::info_time!("{} parallel trials of {:?}", self.trials, self.experiment);

        let samples = (0..self.trials)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                self.sample(config, &mut rng)
            })
            .collect::<Result<Vec<_>>>()?;

        info!("{:?}: mean {}", self.experiment, mean(&samples)?);
        Ok(samples)
    }
}

pub fn run_ensemble<R: RandomSource + ?Sized>(
    config: &LatticeConfig,
    experiment: Experiment,
    count: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    Ensemble::new(experiment, count).run(config, rng)
}

pub fn mean(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(PercolationError::EmptySample);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; zero for a single sample.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        let mean = mean(samples)?;
        let count = samples.len();

        let std_dev = if count > 1 {
            let squares = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        let min = samples.iter().copied().min_by_key(|x| OrderedFloat(*x));
        let max = samples.iter().copied().max_by_key(|x| OrderedFloat(*x));

        Ok(Self {
            count,
            mean,
            std_dev,
            min: min.unwrap_or(mean),
            max: max.unwrap_or(mean),
        })
    }

    /// Standard error of the mean.
    pub fn std_error(&self) -> f64 {
        self.std_dev / (self.count as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_of_known_values() {
        assert_eq!(mean(&[1.0, 0.5, 0.0]), Ok(0.5));
    }

    #[test]
    fn mean_of_nothing_is_an_error() {
        assert_eq!(mean(&[]), Err(PercolationError::EmptySample));
    }

    #[test]
    fn summary_statistics() {
        let summary = Summary::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();

        assert_eq!(summary.count, 8);
        assert_relative_eq!(summary.mean, 5.0);
        assert_relative_eq!(summary.std_dev, (32.0f64 / 7.0).sqrt());
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn zero_trials_are_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let result = run_ensemble(
            &LatticeConfig::default(),
            Experiment::Growth { size: 4 },
            0,
            &mut rng,
        );
        assert_eq!(result, Err(PercolationError::NoTrials));
    }

    #[test]
    fn exhausted_retries_surface_as_error() {
        let ensemble = Ensemble::new(Experiment::FixedProbability { size: 5, p: 0.0 }, 3)
            .with_max_attempts(4);
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(
            ensemble.run(&LatticeConfig::default(), &mut rng),
            Err(PercolationError::RetriesExhausted { attempts: 4 })
        );
    }

    #[test]
    fn parallel_run_is_reproducible() {
        let ensemble = Ensemble::new(Experiment::Growth { size: 8 }, 16);
        let config = LatticeConfig::default();

        let first = ensemble.run_parallel(&config, 99).unwrap();
        let second = ensemble.run_parallel(&config, 99).unwrap();

        assert_eq!(first.len(), 16);
        assert_eq!(first, second);
    }
}
