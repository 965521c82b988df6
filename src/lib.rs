pub mod config;
pub mod ensemble;
pub mod error;
pub mod fixed_probability;
pub mod growth;
pub mod labels;
pub mod lattice;
pub mod random;
pub mod report;
pub mod spanning;
pub mod sweep;
pub mod traversal;

pub use config::{LatticeConfig, DEFAULT_MAX_SIZE, LABEL_LIMIT_SIZE};
pub use ensemble::{mean, run_ensemble, Ensemble, Experiment, Summary};
pub use error::{PercolationError, Result};
pub use fixed_probability::{run_fixed_probability, FixedProbabilityRun};
pub use growth::{run_growth, GrowthEngine, GrowthState};
pub use labels::{Label, LabelStore};
pub use lattice::{Lattice, Position, Snapshot};
pub use random::RandomSource;
pub use spanning::{find_spanning_cluster, SpanningDetector};
