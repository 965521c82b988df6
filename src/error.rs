#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PercolationError {
    #[error("lattice size {size} is outside the supported range 2..={max}")]
    InvalidSize { size: usize, max: usize },

    #[error("occupation probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("cannot reduce an empty sample")]
    EmptySample,

    #[error("ensemble needs at least one trial")]
    NoTrials,

    #[error("no spanning cluster after {attempts} attempts")]
    RetriesExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, PercolationError>;
