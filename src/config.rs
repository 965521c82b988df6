use crate::error::{PercolationError, Result};

/// Largest lattice side accepted when nothing else is configured.
pub const DEFAULT_MAX_SIZE: usize = 100;

/// Largest side whose sites can all carry distinct labels.
pub const LABEL_LIMIT_SIZE: usize = 65_535;

/// Bounds every engine checks before it allocates a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeConfig {
    pub max_size: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl LatticeConfig {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    /// A one-site lattice spans trivially and never needs growth, so the
    /// smallest accepted side is 2. The upper bound is `max_size`, capped so
    /// that every site fits in the label range.
    pub fn validate_size(&self, size: usize) -> Result<()> {
        let max = self.max_size.min(LABEL_LIMIT_SIZE);
        if size < 2 || size > max {
            return Err(PercolationError::InvalidSize { size, max });
        }
        Ok(())
    }
}

pub fn validate_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(PercolationError::InvalidProbability(p))
    }
}
