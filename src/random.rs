use rand::Rng;

/// Randomness consumed by the engines.
///
/// Every `rand::Rng` is a source; tests substitute scripted sequences.
pub trait RandomSource {
    /// Uniform integer in `[0, n)`.
    fn next_int(&mut self, n: usize) -> usize;

    /// Uniform real in `[0, 1)`.
    fn next_unit_real(&mut self) -> f64;

    /// Bernoulli trial that succeeds with probability `p`.
    fn trial(&mut self, p: f64) -> bool {
        self.next_unit_real() < p
    }
}

impl<R: Rng> RandomSource for R {
    #[inline(always)]
    fn next_int(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }

    #[inline(always)]
    fn next_unit_real(&mut self) -> f64 {
        self.gen()
    }
}
