/// Running mean/variance via Welford's algorithm.
///
/// delta = x - mean
/// mean += delta / n
/// m2 += delta * (x - mean)
///
/// O(1) memory, stable for large n.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingMoments {
    n: u64,
    mean: f64,
    m2: f64,
}

impl StreamingMoments {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.n
    }

    /// None until the first observation.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then_some(self.mean)
    }

    /// Population variance (m2 / n).
    pub fn variance(&self) -> Option<f64> {
        (self.n > 0).then(|| self.m2 / self.n as f64)
    }

    /// Unbiased sample variance (m2 / (n - 1)).
    pub fn sample_variance(&self) -> Option<f64> {
        (self.n > 1).then(|| self.m2 / (self.n - 1) as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }
}

/// Win count and payoff sum across paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayoffTally {
    paths: u64,
    wins: u64,
    sum: f64,
}

impl PayoffTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// A path wins when its post-premium payoff is strictly positive.
    #[inline]
    pub fn record(&mut self, payoff: f64) {
        self.paths += 1;
        if payoff > 0.0 {
            self.wins += 1;
        }
        self.sum += payoff;
    }

    #[inline]
    pub fn paths(&self) -> u64 {
        self.paths
    }

    #[inline]
    pub fn wins(&self) -> u64 {
        self.wins
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn p_win(&self) -> f64 {
        if self.paths == 0 {
            return 0.0;
        }
        self.wins as f64 / self.paths as f64
    }

    pub fn ev_abs(&self) -> f64 {
        if self.paths == 0 {
            return 0.0;
        }
        self.sum / self.paths as f64
    }
}
