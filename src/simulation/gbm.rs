use crate::simulation::rng::{standard_normal, UniformSource};

/// Calendar days per year used to convert the horizon.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Precomputed terminal-price parameters under geometric Brownian motion.
///
/// S_T = S_0 * exp((mu - sigma^2/2) * T + sigma * sqrt(T) * z)
///
/// Stack-allocated, Copy. Sampling allocates nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct GbmParams {
    pub spot: f64,
    pub mu: f64,
    pub sigma: f64,
    pub t_years: f64,
    // Precomputed
    pub drift: f64,
    pub diffusion: f64,
}

impl GbmParams {
    #[inline]
    pub fn new(spot: f64, mu: f64, sigma: f64, horizon_days: f64) -> Self {
        let t_years = horizon_days / DAYS_PER_YEAR;
        let drift = (mu - 0.5 * sigma * sigma) * t_years;
        let diffusion = sigma * t_years.sqrt();
        Self {
            spot,
            mu,
            sigma,
            t_years,
            drift,
            diffusion,
        }
    }

    /// Terminal price for a given standard-normal shock. Pure.
    #[inline]
    pub fn terminal_price(&self, z: f64) -> f64 {
        self.spot * (self.drift + self.diffusion * z).exp()
    }

    /// Draw one terminal price.
    #[inline]
    pub fn sample<S: UniformSource + ?Sized>(&self, src: &mut S) -> f64 {
        self.terminal_price(standard_normal(src))
    }

    /// Price every path lands on when sigma = 0.
    #[inline]
    pub fn deterministic_price(&self) -> f64 {
        self.spot * (self.mu * self.t_years).exp()
    }
}
