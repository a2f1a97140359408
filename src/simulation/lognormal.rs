use crate::errors::{EngineError, EngineResult};
use crate::simulation::gbm::GbmParams;
use statrs::distribution::{ContinuousCDF, Normal};

/// Closed-form terminal-price distribution under GBM.
///
/// ln(S_T) ~ N(ln S_0 + (mu - sigma^2/2) T, sigma^2 T)
///
/// E[S_T] = S_0 * exp(mu * T)
/// q(p)   = S_0 * exp((mu - sigma^2/2) T + sigma sqrt(T) * Phi^-1(p))
///
/// Reported next to the sampled statistics so callers can see the noise.
pub struct LognormalReference {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

/// Analytic counterparts of the headline sampled statistics.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AnalyticSummary {
    #[serde(rename = "meanST")]
    pub mean_st: f64,
    #[serde(rename = "q05ST")]
    pub q05_st: f64,
    #[serde(rename = "q50ST")]
    pub q50_st: f64,
    #[serde(rename = "q95ST")]
    pub q95_st: f64,
}

impl LognormalReference {
    pub fn new() -> EngineResult<Self> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| EngineError::Model(format!("standard normal: {e}")))?;
        Ok(Self { normal })
    }

    #[inline]
    pub fn mean(&self, params: &GbmParams) -> f64 {
        params.deterministic_price()
    }

    /// Terminal-price quantile at probability `p` in (0, 1).
    pub fn quantile(&self, params: &GbmParams, p: f64) -> f64 {
        // Degenerate: the stochastic term vanishes
        if params.diffusion < 1e-12 {
            return params.terminal_price(0.0);
        }
        let z = self.normal.inverse_cdf(p.clamp(1e-12, 1.0 - 1e-12));
        params.terminal_price(z)
    }

    pub fn summary(&self, params: &GbmParams) -> AnalyticSummary {
        AnalyticSummary {
            mean_st: self.mean(params),
            q05_st: self.quantile(params, 0.05),
            q50_st: self.quantile(params, 0.5),
            q95_st: self.quantile(params, 0.95),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_is_zero_shock() {
        let reference = LognormalReference::new().unwrap();
        let params = GbmParams::new(100.0, 0.05, 0.25, 365.0);
        let median = reference.quantile(&params, 0.5);
        assert!((median - params.terminal_price(0.0)).abs() < 1e-8, "median={median}");
    }

    #[test]
    fn test_quantiles_ordered() {
        let reference = LognormalReference::new().unwrap();
        let params = GbmParams::new(100.0, 0.0, 0.4, 90.0);
        let s = reference.summary(&params);
        assert!(s.q05_st < s.q50_st && s.q50_st < s.q95_st);
        // Lognormal mean sits above the median
        assert!(s.mean_st > s.q50_st);
    }

    #[test]
    fn test_degenerate_vol() {
        let reference = LognormalReference::new().unwrap();
        let params = GbmParams::new(80.0, 0.1, 0.0, 365.0);
        let s = reference.summary(&params);
        let target = 80.0 * 0.1_f64.exp();
        for v in [s.mean_st, s.q05_st, s.q50_st, s.q95_st] {
            assert!((v - target).abs() < 1e-10);
        }
    }
}
