use crate::simulation::moments::{PayoffTally, StreamingMoments};
use crate::simulation::payoff::PremiumTerms;

/// Below this |net premium| the EV is expressed relative to spot instead.
const PREMIUM_EPSILON: f64 = 1e-12;

/// Reported quantile probabilities, low tail to high tail.
pub const Q_LO: f64 = 0.025;
pub const Q05: f64 = 0.05;
pub const Q25: f64 = 0.25;
pub const Q50: f64 = 0.5;
pub const Q75: f64 = 0.75;
pub const Q95: f64 = 0.95;
pub const Q_HI: f64 = 0.975;

/// Nearest-rank quantile of an ascending slice: index round((len-1)*p),
/// clamped to the slice. No interpolation. None for an empty slice.
#[inline]
pub fn quantile_nearest_rank(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let idx = (last as f64 * p).round();
    let idx = if idx.is_nan() { 0 } else { (idx.max(0.0) as usize).min(last) };
    Some(sorted[idx])
}

/// Final statistics of one simulation run. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SimulationResult {
    #[serde(rename = "meanST")]
    pub mean_st: Option<f64>,
    #[serde(rename = "stdST")]
    pub std_st: Option<f64>,
    #[serde(rename = "qLoST")]
    pub q_lo_st: Option<f64>,
    #[serde(rename = "q05ST")]
    pub q05_st: Option<f64>,
    #[serde(rename = "q25ST")]
    pub q25_st: Option<f64>,
    #[serde(rename = "q50ST")]
    pub q50_st: Option<f64>,
    #[serde(rename = "q75ST")]
    pub q75_st: Option<f64>,
    #[serde(rename = "q95ST")]
    pub q95_st: Option<f64>,
    #[serde(rename = "qHiST")]
    pub q_hi_st: Option<f64>,
    #[serde(rename = "pWin")]
    pub p_win: f64,
    #[serde(rename = "evAbs")]
    pub ev_abs: f64,
    #[serde(rename = "evPct")]
    pub ev_pct: f64,
}

impl SimulationResult {
    /// Reduce the run's accumulators. `sorted_sample` must be ascending.
    pub fn summarize(
        sorted_sample: &[f64],
        moments: &StreamingMoments,
        tally: &PayoffTally,
        premium: &PremiumTerms,
        spot: f64,
    ) -> Self {
        let q = |p| quantile_nearest_rank(sorted_sample, p);
        let ev_abs = tally.ev_abs();

        Self {
            mean_st: moments.mean(),
            std_st: moments.std_dev(),
            q_lo_st: q(Q_LO),
            q05_st: q(Q05),
            q25_st: q(Q25),
            q50_st: q(Q50),
            q75_st: q(Q75),
            q95_st: q(Q95),
            q_hi_st: q(Q_HI),
            p_win: tally.p_win(),
            ev_abs,
            ev_pct: ev_abs / ev_denominator(premium.net_premium, spot),
        }
    }

    /// Quantiles low to high; all None when no draws were retained.
    pub fn quantiles(&self) -> [Option<f64>; 7] {
        [
            self.q_lo_st,
            self.q05_st,
            self.q25_st,
            self.q50_st,
            self.q75_st,
            self.q95_st,
            self.q_hi_st,
        ]
    }
}

#[inline]
fn ev_denominator(net_premium: f64, spot: f64) -> f64 {
    let abs_premium = net_premium.abs();
    if abs_premium > PREMIUM_EPSILON {
        abs_premium
    } else {
        spot
    }
}
