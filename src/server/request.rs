use crate::errors::{EngineError, EngineResult};
use crate::simulation::engine::{PathBounds, SimulationParams};
use crate::simulation::gbm::GbmParams;
use crate::simulation::payoff::{LegKind, LegSpec, PremiumTerms, Strategy};

/// Body of `POST /api/montecarlo`. Every field is optional on the wire so
/// missing values surface as our own bad-input errors, not serde's.
#[derive(Debug, Default, serde::Deserialize)]
pub struct MonteCarloRequest {
    pub spot: Option<f64>,
    pub mu: Option<f64>,
    pub sigma: Option<f64>,
    #[serde(rename = "Tdays")]
    pub t_days: Option<f64>,
    pub paths: Option<f64>,
    pub legs: Option<LegsInput>,
    #[serde(rename = "netPremium")]
    pub net_premium: Option<f64>,
    #[serde(rename = "carryPremium")]
    pub carry_premium: Option<bool>,
    #[serde(rename = "riskFree")]
    pub risk_free: Option<f64>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct LegsInput {
    pub lc: Option<LegInput>,
    pub sc: Option<LegInput>,
    pub lp: Option<LegInput>,
    pub sp: Option<LegInput>,
}

#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct LegInput {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "K")]
    pub strike: Option<f64>,
    pub qty: Option<f64>,
}

impl LegsInput {
    fn specs(&self) -> impl Iterator<Item = (LegKind, LegSpec)> + '_ {
        LegKind::ALL.into_iter().filter_map(move |kind| {
            let input = match kind {
                LegKind::LongCall => self.lc,
                LegKind::ShortCall => self.sc,
                LegKind::LongPut => self.lp,
                LegKind::ShortPut => self.sp,
            }?;
            // Missing strike/qty on an enabled leg fails validation downstream
            Some((
                kind,
                LegSpec {
                    enabled: input.enabled,
                    strike: input.strike.unwrap_or(f64::NAN),
                    quantity: input.qty.unwrap_or(f64::NAN),
                },
            ))
        })
    }
}

impl MonteCarloRequest {
    /// Validate and convert into engine parameters. Rejects before any
    /// simulation work starts.
    pub fn into_params(&self, bounds: &PathBounds) -> EngineResult<SimulationParams> {
        let spot = positive("spot", self.spot)?;
        let t_days = positive("Tdays", self.t_days)?;
        let mu = finite_or_zero("mu", self.mu)?;
        let sigma = finite_or_zero("sigma", self.sigma)?;
        if sigma < 0.0 {
            return Err(EngineError::BadInput(format!("sigma must be >= 0, got {sigma}")));
        }

        let premium = PremiumTerms {
            net_premium: finite_or_zero("netPremium", self.net_premium)?,
            carry_to_expiry: self.carry_premium.unwrap_or(false),
            risk_free: finite_or_zero("riskFree", self.risk_free)?,
        };

        Ok(SimulationParams {
            gbm: GbmParams::new(spot, mu, sigma, t_days),
            strategy: Strategy::from_specs(
                self.legs.iter().flat_map(|legs| legs.specs()),
                premium,
            ),
            path_count: bounds.clamp(self.paths),
        })
    }
}

fn positive(name: &str, value: Option<f64>) -> EngineResult<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(EngineError::BadInput(format!("{name} must be a finite number > 0, got {v}"))),
        None => Err(EngineError::BadInput(format!("{name} is required"))),
    }
}

fn finite_or_zero(name: &str, value: Option<f64>) -> EngineResult<f64> {
    match value {
        None => Ok(0.0),
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(EngineError::BadInput(format!("{name} must be finite, got {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: serde_json::Value) -> MonteCarloRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_full_request() {
        let req = parse(serde_json::json!({
            "spot": 100, "mu": 0.05, "sigma": 0.2, "Tdays": 30, "paths": 5000,
            "legs": {
                "lc": { "enabled": true, "K": 100, "qty": 1 },
                "sc": { "enabled": true, "K": 110, "qty": 1 },
                "lp": { "enabled": false, "K": 90, "qty": 1 }
            },
            "netPremium": 3.5, "carryPremium": true, "riskFree": 0.04
        }));
        let p = req.into_params(&PathBounds::default()).unwrap();
        assert_eq!(p.path_count, 5000);
        assert_eq!(p.gbm.spot, 100.0);
        assert_eq!(p.strategy.legs().len(), 2);
        assert_eq!(p.strategy.legs()[1].kind, LegKind::ShortCall);
        assert!(p.strategy.premium.carry_to_expiry);
        assert_eq!(p.strategy.premium.risk_free, 0.04);
    }

    #[test]
    fn test_defaults() {
        let req = parse(serde_json::json!({ "spot": 42.0, "Tdays": 10 }));
        let p = req.into_params(&PathBounds::default()).unwrap();
        assert_eq!(p.path_count, 20_000);
        assert_eq!(p.gbm.mu, 0.0);
        assert_eq!(p.gbm.sigma, 0.0);
        assert_eq!(p.strategy.premium, PremiumTerms::default());
        assert!(p.strategy.legs().is_empty());
    }

    #[test]
    fn test_rejects_bad_spot_and_horizon() {
        let bounds = PathBounds::default();
        for body in [
            serde_json::json!({ "Tdays": 10 }),
            serde_json::json!({ "spot": 0, "Tdays": 10 }),
            serde_json::json!({ "spot": -5, "Tdays": 10 }),
            serde_json::json!({ "spot": 100 }),
            serde_json::json!({ "spot": 100, "Tdays": 0 }),
            serde_json::json!({ "spot": 100, "Tdays": 10, "sigma": -0.1 }),
        ] {
            let err = parse(body.clone()).into_params(&bounds).unwrap_err();
            assert!(matches!(err, EngineError::BadInput(_)), "{body} -> {err}");
        }
    }

    #[test]
    fn test_enabled_leg_missing_strike_is_skipped() {
        let req = parse(serde_json::json!({
            "spot": 100, "Tdays": 30,
            "legs": { "lp": { "enabled": true, "qty": 2 }, "sp": { "enabled": true, "K": 95, "qty": 1 } }
        }));
        let p = req.into_params(&PathBounds::default()).unwrap();
        assert_eq!(p.strategy.skipped_legs(), &[LegKind::LongPut]);
        assert_eq!(p.strategy.legs().len(), 1);
    }

    #[test]
    fn test_null_legs_accepted() {
        let req = parse(serde_json::json!({ "spot": 10, "Tdays": 3, "legs": null }));
        assert!(req.into_params(&PathBounds::default()).unwrap().strategy.legs().is_empty());
    }

    #[test]
    fn test_paths_clamped() {
        let bounds = PathBounds::default();
        let big = parse(serde_json::json!({ "spot": 1, "Tdays": 1, "paths": 1_000_000 }));
        assert_eq!(big.into_params(&bounds).unwrap().path_count, 200_000);
        let small = parse(serde_json::json!({ "spot": 1, "Tdays": 1, "paths": 3 }));
        assert_eq!(small.into_params(&bounds).unwrap().path_count, 1_000);
    }
}
