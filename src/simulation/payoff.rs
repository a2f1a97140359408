use smallvec::SmallVec;

/// The four option positions a strategy can hold at most once each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LegKind {
    #[serde(rename = "lc")]
    LongCall,
    #[serde(rename = "sc")]
    ShortCall,
    #[serde(rename = "lp")]
    LongPut,
    #[serde(rename = "sp")]
    ShortPut,
}

impl LegKind {
    pub const ALL: [LegKind; 4] = [
        LegKind::LongCall,
        LegKind::ShortCall,
        LegKind::LongPut,
        LegKind::ShortPut,
    ];

    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            LegKind::LongCall | LegKind::LongPut => 1.0,
            LegKind::ShortCall | LegKind::ShortPut => -1.0,
        }
    }

    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, LegKind::LongCall | LegKind::ShortCall)
    }
}

impl std::fmt::Display for LegKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LongCall => write!(f, "long call"),
            Self::ShortCall => write!(f, "short call"),
            Self::LongPut => write!(f, "long put"),
            Self::ShortPut => write!(f, "short put"),
        }
    }
}

/// Raw leg as supplied by a caller, before validation.
#[derive(Debug, Clone, Copy)]
pub struct LegSpec {
    pub enabled: bool,
    pub strike: f64,
    pub quantity: f64,
}

/// A validated, enabled leg. Strike and quantity are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub kind: LegKind,
    pub strike: f64,
    pub quantity: f64,
}

impl Leg {
    /// Signed expiry payoff of this leg at terminal price `st`.
    #[inline]
    pub fn payoff(&self, st: f64) -> f64 {
        let intrinsic = if self.kind.is_call() {
            (st - self.strike).max(0.0)
        } else {
            (self.strike - st).max(0.0)
        };
        self.kind.sign() * intrinsic * self.quantity
    }
}

/// Premium terms of the structure. `net_premium` is paid (+) or received (-).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct PremiumTerms {
    pub net_premium: f64,
    pub carry_to_expiry: bool,
    pub risk_free: f64,
}

impl Default for PremiumTerms {
    fn default() -> Self {
        Self {
            net_premium: 0.0,
            carry_to_expiry: false,
            risk_free: 0.0,
        }
    }
}

impl PremiumTerms {
    /// Net premium compounded to expiry when carry is enabled.
    #[inline]
    pub fn cost_basis(&self, t_years: f64) -> f64 {
        if self.carry_to_expiry {
            self.net_premium * (self.risk_free * t_years).exp()
        } else {
            self.net_premium
        }
    }
}

/// Multi-leg option structure. Holds at most one leg per [`LegKind`].
#[derive(Debug, Clone, Default)]
pub struct Strategy {
    legs: SmallVec<[Leg; 4]>,
    skipped: SmallVec<[LegKind; 4]>,
    pub premium: PremiumTerms,
}

impl Strategy {
    /// Build a strategy from raw legs. Disabled legs are dropped silently;
    /// enabled legs with a non-finite or negative strike/quantity are
    /// dropped with a warning and listed in [`Strategy::skipped_legs`].
    pub fn from_specs<I>(specs: I, premium: PremiumTerms) -> Self
    where
        I: IntoIterator<Item = (LegKind, LegSpec)>,
    {
        let mut legs: SmallVec<[Leg; 4]> = SmallVec::new();
        let mut skipped: SmallVec<[LegKind; 4]> = SmallVec::new();

        for (kind, spec) in specs {
            if !spec.enabled {
                continue;
            }
            if legs.iter().any(|l| l.kind == kind) {
                tracing::warn!(leg = %kind, "duplicate leg ignored");
                continue;
            }
            let valid = spec.strike.is_finite()
                && spec.strike >= 0.0
                && spec.quantity.is_finite()
                && spec.quantity >= 0.0;
            if !valid {
                tracing::warn!(
                    leg = %kind,
                    strike = spec.strike,
                    quantity = spec.quantity,
                    "leg has invalid strike/quantity, treating as disabled"
                );
                skipped.push(kind);
                continue;
            }
            legs.push(Leg {
                kind,
                strike: spec.strike,
                quantity: spec.quantity,
            });
        }

        Self {
            legs,
            skipped,
            premium,
        }
    }

    #[inline]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    #[inline]
    pub fn skipped_legs(&self) -> &[LegKind] {
        &self.skipped
    }

    /// Sum of signed leg payoffs at `st`, premium excluded.
    #[inline]
    pub fn legs_payoff(&self, st: f64) -> f64 {
        self.legs.iter().map(|leg| leg.payoff(st)).sum()
    }

    /// Per-path payoff net of the (carry-adjusted) premium. Pure function.
    #[inline]
    pub fn payoff(&self, st: f64, cost_basis: f64) -> f64 {
        self.legs_payoff(st) - cost_basis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(strike: f64, quantity: f64) -> LegSpec {
        LegSpec {
            enabled: true,
            strike,
            quantity,
        }
    }

    #[test]
    fn test_single_leg_payoffs() {
        let lc = Leg { kind: LegKind::LongCall, strike: 100.0, quantity: 2.0 };
        let sp = Leg { kind: LegKind::ShortPut, strike: 90.0, quantity: 1.0 };
        assert_eq!(lc.payoff(110.0), 20.0);
        assert_eq!(lc.payoff(95.0), 0.0);
        assert_eq!(sp.payoff(80.0), -10.0);
        assert_eq!(sp.payoff(95.0), 0.0);
    }

    #[test]
    fn test_bull_call_spread() {
        let s = Strategy::from_specs(
            [
                (LegKind::LongCall, spec(100.0, 1.0)),
                (LegKind::ShortCall, spec(110.0, 1.0)),
            ],
            PremiumTerms { net_premium: 4.0, ..Default::default() },
        );
        let cost = s.premium.cost_basis(1.0);
        assert_eq!(s.payoff(90.0, cost), -4.0);
        assert_eq!(s.payoff(105.0, cost), 1.0);
        // Capped above the short strike
        assert_eq!(s.payoff(150.0, cost), 6.0);
    }

    #[test]
    fn test_short_straddle_credit() {
        let s = Strategy::from_specs(
            [
                (LegKind::ShortCall, spec(100.0, 1.0)),
                (LegKind::ShortPut, spec(100.0, 1.0)),
            ],
            PremiumTerms { net_premium: -8.0, ..Default::default() },
        );
        let cost = s.premium.cost_basis(0.5);
        assert_eq!(s.payoff(100.0, cost), 8.0);
        assert_eq!(s.payoff(112.0, cost), -4.0);
        assert_eq!(s.payoff(92.0, cost), 0.0);
    }

    #[test]
    fn test_disabled_and_invalid_legs_contribute_zero() {
        let s = Strategy::from_specs(
            [
                (LegKind::LongCall, LegSpec { enabled: false, strike: 50.0, quantity: 1.0 }),
                (LegKind::ShortCall, spec(f64::NAN, 1.0)),
                (LegKind::LongPut, spec(100.0, -1.0)),
                (LegKind::ShortPut, spec(100.0, f64::INFINITY)),
            ],
            PremiumTerms::default(),
        );
        assert!(s.legs().is_empty());
        assert_eq!(
            s.skipped_legs(),
            &[LegKind::ShortCall, LegKind::LongPut, LegKind::ShortPut]
        );
        assert_eq!(s.payoff(1_000.0, 0.0), 0.0);
        assert_eq!(s.payoff(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_payoff_is_pure() {
        let s = Strategy::from_specs(
            [
                (LegKind::LongPut, spec(95.0, 3.0)),
                (LegKind::ShortCall, spec(120.0, 0.5)),
            ],
            PremiumTerms { net_premium: 1.25, carry_to_expiry: true, risk_free: 0.05 },
        );
        let cost = s.premium.cost_basis(0.75);
        for st in [10.0, 95.0, 101.3, 130.0] {
            assert_eq!(s.payoff(st, cost).to_bits(), s.payoff(st, cost).to_bits());
        }
    }

    #[test]
    fn test_premium_carry() {
        let terms = PremiumTerms { net_premium: 5.0, carry_to_expiry: true, risk_free: 0.04 };
        assert!((terms.cost_basis(0.5) - 5.0 * 0.02_f64.exp()).abs() < 1e-12);

        let no_carry = PremiumTerms { carry_to_expiry: false, ..terms };
        assert_eq!(no_carry.cost_basis(0.5), 5.0);
    }

    #[test]
    fn test_duplicate_kind_keeps_first() {
        let s = Strategy::from_specs(
            [
                (LegKind::LongCall, spec(100.0, 1.0)),
                (LegKind::LongCall, spec(200.0, 1.0)),
            ],
            PremiumTerms::default(),
        );
        assert_eq!(s.legs().len(), 1);
        assert_eq!(s.legs()[0].strike, 100.0);
    }
}
