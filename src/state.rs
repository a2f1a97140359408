use crate::config::AppConfig;
use crate::errors::EngineResult;
use crate::simulation::lognormal::LognormalReference;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Performance Counters (lock-free) ──

pub struct PerfCounters {
    pub simulations_run: AtomicU64,
    pub paths_simulated: AtomicU64,
    pub paths_skipped: AtomicU64,
    pub requests_rejected: AtomicU64,
    pub simulations_cancelled: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            simulations_run: AtomicU64::new(0),
            paths_simulated: AtomicU64::new(0),
            paths_skipped: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            simulations_cancelled: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        use Ordering::Relaxed;
        CountersSnapshot {
            simulations_run: self.simulations_run.load(Relaxed),
            paths_simulated: self.paths_simulated.load(Relaxed),
            paths_skipped: self.paths_skipped.load(Relaxed),
            requests_rejected: self.requests_rejected.load(Relaxed),
            simulations_cancelled: self.simulations_cancelled.load(Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CountersSnapshot {
    pub simulations_run: u64,
    pub paths_simulated: u64,
    pub paths_skipped: u64,
    pub requests_rejected: u64,
    pub simulations_cancelled: u64,
}

// ── Application shared state (no locks, no cross-request simulation state) ──

pub struct AppState {
    pub config: AppConfig,
    /// Closed-form reference (created once, reused)
    pub reference: LognormalReference,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> EngineResult<Arc<Self>> {
        Ok(Arc::new(Self {
            config,
            reference: LognormalReference::new()?,
            counters: PerfCounters::new(),
        }))
    }
}
