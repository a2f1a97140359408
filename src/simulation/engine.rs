use crate::errors::{EngineError, EngineResult};
use crate::simulation::gbm::GbmParams;
use crate::simulation::moments::{PayoffTally, StreamingMoments};
use crate::simulation::payoff::Strategy;
use crate::simulation::reservoir::Reservoir;
use crate::simulation::rng::UniformSource;
use crate::simulation::summary::SimulationResult;
use portable_atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allowed range for the number of simulated paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathBounds {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl Default for PathBounds {
    fn default() -> Self {
        Self {
            min: 1_000,
            max: 200_000,
            default: 20_000,
        }
    }
}

impl PathBounds {
    /// Missing or non-finite requests get the default; everything else is
    /// rounded and clamped into `[min, max]`.
    pub fn clamp(&self, requested: Option<f64>) -> usize {
        match requested {
            Some(n) if n.is_finite() => {
                let n = n.round().max(0.0);
                if n >= self.max as f64 {
                    self.max
                } else {
                    (n as usize).max(self.min)
                }
            }
            _ => self.default,
        }
    }
}

/// Validated, immutable inputs for one run.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub gbm: GbmParams,
    pub strategy: Strategy,
    pub path_count: usize,
}

/// Cooperative cancellation flag, checked between chunks of paths.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bookkeeping for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub paths_run: usize,
    pub paths_accepted: usize,
    pub paths_skipped: usize,
    pub paths_won: usize,
    pub reservoir_len: usize,
}

/// One in-flight simulation. Owns every accumulator; nothing outlives it.
pub struct SimulationRun<'a, S: UniformSource + ?Sized> {
    params: &'a SimulationParams,
    src: &'a mut S,
    cost_basis: f64,
    moments: StreamingMoments,
    tally: PayoffTally,
    reservoir: Reservoir,
    drawn: usize,
    skipped: usize,
}

impl<'a, S: UniformSource + ?Sized> SimulationRun<'a, S> {
    pub fn new(params: &'a SimulationParams, src: &'a mut S) -> Self {
        let cost_basis = params.strategy.premium.cost_basis(params.gbm.t_years);
        Self {
            params,
            src,
            cost_basis,
            moments: StreamingMoments::new(),
            tally: PayoffTally::new(),
            reservoir: Reservoir::with_capacity(Reservoir::capacity_for(params.path_count)),
            drawn: 0,
            skipped: 0,
        }
    }

    #[inline]
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.drawn >= self.params.path_count
    }

    /// Simulate up to `max_paths` more paths. Returns how many were drawn.
    pub fn step(&mut self, max_paths: usize) -> usize {
        let n = max_paths.min(self.params.path_count - self.drawn);
        for _ in 0..n {
            let st = self.params.gbm.sample(&mut *self.src);
            let payoff = self.params.strategy.payoff(st, self.cost_basis);

            // Extreme inputs can overflow exp(); keep them out of the accumulators
            if !st.is_finite() || !payoff.is_finite() {
                self.skipped += 1;
                continue;
            }

            self.moments.push(st);
            self.tally.record(payoff);
            self.reservoir.offer(st, &mut *self.src);
        }
        self.drawn += n;
        n
    }

    pub fn finish(self) -> (SimulationResult, RunStats) {
        if self.reservoir.is_empty() {
            tracing::warn!(skipped = self.skipped, "no valid draws, quantiles unavailable");
        }
        let stats = RunStats {
            paths_run: self.drawn,
            paths_accepted: self.tally.paths() as usize,
            paths_skipped: self.skipped,
            paths_won: self.tally.wins() as usize,
            reservoir_len: self.reservoir.len(),
        };
        let sorted = self.reservoir.into_sorted();
        let result = SimulationResult::summarize(
            &sorted,
            &self.moments,
            &self.tally,
            &self.params.strategy.premium,
            self.params.gbm.spot,
        );
        (result, stats)
    }

    fn cancelled(&self) -> EngineError {
        EngineError::Cancelled {
            completed: self.drawn,
            requested: self.params.path_count,
        }
    }
}

/// Run to completion on the current thread, checking `cancel` every `chunk` paths.
pub fn run<S: UniformSource + ?Sized>(
    params: &SimulationParams,
    src: &mut S,
    cancel: &CancelToken,
    chunk: usize,
) -> EngineResult<(SimulationResult, RunStats)> {
    let chunk = chunk.max(1);
    let mut sim = SimulationRun::new(params, src);
    while !sim.is_done() {
        if cancel.is_cancelled() {
            return Err(sim.cancelled());
        }
        sim.step(chunk);
    }
    Ok(sim.finish())
}

/// Same as [`run`], yielding to the tokio scheduler between chunks so a large
/// run does not starve other requests on the same worker.
pub async fn run_async<S: UniformSource + ?Sized>(
    params: &SimulationParams,
    src: &mut S,
    cancel: &CancelToken,
    chunk: usize,
) -> EngineResult<(SimulationResult, RunStats)> {
    let chunk = chunk.max(1);
    let mut sim = SimulationRun::new(params, src);
    while !sim.is_done() {
        if cancel.is_cancelled() {
            return Err(sim.cancelled());
        }
        sim.step(chunk);
        tokio::task::yield_now().await;
    }
    Ok(sim.finish())
}
