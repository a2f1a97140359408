use crate::errors::EngineError;
use crate::server::request::MonteCarloRequest;
use crate::simulation::engine::{self, CancelToken, RunStats};
use crate::simulation::lognormal::AnalyticSummary;
use crate::simulation::payoff::LegKind;
use crate::simulation::summary::SimulationResult;
use crate::state::{AppState, CountersSnapshot};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use portable_atomic::Ordering::Relaxed;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, serde::Serialize)]
pub struct MonteCarloResponse {
    pub ok: bool,
    pub data: SimulationResult,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub run_id: String,
    pub paths_requested: Option<f64>,
    pub paths_run: usize,
    pub paths_skipped: usize,
    pub paths_won: usize,
    pub reservoir_size: usize,
    pub skipped_legs: Vec<LegKind>,
    pub elapsed_ms: f64,
    pub generated_at: String,
    pub analytic: AnalyticSummary,
}

impl Diagnostics {
    fn new(
        run_id: uuid::Uuid,
        request: &MonteCarloRequest,
        stats: &RunStats,
        skipped_legs: &[LegKind],
        elapsed: Duration,
        analytic: AnalyticSummary,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            paths_requested: request.paths,
            paths_run: stats.paths_run,
            paths_skipped: stats.paths_skipped,
            paths_won: stats.paths_won,
            reservoir_size: stats.reservoir_len,
            skipped_legs: skipped_legs.to_vec(),
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            generated_at: chrono::Utc::now().to_rfc3339(),
            analytic,
        }
    }
}

/// POST /api/montecarlo -- run one payoff simulation
pub async fn post_montecarlo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MonteCarloRequest>, JsonRejection>,
) -> Result<Json<MonteCarloResponse>, EngineError> {
    let reject = |e: EngineError| {
        state.counters.requests_rejected.fetch_add(1, Relaxed);
        tracing::warn!(error = %e, "montecarlo request rejected");
        e
    };

    let Json(request) = payload.map_err(|e| reject(EngineError::BadInput(e.body_text())))?;
    let params = request
        .into_params(&state.config.path_bounds)
        .map_err(reject)?;

    let run_id = uuid::Uuid::new_v4();
    let cancel = CancelToken::new();
    let deadline = {
        let cancel = cancel.clone();
        let timeout = Duration::from_millis(state.config.timeout_ms);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        })
    };

    let started = Instant::now();
    let mut rng = StdRng::from_entropy();
    let outcome = engine::run_async(&params, &mut rng, &cancel, state.config.yield_every).await;
    deadline.abort();
    let elapsed = started.elapsed();

    let (result, stats) = match outcome {
        Ok(done) => done,
        Err(e) => {
            if matches!(e, EngineError::Cancelled { .. }) {
                state.counters.simulations_cancelled.fetch_add(1, Relaxed);
            }
            tracing::warn!(run_id = %run_id, error = %e, "simulation aborted");
            return Err(e);
        }
    };

    state.counters.simulations_run.fetch_add(1, Relaxed);
    state.counters.paths_simulated.fetch_add(stats.paths_run as u64, Relaxed);
    state.counters.paths_skipped.fetch_add(stats.paths_skipped as u64, Relaxed);

    tracing::info!(
        run_id = %run_id,
        spot = params.gbm.spot,
        mu = params.gbm.mu,
        sigma = params.gbm.sigma,
        paths = stats.paths_run,
        skipped = stats.paths_skipped,
        legs = params.strategy.legs().len(),
        p_win = result.p_win,
        ev_abs = result.ev_abs,
        elapsed_ms = elapsed.as_millis() as u64,
        "simulation complete"
    );

    let analytic = state.reference.summary(&params.gbm);
    let diagnostics = Diagnostics::new(
        run_id,
        &request,
        &stats,
        params.strategy.skipped_legs(),
        elapsed,
        analytic,
    );

    Ok(Json(MonteCarloResponse {
        ok: true,
        data: result,
        diagnostics,
    }))
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<CountersSnapshot> {
    Json(state.counters.snapshot())
}

/// GET /api/health
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
