use crate::errors::{EngineError, EngineResult};
use crate::simulation::engine::PathBounds;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub path_bounds: PathBounds,
    /// Paths simulated between cooperative yields / cancellation checks
    pub yield_every: usize,
    /// Per-request deadline before the run's cancel token is tripped
    pub timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = parse_env("SERVER_PORT", "3001")?;
        let min_paths = parse_env("MC_MIN_PATHS", "1000")?;
        let max_paths = parse_env("MC_MAX_PATHS", "200000")?;
        let default_paths = parse_env("MC_DEFAULT_PATHS", "20000")?;
        let yield_every = parse_env("MC_YIELD_EVERY", "5000")?;
        let timeout_ms = parse_env("MC_TIMEOUT_MS", "10000")?;

        Self::build(server_port, min_paths, max_paths, default_paths, yield_every, timeout_ms)
    }

    fn build(
        server_port: u16,
        min_paths: usize,
        max_paths: usize,
        default_paths: usize,
        yield_every: usize,
        timeout_ms: u64,
    ) -> EngineResult<Self> {
        if min_paths == 0 || min_paths > max_paths {
            return Err(EngineError::Config(format!(
                "MC_MIN_PATHS ({min_paths}) must be in 1..=MC_MAX_PATHS ({max_paths})"
            )));
        }
        if !(min_paths..=max_paths).contains(&default_paths) {
            return Err(EngineError::Config(format!(
                "MC_DEFAULT_PATHS ({default_paths}) outside [{min_paths}, {max_paths}]"
            )));
        }
        if yield_every == 0 {
            return Err(EngineError::Config("MC_YIELD_EVERY must be positive".into()));
        }
        if timeout_ms == 0 {
            return Err(EngineError::Config("MC_TIMEOUT_MS must be positive".into()));
        }

        Ok(Self {
            server_port,
            path_bounds: PathBounds {
                min: min_paths,
                max: max_paths,
                default: default_paths,
            },
            yield_every,
            timeout_ms,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            path_bounds: PathBounds::default(),
            yield_every: 5000,
            timeout_ms: 10_000,
        }
    }
}

fn parse_env<T>(key: &str, default: &str) -> EngineResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var_or(key, default)
        .parse::<T>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
