use payoff_lab::state::AppState;
use payoff_lab::{config, server};

#[tokio::main]
async fn main() {
    // Structured logging (line-buffered to stderr)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("payoff_lab starting");

    // Load config
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        min_paths = cfg.path_bounds.min,
        max_paths = cfg.path_bounds.max,
        default_paths = cfg.path_bounds.default,
        yield_every = cfg.yield_every,
        timeout_ms = cfg.timeout_ms,
        "simulation limits"
    );

    let port = cfg.server_port;
    let app_state = match AppState::new(cfg) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("state init error: {e}");
            std::process::exit(1);
        }
    };

    let app = server::router(app_state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
