use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Domain-specific error types for the simulation service.
/// Every failure surfaces synchronously to the caller:
/// - Bad input is rejected before any path is drawn
/// - A cancelled run never yields a partial result
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("simulation cancelled after {completed} of {requested} paths")]
    Cancelled { completed: usize, requested: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("model computation error: {0}")]
    Model(String),
}

impl EngineError {
    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::BadInput(_) => StatusCode::BAD_REQUEST,
            EngineError::Cancelled { .. } => StatusCode::REQUEST_TIMEOUT,
            EngineError::Config(_) | EngineError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "ok": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(EngineError::BadInput("spot".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            EngineError::Cancelled { completed: 5000, requested: 20000 }.status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            EngineError::Model("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cancelled_message_names_progress() {
        let e = EngineError::Cancelled { completed: 5000, requested: 20000 };
        assert_eq!(e.to_string(), "simulation cancelled after 5000 of 20000 paths");
    }
}
