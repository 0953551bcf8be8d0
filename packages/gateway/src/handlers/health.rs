//! `GET /health`: liveness probe. Does not contact the engine.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use super::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::{app, json, send, ScriptedEngine};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn health_answers_without_engine() {
        let engine = ScriptedEngine::replying(vec![]);
        let (status, body) = send(app(engine.clone()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({"status": "ok"}));
        assert!(engine.calls().is_empty());
    }
}
