//! HTTP request handlers, one submodule per resource family.
//!
//! Every registrar module exposes the same pair:
//!
//! - `document(&mut SchemaDocument)` adds the family's operations to the API
//!   description.
//! - `routes()` returns the family's axum routes.
//!
//! [`register`] in each module runs both, so a route and its documentation
//! are always added together. Handlers are async functions returning
//! `Result<impl IntoResponse, AppError>`; all engine access goes through
//! [`AppState::engine`].

pub mod docs;
pub mod edges;
pub mod flow;
pub mod health;
pub mod nodes;
pub mod packages;

use std::sync::Arc;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use flowgate::SchemaDocument;

use crate::{config::GatewayConfig, engine::Engine, error::AppError};

/// Shared application state threaded through all handlers via
/// [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn Engine>,
    /// Finished at start-up and read-only afterwards.
    pub schema: Arc<SchemaDocument>,
    pub config: GatewayConfig,
}

/// Parse a numeric path segment.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<u32, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {what}: {raw:?}")))
}

/// Answer a JSON document produced by the engine without re-encoding it.
///
/// The text is checked to be JSON first; the body is then sent byte for byte.
pub(crate) fn raw_json(json_data: String) -> Result<Response, AppError> {
    if serde_json::from_str::<serde::de::IgnoredAny>(&json_data).is_err() {
        return Err(AppError::Internal("Invalid JSON received from engine".into()));
    }
    Ok(([(header::CONTENT_TYPE, "application/json")], json_data).into_response())
}

#[cfg(test)]
pub(crate) mod testing {
    //! A scripted engine and request helpers shared by the handler tests.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use flowgate_engine_api::{EngineRequest, EngineResponse};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        config::GatewayConfig,
        engine::{Engine, EngineError},
        router::build_router,
    };

    /// Answers calls from a queue of canned replies and records every request.
    #[derive(Default)]
    pub struct ScriptedEngine {
        replies: Mutex<VecDeque<Result<EngineResponse, EngineError>>>,
        pub calls: Mutex<Vec<EngineRequest>>,
    }

    impl ScriptedEngine {
        pub fn replying(replies: Vec<Result<EngineResponse, EngineError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::default(),
            })
        }

        pub fn calls(&self) -> Vec<EngineRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Engine for ScriptedEngine {
        async fn call(&self, request: EngineRequest) -> Result<EngineResponse, EngineError> {
            self.calls.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(EngineError::Transport("no scripted reply".into())))
        }
    }

    pub fn app(engine: Arc<ScriptedEngine>) -> Router {
        app_with(engine, GatewayConfig::default())
    }

    pub fn app_with(engine: Arc<ScriptedEngine>, config: GatewayConfig) -> Router {
        build_router(engine, config)
    }

    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Vec<u8>) {
        let body = body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty);
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("host", "localhost")
            .body(body)
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub fn json(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    pub fn text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn raw_json_passes_engine_text_through() {
        let body = r#"{"b":1,"a":[2, 3]}"#.to_string();
        let resp = raw_json(body.clone()).unwrap();
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, body.as_bytes());
    }

    #[test]
    fn raw_json_rejects_invalid_engine_text() {
        let err = raw_json("{not json".into()).unwrap_err();
        assert_eq!(
            err,
            AppError::Internal("Invalid JSON received from engine".into())
        );
    }

    #[test]
    fn ids_must_be_unsigned_integers() {
        assert_eq!(parse_id("42", "instance id"), Ok(42));
        assert!(matches!(parse_id("-1", "instance id"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("abc", "edge id"), Err(AppError::BadRequest(_))));
    }
}
