//! Assembles the Axum [`Router`] from all handler modules.

use std::sync::Arc;

use axum::Router;
use flowgate::SchemaDocument;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::GatewayConfig,
    engine::Engine,
    handlers::{docs, edges, flow, health, nodes, packages, AppState},
};

/// Build the complete application router with shared state.
///
/// The schema document is filled by the registrars here and frozen behind an
/// `Arc` before the first request is served.
pub fn build_router(engine: Arc<dyn Engine>, config: GatewayConfig) -> Router {
    let mut schema = SchemaDocument::new(&config.api_title, &config.api_version);

    let api = Router::new()
        .merge(nodes::register(&mut schema))
        .merge(edges::register(&mut schema))
        .merge(packages::register(&mut schema))
        .merge(flow::register(&mut schema));

    tracing::debug!(paths = schema.paths().len(), "schema document built");

    let state = AppState {
        engine,
        schema: Arc::new(schema),
        config,
    };

    api.merge(docs::routes())
        .merge(health::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// The schema document the gateway serves, without a server URL.
pub fn build_schema(config: &GatewayConfig) -> SchemaDocument {
    let mut schema = SchemaDocument::new(&config.api_title, &config.api_version);
    nodes::document(&mut schema);
    edges::document(&mut schema);
    packages::document(&mut schema);
    flow::document(&mut schema);
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{app, json, send, ScriptedEngine};

    #[tokio::test]
    async fn served_document_matches_standalone_build() {
        let (_, body) = send(app(ScriptedEngine::replying(vec![])), "GET", "/api/v1/swagger", None).await;
        let expected = build_schema(&GatewayConfig::default()).with_server_url("http://localhost");
        assert_eq!(json(&body), expected);
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/nodes")
            .header("origin", "http://editor.local")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app(ScriptedEngine::replying(vec![])).oneshot(req).await.unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = send(app(ScriptedEngine::replying(vec![])), "GET", "/api/nope", None).await;
        assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    }
}
