//! API description endpoints: `GET /api/v1/swagger` (the OpenAPI document)
//! and `GET /swagger` (a Swagger UI page that loads it).

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Html,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::AppState;

const SWAGGER_UI: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
    <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
</head>
<body>
    <div id="swagger-ui"></div>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: "/api/v1/swagger",
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: "BaseLayout"
            });
        }
    </script>
</body>
</html>
"#;

/// `GET /api/v1/swagger`
///
/// The first server entry points at `http://<Host>` of this request, or at
/// the configured public URL when the request has no usable `Host` header.
pub async fn openapi(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let url = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(|host| format!("http://{host}"))
        .unwrap_or_else(|| state.config.public_url.clone());
    Json(state.schema.with_server_url(&url))
}

/// `GET /swagger`
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

/// The documentation routes. They describe the API and are not part of it,
/// so nothing is added to the schema document.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/swagger", get(openapi))
        .route("/swagger", get(swagger_ui))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        config::GatewayConfig,
        handlers::testing::{app, app_with, json, send, text, ScriptedEngine},
    };

    #[tokio::test]
    async fn server_url_follows_request_host() {
        let engine = ScriptedEngine::replying(vec![]);
        let req = Request::builder()
            .uri("/api/v1/swagger")
            .header("host", "example.com")
            .body(Body::empty())
            .unwrap();
        let resp = app(engine.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let doc = json(&bytes);
        assert_eq!(doc["servers"][0]["url"], "http://example.com");
        assert_eq!(doc["openapi"], "3.0.0");
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn concurrent_hosts_do_not_leak_into_each_other() {
        let router = app(ScriptedEngine::replying(vec![]));
        let fetch = |host: &'static str| {
            let router = router.clone();
            async move {
                let req = Request::builder()
                    .uri("/api/v1/swagger")
                    .header("host", host)
                    .body(Body::empty())
                    .unwrap();
                let resp = router.oneshot(req).await.unwrap();
                json(&resp.into_body().collect().await.unwrap().to_bytes())
            }
        };
        let (a, b) = tokio::join!(fetch("a.example"), fetch("b.example:8080"));
        assert_eq!(a["servers"][0]["url"], "http://a.example");
        assert_eq!(b["servers"][0]["url"], "http://b.example:8080");
    }

    #[tokio::test]
    async fn missing_host_falls_back_to_public_url() {
        let config = GatewayConfig {
            public_url: "https://flows.example.com".into(),
            ..GatewayConfig::default()
        };
        let router = app_with(ScriptedEngine::replying(vec![]), config);
        let req = Request::builder()
            .uri("/api/v1/swagger")
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let doc = json(&resp.into_body().collect().await.unwrap().to_bytes());
        assert_eq!(doc["servers"][0]["url"], "https://flows.example.com");
    }

    #[tokio::test]
    async fn document_lists_every_api_path_in_registration_order() {
        let (_, body) = send(
            app(Arc::new(ScriptedEngine::default())),
            "GET",
            "/api/v1/swagger",
            None,
        )
        .await;
        let doc = json(&body);
        let paths: Vec<&str> = doc["paths"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            paths,
            [
                "/api/nodes/{instanceId}/default",
                "/api/nodes/{instanceId}/override",
                "/api/nodes/{instanceId}/fallback",
                "/api/nodes",
                "/api/nodes/{instanceId}",
                "/api/edges",
                "/api/edges/{edgeId}",
                "/api/packages",
                "/api/packages/{packageId}/json",
                "/api/flow",
            ]
        );
        let methods: Vec<&str> = doc["paths"]["/api/nodes"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(methods, ["post", "put", "get"]);
        assert_eq!(doc["info"]["title"], "Flow Engine API");
    }

    #[tokio::test]
    async fn swagger_ui_loads_the_document() {
        let (status, body) = send(app(ScriptedEngine::replying(vec![])), "GET", "/swagger", None).await;
        assert_eq!(status, StatusCode::OK);
        let html = text(&body);
        assert!(html.contains("swagger-ui-dist@5"));
        assert!(html.contains(r#"url: "/api/v1/swagger""#));
    }
}
