//! `GET /api/flow`: the engine's export of the whole flow graph.

use axum::{extract::State, response::Response, routing::get, Router};
use flowgate::{openapi::json_response, Operation, SchemaDocument};
use serde_json::json;

use crate::error::AppError;

use super::{raw_json, AppState};

pub async fn get_flow(State(state): State<AppState>) -> Result<Response, AppError> {
    raw_json(state.engine.get_flow_json().await?)
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/flow", get(get_flow))
}

pub fn document(doc: &mut SchemaDocument) {
    doc.add_endpoint(
        "/api/flow",
        "GET",
        Operation::new("Get flow JSON data").response(
            200,
            json_response(
                "Flow JSON data retrieved successfully",
                json!({ "type": "object", "description": "Flow graph JSON structure" }),
            ),
        ),
    );
}

pub fn register(doc: &mut SchemaDocument) -> Router<AppState> {
    document(doc);
    routes()
}
