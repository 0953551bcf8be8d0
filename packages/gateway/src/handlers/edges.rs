//! Edge endpoints: `POST /api/edges` and `DELETE /api/edges/{edgeId}`.

use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use flowgate::{
    openapi::{json_response, object_schema, parameter},
    Operation, ParameterLocation, SchemaDocument, SchemaType,
};
use flowgate_engine_api::EdgeDetails;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, extract::Payload};

use super::{parse_id, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEdgeBody {
    pub from_instance_id: u32,
    pub to_instance_id: u32,
    pub out_name: String,
    pub in_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeAddedBody {
    pub edge_id: u32,
    pub data_only: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedEdgeBody {
    pub edge_id: u32,
}

/// `POST /api/edges`: connect an output to an input.
pub async fn add(
    State(state): State<AppState>,
    Payload(body): Payload<AddEdgeBody>,
) -> Result<Json<EdgeAddedBody>, AppError> {
    let added = state
        .engine
        .add_edge(EdgeDetails {
            from_instance_id: body.from_instance_id,
            to_instance_id: body.to_instance_id,
            out_name: body.out_name,
            in_name: body.in_name,
        })
        .await?;
    tracing::info!(edge_id = added.edge_id, data_only = added.data_only, "edge added");
    Ok(Json(EdgeAddedBody {
        edge_id: added.edge_id,
        data_only: added.data_only,
    }))
}

/// `DELETE /api/edges/{edgeId}`: answers 200 with the removed id.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemovedEdgeBody>, AppError> {
    let edge_id = parse_id(&id, "edge id")?;
    let edge_id = state.engine.remove_edge(edge_id).await?;
    tracing::info!(edge_id, "edge removed");
    Ok(Json(RemovedEdgeBody { edge_id }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/edges", post(add))
        .route("/api/edges/{id}", delete(remove))
}

pub fn document(doc: &mut SchemaDocument) {
    let edge_response = object_schema(&[
        ("edgeId", SchemaType::Integer),
        ("dataOnly", SchemaType::Boolean),
    ]);

    doc.add_endpoint(
        "/api/edges",
        "POST",
        Operation::new("Add a new edge")
            .request_body(object_schema(&[
                ("fromInstanceId", SchemaType::Integer),
                ("toInstanceId", SchemaType::Integer),
                ("outName", SchemaType::String),
                ("inName", SchemaType::String),
            ]))
            .response(200, json_response("Edge added successfully", edge_response)),
    );

    doc.add_endpoint(
        "/api/edges/{edgeId}",
        "DELETE",
        Operation::new("Remove an edge")
            .parameter(parameter(
                "edgeId",
                ParameterLocation::Path,
                true,
                SchemaType::Integer,
                "ID of the edge to remove",
            ))
            .response(
                200,
                json_response(
                    "Edge removed successfully",
                    object_schema(&[("edgeId", SchemaType::Integer)]),
                ),
            ),
    );
}

pub fn register(doc: &mut SchemaDocument) -> Router<AppState> {
    document(doc);
    routes()
}
