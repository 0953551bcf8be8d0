//! Node endpoints: lifecycle, listing, and per-slot value control.
//!
//! | Method | Path | Engine call |
//! |--------|------|-------------|
//! | POST | `/api/nodes` | `add_node` |
//! | PUT | `/api/nodes` | `update_node` |
//! | GET | `/api/nodes` | `get_all_values` |
//! | DELETE | `/api/nodes/{instanceId}` | `remove_node` |
//! | PUT | `/api/nodes/{instanceId}/default` | `set_default` |
//! | PUT | `/api/nodes/{instanceId}/override` | `set_override` |
//! | PUT | `/api/nodes/{instanceId}/fallback` | `set_fallback` |

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use flowgate::{
    openapi::{
        array_schema, empty_response, flex_value_schema, json_response, object_schema, parameter,
        type_schema, with_properties,
    },
    DoubleFormat, FlexValue, Operation, ParameterLocation, SchemaDocument, SchemaType,
};
use flowgate_engine_api::{Io, Node, NodeDetails, NodePosition, NodeSummary, OverrideUpdate, ValueUpdate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{error::AppError, extract::Payload};

use super::{parse_id, AppState};

// ---------------------------------------------------------------------------
// Request and response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNodeBody {
    pub package_id: u32,
    pub node_id: u32,
    pub parent_id: u32,
    pub pos_x: u32,
    pub pos_y: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNodeBody {
    pub instance_id: u32,
    pub pos_x: u32,
    pub pos_y: u32,
}

/// Body of the default and fallback endpoints.
///
/// `value` must be present, but may be any JSON; non-scalars reach the engine
/// as an unset value.
#[derive(Debug, Deserialize)]
pub struct ValueBody {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct OverrideBody {
    pub name: String,
    pub value: Value,
    /// Milliseconds the override stays in force.
    pub duration: u64,
    pub active: bool,
    /// `true` to override an input slot, `false` for an output slot.
    pub input: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummaryBody {
    pub instance_id: u32,
    pub name: String,
}

impl From<NodeSummary> for NodeSummaryBody {
    fn from(s: NodeSummary) -> Self {
        Self {
            instance_id: s.instance_id,
            name: s.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedNodeBody {
    pub instance_id: u32,
}

fn io_to_json(io: &Io, format: DoubleFormat) -> Value {
    json!({
        "name": io.name,
        "value": io.value.to_json(format),
        "overridden": io.overridden,
    })
}

fn node_to_json(node: &Node, format: DoubleFormat) -> Value {
    let render = |slots: &[Io]| -> Vec<Value> { slots.iter().map(|io| io_to_json(io, format)).collect() };
    json!({
        "instanceId": node.instance_id,
        "nodeName": node.node_name,
        "inputs": render(&node.inputs),
        "outputs": render(&node.outputs),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/nodes`: instantiate a node from a package.
pub async fn add(
    State(state): State<AppState>,
    Payload(body): Payload<AddNodeBody>,
) -> Result<Json<NodeSummaryBody>, AppError> {
    let summary = state
        .engine
        .add_node(NodeDetails {
            package_id: body.package_id,
            node_id: body.node_id,
            parent_id: body.parent_id,
            pos_x: body.pos_x,
            pos_y: body.pos_y,
        })
        .await?;
    tracing::info!(instance_id = summary.instance_id, name = %summary.name, "node added");
    Ok(Json(summary.into()))
}

/// `PUT /api/nodes`: move a node.
pub async fn update(
    State(state): State<AppState>,
    Payload(body): Payload<MoveNodeBody>,
) -> Result<Json<NodeSummaryBody>, AppError> {
    let summary = state
        .engine
        .update_node(NodePosition {
            instance_id: body.instance_id,
            pos_x: body.pos_x,
            pos_y: body.pos_y,
        })
        .await?;
    Ok(Json(summary.into()))
}

/// `DELETE /api/nodes/{instanceId}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemovedNodeBody>, AppError> {
    let instance_id = parse_id(&id, "instance id")?;
    let instance_id = state.engine.remove_node(instance_id).await?;
    tracing::info!(instance_id, "node removed");
    Ok(Json(RemovedNodeBody { instance_id }))
}

/// `GET /api/nodes`: every node with its current slot values, in engine
/// order.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let nodes = state.engine.get_all_values().await?;
    let format = state.config.double_format;
    Ok(Json(Value::Array(
        nodes.iter().map(|n| node_to_json(n, format)).collect(),
    )))
}

/// `PUT /api/nodes/{instanceId}/default`
pub async fn set_default(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<ValueBody>,
) -> Result<(), AppError> {
    let update = value_update(&id, body)?;
    state.engine.set_default(update).await?;
    Ok(())
}

/// `PUT /api/nodes/{instanceId}/fallback`
pub async fn set_fallback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<ValueBody>,
) -> Result<(), AppError> {
    let update = value_update(&id, body)?;
    state.engine.set_fallback(update).await?;
    Ok(())
}

/// `PUT /api/nodes/{instanceId}/override`
pub async fn set_override(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(body): Payload<OverrideBody>,
) -> Result<(), AppError> {
    let instance_id = parse_id(&id, "instance id")?;
    let value = FlexValue::from_json(&body.value);
    tracing::debug!(
        instance_id,
        name = %body.name,
        kind = value.as_ref().map_or("unset", FlexValue::kind),
        duration = body.duration,
        "setting override"
    );
    state
        .engine
        .set_override(OverrideUpdate {
            instance_id,
            name: body.name,
            value,
            duration: body.duration,
            active: body.active,
            input: body.input,
        })
        .await?;
    Ok(())
}

fn value_update(id: &str, body: ValueBody) -> Result<ValueUpdate, AppError> {
    Ok(ValueUpdate {
        instance_id: parse_id(id, "instance id")?,
        value: FlexValue::from_json(&body.value),
        name: body.name,
    })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/nodes", get(list).post(add).put(update))
        .route("/api/nodes/{id}", delete(remove))
        .route("/api/nodes/{id}/default", put(set_default))
        .route("/api/nodes/{id}/override", put(set_override))
        .route("/api/nodes/{id}/fallback", put(set_fallback))
}

/// The `{name, overridden, value}` slot schema shared by several operations.
fn io_schema() -> Value {
    with_properties(
        &object_schema(&[("name", SchemaType::String), ("overridden", SchemaType::Boolean)]),
        [("value".to_string(), flex_value_schema())],
    )
}

pub fn document(doc: &mut SchemaDocument) {
    let io = io_schema();
    let summary = object_schema(&[("instanceId", SchemaType::Integer), ("name", SchemaType::String)]);
    let instance_id = || {
        parameter(
            "instanceId",
            ParameterLocation::Path,
            true,
            SchemaType::Integer,
            "Instance ID of the node",
        )
    };

    doc.add_endpoint(
        "/api/nodes/{instanceId}/default",
        "PUT",
        Operation::new("Set default value for node")
            .parameter(instance_id())
            .request_body(io.clone())
            .response(200, empty_response("Default value set successfully")),
    );

    let override_schema = with_properties(
        &io,
        [
            ("duration".to_string(), type_schema(SchemaType::Integer)),
            ("active".to_string(), type_schema(SchemaType::Boolean)),
            ("input".to_string(), type_schema(SchemaType::Boolean)),
        ],
    );
    doc.add_endpoint(
        "/api/nodes/{instanceId}/override",
        "PUT",
        Operation::new("Set override value for node")
            .parameter(instance_id())
            .request_body(override_schema)
            .response(200, empty_response("Override value set successfully")),
    );

    doc.add_endpoint(
        "/api/nodes/{instanceId}/fallback",
        "PUT",
        Operation::new("Set fallback value for node")
            .parameter(instance_id())
            .request_body(io.clone())
            .response(200, empty_response("Fallback value set successfully")),
    );

    doc.add_endpoint(
        "/api/nodes",
        "POST",
        Operation::new("Add a new node")
            .request_body(object_schema(&[
                ("nodeId", SchemaType::Integer),
                ("packageId", SchemaType::Integer),
                ("parentId", SchemaType::Integer),
                ("posX", SchemaType::Integer),
                ("posY", SchemaType::Integer),
            ]))
            .response(200, json_response("Node added successfully", summary.clone())),
    );

    doc.add_endpoint(
        "/api/nodes",
        "PUT",
        Operation::new("Update node position")
            .request_body(object_schema(&[
                ("instanceId", SchemaType::Integer),
                ("posX", SchemaType::Integer),
                ("posY", SchemaType::Integer),
            ]))
            .response(
                200,
                json_response("Node position updated successfully", summary),
            ),
    );

    doc.add_endpoint(
        "/api/nodes/{instanceId}",
        "DELETE",
        Operation::new("Remove a node")
            .parameter(parameter(
                "instanceId",
                ParameterLocation::Path,
                true,
                SchemaType::Integer,
                "Instance ID of the node to remove",
            ))
            .response(
                200,
                json_response(
                    "Node removed successfully",
                    object_schema(&[("instanceId", SchemaType::Integer)]),
                ),
            ),
    );

    let node_schema = with_properties(
        &object_schema(&[("instanceId", SchemaType::Integer), ("nodeName", SchemaType::String)]),
        [
            ("inputs".to_string(), array_schema(io.clone())),
            ("outputs".to_string(), array_schema(io)),
        ],
    );
    doc.add_endpoint(
        "/api/nodes",
        "GET",
        Operation::new("Get all nodes")
            .response(200, json_response("List of all nodes", array_schema(node_schema))),
    );
}

/// Document and route the node endpoints.
pub fn register(doc: &mut SchemaDocument) -> Router<AppState> {
    document(doc);
    routes()
}
