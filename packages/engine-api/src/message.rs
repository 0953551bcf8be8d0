//! The request/reply envelope exchanged on the engine socket.

use serde::{Deserialize, Serialize};

use crate::edge::{EdgeAdded, EdgeDetails};
use crate::node::{Node, NodeDetails, NodePosition, NodeSummary, OverrideUpdate, ValueUpdate};
use crate::package::PackageDetails;

/// One engine operation. Serialised with a `method` tag, e.g.
/// `{"method":"remove_edge","edge_id":9}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum EngineRequest {
    AddNode(NodeDetails),
    UpdateNode(NodePosition),
    RemoveNode { instance_id: u32 },
    GetAllValues,
    SetDefault(ValueUpdate),
    SetOverride(OverrideUpdate),
    SetFallback(ValueUpdate),
    AddEdge(EdgeDetails),
    RemoveEdge { edge_id: u32 },
    GetAvailablePackages,
    GetPackageJson { package_id: u32 },
    GetFlowJson,
}

impl EngineRequest {
    /// The wire name of this operation, used in logs and error messages.
    pub fn method(&self) -> &'static str {
        match self {
            EngineRequest::AddNode(_) => "add_node",
            EngineRequest::UpdateNode(_) => "update_node",
            EngineRequest::RemoveNode { .. } => "remove_node",
            EngineRequest::GetAllValues => "get_all_values",
            EngineRequest::SetDefault(_) => "set_default",
            EngineRequest::SetOverride(_) => "set_override",
            EngineRequest::SetFallback(_) => "set_fallback",
            EngineRequest::AddEdge(_) => "add_edge",
            EngineRequest::RemoveEdge { .. } => "remove_edge",
            EngineRequest::GetAvailablePackages => "get_available_packages",
            EngineRequest::GetPackageJson { .. } => "get_package_json",
            EngineRequest::GetFlowJson => "get_flow_json",
        }
    }
}

/// The successful result of one engine operation, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineResponse {
    NodeAdded(NodeSummary),
    NodeUpdated(NodeSummary),
    NodeRemoved { instance_id: u32 },
    AllValues { nodes: Vec<Node> },
    /// Acknowledges `set_default`, `set_override`, and `set_fallback`.
    ValueSet,
    EdgeAdded(EdgeAdded),
    EdgeRemoved { edge_id: u32 },
    AvailablePackages { packages: Vec<PackageDetails> },
    /// An opaque JSON document describing one package.
    PackageJson { json_data: String },
    /// An opaque JSON document describing the whole flow graph.
    FlowJson { json_data: String },
}

impl EngineResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineResponse::NodeAdded(_) => "node_added",
            EngineResponse::NodeUpdated(_) => "node_updated",
            EngineResponse::NodeRemoved { .. } => "node_removed",
            EngineResponse::AllValues { .. } => "all_values",
            EngineResponse::ValueSet => "value_set",
            EngineResponse::EdgeAdded(_) => "edge_added",
            EngineResponse::EdgeRemoved { .. } => "edge_removed",
            EngineResponse::AvailablePackages { .. } => "available_packages",
            EngineResponse::PackageJson { .. } => "package_json",
            EngineResponse::FlowJson { .. } => "flow_json",
        }
    }
}

/// What the engine writes back for each request: a result or a failure
/// description. `{"ok": {...}}` or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EngineReply {
    Ok(EngineResponse),
    Error(String),
}

impl From<Result<EngineResponse, String>> for EngineReply {
    fn from(result: Result<EngineResponse, String>) -> Self {
        match result {
            Ok(response) => EngineReply::Ok(response),
            Err(message) => EngineReply::Error(message),
        }
    }
}
