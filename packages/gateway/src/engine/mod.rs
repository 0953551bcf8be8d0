//! The gateway's view of the flow engine.
//!
//! The [`Engine`] trait is the only way handlers reach the engine. An
//! implementation supplies [`Engine::call`], which sends one
//! [`EngineRequest`] and waits for its [`EngineResponse`]; the typed
//! per-operation methods are provided on top of it and check that the reply
//! matches the request.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`SocketEngine`] | Production; one Unix-socket connection per call |
//!
//! Handler tests plug in scripted implementations of the trait.
//!
//! [`SocketEngine`]: socket::SocketEngine

pub mod socket;

use std::time::Duration;

use async_trait::async_trait;
use flowgate_engine_api::{
    EdgeAdded, EdgeDetails, EngineRequest, EngineResponse, FrameError, Node, NodeDetails,
    NodePosition, NodeSummary, OverrideUpdate, PackageDetails, ValueUpdate,
};

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Why an engine call failed. The `Display` text is what the HTTP caller
/// receives in a 500 response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The engine could not be reached or the connection broke mid-call.
    #[error("engine unreachable: {0}")]
    Transport(String),

    /// The engine processed the call and reported a failure. Passed through
    /// verbatim.
    #[error("{0}")]
    Rpc(String),

    /// The engine replied with something the gateway cannot interpret.
    #[error("engine protocol error: {0}")]
    Protocol(String),

    /// No reply arrived within the configured call timeout.
    #[error("engine call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<FrameError> for EngineError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(_) | FrameError::Closed => EngineError::Transport(e.to_string()),
            FrameError::TooLarge(_) | FrameError::Encode(_) | FrameError::Decode(_) => {
                EngineError::Protocol(e.to_string())
            }
        }
    }
}

fn unexpected(method: &str, response: &EngineResponse) -> EngineError {
    EngineError::Protocol(format!(
        "unexpected {} reply to {method}",
        response.kind()
    ))
}

// ---------------------------------------------------------------------------
// Engine trait
// ---------------------------------------------------------------------------

/// The RPC client capability: send one typed request, wait for its typed
/// response or a failure.
///
/// Implementations must be `Send + Sync + 'static` so they can be held in an
/// `Arc<dyn Engine>`. Calls are never retried.
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    /// Perform one engine call.
    async fn call(&self, request: EngineRequest) -> Result<EngineResponse, EngineError>;

    // --- Nodes ---------------------------------------------------------------

    /// Instantiate a node. Returns the new instance id and its display name.
    async fn add_node(&self, details: NodeDetails) -> Result<NodeSummary, EngineError> {
        match self.call(EngineRequest::AddNode(details)).await? {
            EngineResponse::NodeAdded(summary) => Ok(summary),
            other => Err(unexpected("add_node", &other)),
        }
    }

    /// Move a node instance.
    async fn update_node(&self, position: NodePosition) -> Result<NodeSummary, EngineError> {
        match self.call(EngineRequest::UpdateNode(position)).await? {
            EngineResponse::NodeUpdated(summary) => Ok(summary),
            other => Err(unexpected("update_node", &other)),
        }
    }

    /// Remove a node instance. Returns the id the engine removed.
    async fn remove_node(&self, instance_id: u32) -> Result<u32, EngineError> {
        match self.call(EngineRequest::RemoveNode { instance_id }).await? {
            EngineResponse::NodeRemoved { instance_id } => Ok(instance_id),
            other => Err(unexpected("remove_node", &other)),
        }
    }

    /// Every node instance with its current input and output values, in
    /// engine order.
    async fn get_all_values(&self) -> Result<Vec<Node>, EngineError> {
        match self.call(EngineRequest::GetAllValues).await? {
            EngineResponse::AllValues { nodes } => Ok(nodes),
            other => Err(unexpected("get_all_values", &other)),
        }
    }

    // --- Values --------------------------------------------------------------

    async fn set_default(&self, update: ValueUpdate) -> Result<(), EngineError> {
        match self.call(EngineRequest::SetDefault(update)).await? {
            EngineResponse::ValueSet => Ok(()),
            other => Err(unexpected("set_default", &other)),
        }
    }

    async fn set_override(&self, update: OverrideUpdate) -> Result<(), EngineError> {
        match self.call(EngineRequest::SetOverride(update)).await? {
            EngineResponse::ValueSet => Ok(()),
            other => Err(unexpected("set_override", &other)),
        }
    }

    async fn set_fallback(&self, update: ValueUpdate) -> Result<(), EngineError> {
        match self.call(EngineRequest::SetFallback(update)).await? {
            EngineResponse::ValueSet => Ok(()),
            other => Err(unexpected("set_fallback", &other)),
        }
    }

    // --- Edges ---------------------------------------------------------------

    async fn add_edge(&self, edge: EdgeDetails) -> Result<EdgeAdded, EngineError> {
        match self.call(EngineRequest::AddEdge(edge)).await? {
            EngineResponse::EdgeAdded(added) => Ok(added),
            other => Err(unexpected("add_edge", &other)),
        }
    }

    /// Remove an edge. Returns the id the engine removed.
    async fn remove_edge(&self, edge_id: u32) -> Result<u32, EngineError> {
        match self.call(EngineRequest::RemoveEdge { edge_id }).await? {
            EngineResponse::EdgeRemoved { edge_id } => Ok(edge_id),
            other => Err(unexpected("remove_edge", &other)),
        }
    }

    // --- Packages and flow ---------------------------------------------------

    /// The package catalog, in engine order.
    async fn get_available_packages(&self) -> Result<Vec<PackageDetails>, EngineError> {
        match self.call(EngineRequest::GetAvailablePackages).await? {
            EngineResponse::AvailablePackages { packages } => Ok(packages),
            other => Err(unexpected("get_available_packages", &other)),
        }
    }

    /// The engine's JSON description of one package, unparsed.
    async fn get_package_json(&self, package_id: u32) -> Result<String, EngineError> {
        match self.call(EngineRequest::GetPackageJson { package_id }).await? {
            EngineResponse::PackageJson { json_data } => Ok(json_data),
            other => Err(unexpected("get_package_json", &other)),
        }
    }

    /// The engine's JSON export of the whole flow graph, unparsed.
    async fn get_flow_json(&self) -> Result<String, EngineError> {
        match self.call(EngineRequest::GetFlowJson).await? {
            EngineResponse::FlowJson { json_data } => Ok(json_data),
            other => Err(unexpected("get_flow_json", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(EngineResponse);

    #[async_trait]
    impl Engine for Fixed {
        async fn call(&self, _request: EngineRequest) -> Result<EngineResponse, EngineError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn matching_reply_is_unwrapped() {
        let engine = Fixed(EngineResponse::EdgeRemoved { edge_id: 9 });
        assert_eq!(engine.remove_edge(9).await, Ok(9));
    }

    #[tokio::test]
    async fn mismatched_reply_is_a_protocol_error() {
        let engine = Fixed(EngineResponse::ValueSet);
        let err = engine.remove_edge(9).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Protocol("unexpected value_set reply to remove_edge".into())
        );
    }

    #[test]
    fn rpc_failure_text_is_passed_through() {
        assert_eq!(EngineError::Rpc("edge 9 not found".into()).to_string(), "edge 9 not found");
    }

    #[test]
    fn frame_errors_split_into_transport_and_protocol() {
        assert!(matches!(
            EngineError::from(FrameError::Closed),
            EngineError::Transport(_)
        ));
        assert!(matches!(
            EngineError::from(FrameError::TooLarge(1 << 30)),
            EngineError::Protocol(_)
        ));
    }
}
