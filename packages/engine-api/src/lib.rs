//! Request and response types for the flow engine RPC socket.
//!
//! The engine is a separate process reachable over a local Unix socket. Each
//! call is one [`EngineRequest`] frame answered by one [`EngineReply`] frame;
//! see [`frame`] for the framing.
//!
//! # Operations covered
//!
//! | Request | Response |
//! |---------|----------|
//! | [`EngineRequest::AddNode`] | [`EngineResponse::NodeAdded`] |
//! | [`EngineRequest::UpdateNode`] | [`EngineResponse::NodeUpdated`] |
//! | [`EngineRequest::RemoveNode`] | [`EngineResponse::NodeRemoved`] |
//! | [`EngineRequest::GetAllValues`] | [`EngineResponse::AllValues`] |
//! | [`EngineRequest::SetDefault`] | [`EngineResponse::ValueSet`] |
//! | [`EngineRequest::SetOverride`] | [`EngineResponse::ValueSet`] |
//! | [`EngineRequest::SetFallback`] | [`EngineResponse::ValueSet`] |
//! | [`EngineRequest::AddEdge`] | [`EngineResponse::EdgeAdded`] |
//! | [`EngineRequest::RemoveEdge`] | [`EngineResponse::EdgeRemoved`] |
//! | [`EngineRequest::GetAvailablePackages`] | [`EngineResponse::AvailablePackages`] |
//! | [`EngineRequest::GetPackageJson`] | [`EngineResponse::PackageJson`] |
//! | [`EngineRequest::GetFlowJson`] | [`EngineResponse::FlowJson`] |

pub mod edge;
pub mod frame;
pub mod message;
pub mod node;
pub mod package;

pub use edge::{EdgeAdded, EdgeDetails};
pub use frame::{read_frame, write_frame, FrameError, MAX_FRAME_LEN};
pub use message::{EngineReply, EngineRequest, EngineResponse};
pub use node::{Io, Node, NodeDetails, NodePosition, NodeSummary, OverrideUpdate, ValueUpdate};
pub use package::PackageDetails;
