//! Edge lifecycle messages.

use serde::{Deserialize, Serialize};

/// Connects output `out_name` of one instance to input `in_name` of another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeDetails {
    pub from_instance_id: u32,
    pub to_instance_id: u32,
    pub out_name: String,
    pub in_name: String,
}

/// The engine's reply to `add_edge`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeAdded {
    pub edge_id: u32,
    /// `true` when the edge only carries data and does not trigger execution.
    #[serde(default)]
    pub data_only: bool,
}
