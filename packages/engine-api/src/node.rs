//! Node lifecycle and value messages.

use flowgate::FlexValue;
use serde::{Deserialize, Serialize};

/// Placement of a new node instance, sent with `add_node`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeDetails {
    /// Package the node type comes from.
    pub package_id: u32,
    /// Node type within the package.
    pub node_id: u32,
    /// Instance the new node is nested under; `0` for the root graph.
    pub parent_id: u32,
    pub pos_x: u32,
    pub pos_y: u32,
}

/// New position of an existing node instance, sent with `update_node`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodePosition {
    pub instance_id: u32,
    pub pos_x: u32,
    pub pos_y: u32,
}

/// The engine's reply to `add_node` and `update_node`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeSummary {
    pub instance_id: u32,
    pub name: String,
}

/// One input or output slot of a node with its current value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Io {
    pub name: String,
    pub value: FlexValue,
    /// `true` while an override is active on this slot.
    #[serde(default)]
    pub overridden: bool,
}

/// A node instance as reported by `get_all_values`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub instance_id: u32,
    pub node_name: String,
    #[serde(default)]
    pub inputs: Vec<Io>,
    #[serde(default)]
    pub outputs: Vec<Io>,
}

/// Sets the default or fallback value of a named slot.
///
/// `value` is `None` when the caller supplied no usable scalar; the field is
/// then left off the wire entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueUpdate {
    pub instance_id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FlexValue>,
}

/// Overrides a named slot for `duration` milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverrideUpdate {
    pub instance_id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FlexValue>,
    pub duration: u64,
    /// Whether the override is switched on or cleared.
    pub active: bool,
    /// `true` to override an input slot, `false` for an output slot.
    pub input: bool,
}
