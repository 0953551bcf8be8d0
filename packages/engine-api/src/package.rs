//! Package catalog messages.

use serde::{Deserialize, Serialize};

/// One entry of the engine's package catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageDetails {
    pub package_id: u32,
    pub package_name: String,
    pub package_version: String,
}
