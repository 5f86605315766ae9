use serde::{Deserialize, Serialize};

/// Flattened view of a remote resource, as stored locally and printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Resource {
    pub resource_type: String,
    pub resource_id: String,
    pub name: String,
    pub region: String,
    pub metadata: serde_json::Value,
}
