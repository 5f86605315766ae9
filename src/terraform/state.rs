//! Local record of a managed resource, as kept in Terraform state.
//!
//! The identifier string is the only thing persisted by the sync layer; the
//! attributes are a cache of the last snapshot read.

use serde::{Deserialize, Serialize};

use crate::identity::ResourceId;
use crate::reconcile::ReadOutcome;
use crate::resource::Resource;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_type: String,
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl ResourceState {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Self::default()
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.id.is_some()
    }

    pub fn set(&mut self, resource: &Resource) {
        self.id = Some(resource.resource_id.clone());
        self.attributes = resource.metadata.clone();
    }

    pub fn clear(&mut self) {
        self.id = None;
        self.attributes = serde_json::Value::Null;
    }

    /// Applies a read verdict: a found resource refreshes the record, a
    /// missing one clears it. Returns the flattened resource when found.
    pub fn apply<I, T, F>(&mut self, outcome: ReadOutcome<I, T>, to_resource: F) -> Option<Resource>
    where
        I: ResourceId,
        F: FnOnce(T) -> Resource,
    {
        match outcome {
            ReadOutcome::Found { snapshot, .. } => {
                let resource = to_resource(snapshot);
                self.set(&resource);
                Some(resource)
            }
            ReadOutcome::NotFound { id, reason } => {
                tracing::info!(
                    resource_type = %self.resource_type,
                    %id,
                    %reason,
                    "removing resource from state"
                );
                self.clear();
                None
            }
        }
    }
}
