pub mod scaleway;

use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::ResourceId;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("scaleway error: {0}")]
    Scaleway(String),
}

/// A remote snapshot that exposes a lifecycle state.
///
/// Resources without a status field use `()`, so only presence and absence
/// can be waited on.
pub trait Observed {
    type State: Clone + Debug + Eq + Hash + Send + Sync;

    fn state(&self) -> Self::State;
}

/// One row of a by-name listing. `local_id` is the provider token without
/// the region; the resolver adds it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Listed {
    pub local_id: String,
    pub display_name: String,
}

#[async_trait]
pub trait NameLookup: Send + Sync {
    type Id: ResourceId;

    /// Human readable kind, used in diagnostics ("private network").
    fn kind(&self) -> &'static str;

    async fn list_by_name(&self, region: &str, name: &str) -> Result<Vec<Listed>, ProviderError>;
}

#[async_trait]
pub trait StateSource: Send + Sync {
    type Id: ResourceId;
    type Snapshot: Observed + Clone + Debug + Send + Sync;

    fn kind(&self) -> &'static str;

    /// `Ok(None)` means the resource does not exist.
    async fn fetch_state(&self, id: &Self::Id) -> Result<Option<Self::Snapshot>, ProviderError>;
}
