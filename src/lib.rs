//! scwsync - Scaleway state sync
//!
//! Resolves Scaleway resources to region-qualified identifiers and waits for
//! them to settle, so a declarative tool can reconcile its local state.

pub mod config;
pub mod error;
pub mod identity;
pub mod output;
pub mod poller;
pub mod providers;
pub mod reconcile;
pub mod resolver;
pub mod resource;
pub mod terraform;

pub use config::{ProviderConfig, WaitSettings};
pub use error::SyncError;
pub use identity::{CompositeId, IdentityError, RegionalId, ResourceId};
pub use poller::{PollOutcome, PollSpec, Poller, Target};
pub use providers::scaleway::{ScalewayClient, ScalewayError, ScalewayProvider};
pub use reconcile::{AbsenceReason, ReadOutcome, Reconciler};
pub use resolver::{Filter, ResolveError, Resolver};
pub use resource::Resource;
