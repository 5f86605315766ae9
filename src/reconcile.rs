//! Read path shared by every resource kind: resolve an identifier, fetch the
//! current snapshot, and tell the caller whether the resource is still there.

use std::fmt;

use crate::error::SyncError;
use crate::identity::ResourceId;
use crate::poller::{PollSpec, Poller, Target};
use crate::providers::{NameLookup, Observed, StateSource};
use crate::resolver::{Filter, Resolver};

/// Why a resource that was asked for turned out to be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceReason {
    /// The name lookup just returned this id, so it was removed in between.
    DeletedOutOfBand,
    /// The id was supplied directly: either deleted, or never valid in this
    /// region.
    UnknownIdentifier,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsenceReason::DeletedOutOfBand => f.write_str("deleted outside of this tool"),
            AbsenceReason::UnknownIdentifier => {
                f.write_str("unknown identifier (deleted, or wrong region)")
            }
        }
    }
}

#[derive(Debug)]
pub enum ReadOutcome<I, T> {
    Found { id: I, snapshot: T },
    /// Expected steady state: the caller should drop its local record.
    NotFound { id: I, reason: AbsenceReason },
}

impl<I: ResourceId, T> ReadOutcome<I, T> {
    pub fn id(&self) -> &I {
        match self {
            ReadOutcome::Found { id, .. } | ReadOutcome::NotFound { id, .. } => id,
        }
    }

    /// For data sources, where a missing resource is an error.
    pub fn require(self) -> Result<(I, T), SyncError> {
        match self {
            ReadOutcome::Found { id, snapshot } => Ok((id, snapshot)),
            ReadOutcome::NotFound { id, .. } => Err(SyncError::Gone { id: id.to_string() }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    poller: Poller,
}

impl Reconciler {
    pub fn new(poller: Poller) -> Self {
        Self { poller }
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub async fn read<A>(
        &self,
        api: &A,
        filter: &Filter,
    ) -> Result<ReadOutcome<<A as NameLookup>::Id, A::Snapshot>, SyncError>
    where
        A: NameLookup + StateSource<Id = <A as NameLookup>::Id>,
    {
        let id = Resolver::new(api).resolve(filter).await?;
        let reason = if filter.is_by_name() {
            AbsenceReason::DeletedOutOfBand
        } else {
            AbsenceReason::UnknownIdentifier
        };
        self.fetch(api, id, reason).await
    }

    /// Read for resources that can only be addressed by id.
    pub async fn read_id<S: StateSource>(
        &self,
        source: &S,
        id: S::Id,
    ) -> Result<ReadOutcome<S::Id, S::Snapshot>, SyncError> {
        self.fetch(source, id, AbsenceReason::UnknownIdentifier)
            .await
    }

    /// Lifecycle wait after create, resize or delete.
    pub async fn wait<S: StateSource>(
        &self,
        source: &S,
        spec: &PollSpec<S::Id, <S::Snapshot as Observed>::State>,
    ) -> Result<Option<S::Snapshot>, SyncError> {
        tracing::info!(
            kind = source.kind(),
            id = %spec.target(),
            timeout = ?spec.timeout(),
            "waiting for resource"
        );
        self.poller
            .wait_until(source, spec)
            .await
            .into_result(spec.target())
    }

    async fn fetch<S: StateSource>(
        &self,
        source: &S,
        id: S::Id,
        reason: AbsenceReason,
    ) -> Result<ReadOutcome<S::Id, S::Snapshot>, SyncError> {
        let spec = self.poller.spec(id, Target::Exists);

        let outcome = self.poller.wait_until(source, &spec).await;

        match outcome.into_result(spec.target()) {
            Ok(Some(snapshot)) => Ok(ReadOutcome::Found {
                id: spec.target().clone(),
                snapshot,
            }),
            Ok(None) | Err(SyncError::Gone { .. }) => {
                tracing::warn!(
                    kind = source.kind(),
                    id = %spec.target(),
                    %reason,
                    "resource not found, clearing local state"
                );
                Ok(ReadOutcome::NotFound {
                    id: spec.target().clone(),
                    reason,
                })
            }
            Err(err) => Err(err),
        }
    }
}
