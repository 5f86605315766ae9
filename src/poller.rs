//! Waits for a remote resource to settle.
//!
//! Mutating calls on Scaleway (create, resize, delete) return before the
//! resource has finished transitioning. The poller samples the resource
//! until it reaches a terminal state, the time budget is spent or the
//! caller cancels.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::WaitSettings;
use crate::error::SyncError;
use crate::identity::ResourceId;
use crate::providers::{Observed, ProviderError, StateSource};

/// The condition that ends a wait successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum Target<S: Eq + Hash> {
    /// Any state will do, as long as the resource exists.
    Exists,
    States(HashSet<S>),
    /// The resource no longer exists.
    Gone,
}

impl<S: Eq + Hash> Target<S> {
    pub fn states(states: impl IntoIterator<Item = S>) -> Self {
        Target::States(states.into_iter().collect())
    }

    fn accepts(&self, state: &S) -> bool {
        match self {
            Target::Exists => true,
            Target::States(states) => states.contains(state),
            Target::Gone => false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PollSpecError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    #[error("a state cannot be both desired and a failure")]
    OverlappingStates,
}

#[derive(Debug, Clone)]
pub struct PollSpec<I, S: Eq + Hash> {
    target: I,
    desired: Target<S>,
    failure_states: HashSet<S>,
    interval: Duration,
    timeout: Duration,
}

impl<I, S: Eq + Hash> PollSpec<I, S> {
    /// A `timeout` shorter than `interval` is allowed and buys exactly one
    /// fetch.
    pub fn new(
        target: I,
        desired: Target<S>,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Self, PollSpecError> {
        if interval.is_zero() {
            return Err(PollSpecError::ZeroInterval);
        }
        Ok(Self {
            target,
            desired,
            failure_states: HashSet::new(),
            interval,
            timeout,
        })
    }

    pub fn failing_on(mut self, states: impl IntoIterator<Item = S>) -> Result<Self, PollSpecError> {
        self.failure_states.extend(states);
        if let Target::States(desired) = &self.desired {
            if !desired.is_disjoint(&self.failure_states) {
                return Err(PollSpecError::OverlappingStates);
            }
        }
        Ok(self)
    }

    pub fn with_interval(mut self, interval: Duration) -> Result<Self, PollSpecError> {
        if interval.is_zero() {
            return Err(PollSpecError::ZeroInterval);
        }
        self.interval = interval;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn target(&self) -> &I {
        &self.target
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug)]
pub enum PollOutcome<T, S> {
    /// Holds the last snapshot; `None` when the target was absence.
    Ready(Option<T>),
    Failed { snapshot: T, reason: S },
    /// The resource disappeared while it was required to exist.
    Absent,
    TimedOut { last_state: Option<S> },
    Cancelled,
    TransportError(ProviderError),
}

impl<T, S: Debug> PollOutcome<T, S> {
    /// Flattens the outcome into a result, treating anything but `Ready` as
    /// an error. `Absent` becomes [`SyncError::Gone`].
    pub fn into_result(self, id: &impl ResourceId) -> Result<Option<T>, SyncError> {
        match self {
            PollOutcome::Ready(snapshot) => Ok(snapshot),
            PollOutcome::Failed { reason, .. } => Err(SyncError::ResourceFailed {
                id: id.to_string(),
                state: format!("{reason:?}"),
            }),
            PollOutcome::Absent => Err(SyncError::Gone { id: id.to_string() }),
            PollOutcome::TimedOut { last_state } => Err(SyncError::TimedOut {
                id: id.to_string(),
                last_state: last_state.map(|s| format!("{s:?}")),
            }),
            PollOutcome::Cancelled => Err(SyncError::Cancelled { id: id.to_string() }),
            PollOutcome::TransportError(err) => Err(SyncError::Provider(err)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Poller {
    settings: WaitSettings,
    cancel: CancellationToken,
}

impl Poller {
    /// Rejects a zero retry interval, which would poll without pause.
    pub fn new(settings: WaitSettings, cancel: CancellationToken) -> Result<Self, PollSpecError> {
        if settings.retry_interval.is_zero() {
            return Err(PollSpecError::ZeroInterval);
        }
        Ok(Self { settings, cancel })
    }

    /// A spec using the configured default interval and timeout.
    pub fn spec<I, S: Eq + Hash>(&self, target: I, desired: Target<S>) -> PollSpec<I, S> {
        PollSpec {
            target,
            desired,
            failure_states: HashSet::new(),
            interval: self.settings.retry_interval,
            timeout: self.settings.timeout,
        }
    }

    pub async fn wait_until<R>(
        &self,
        source: &R,
        spec: &PollSpec<R::Id, <R::Snapshot as Observed>::State>,
    ) -> PollOutcome<R::Snapshot, <R::Snapshot as Observed>::State>
    where
        R: StateSource,
    {
        let id = &spec.target;
        let started = Instant::now();
        let mut last_state;
        let mut attempt: u32 = 0;

        if self.cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        loop {
            attempt += 1;
            let snapshot = match source.fetch_state(id).await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::warn!(%id, attempt, error = %err, "fetching state failed");
                    return PollOutcome::TransportError(err);
                }
            };

            let Some(snapshot) = snapshot else {
                tracing::debug!(%id, attempt, "resource absent");
                return match spec.desired {
                    Target::Gone => PollOutcome::Ready(None),
                    _ => PollOutcome::Absent,
                };
            };

            let state = snapshot.state();
            tracing::debug!(%id, attempt, state = ?state, "polled state");

            if spec.desired.accepts(&state) {
                return PollOutcome::Ready(Some(snapshot));
            }
            if spec.failure_states.contains(&state) {
                return PollOutcome::Failed {
                    snapshot,
                    reason: state,
                };
            }
            last_state = Some(state);

            let Some(remaining) = spec.timeout.checked_sub(started.elapsed()) else {
                break;
            };
            if remaining.is_zero() {
                break;
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!(%id, attempt, "wait cancelled");
                    return PollOutcome::Cancelled;
                }
                _ = tokio::time::sleep(spec.interval.min(remaining)) => {}
            }

            if started.elapsed() >= spec.timeout {
                break;
            }
        }

        tracing::warn!(%id, attempt, last_state = ?last_state, "wait timed out");
        PollOutcome::TimedOut { last_state }
    }
}
