use thiserror::Error;

use crate::identity::IdentityError;
use crate::poller::PollSpecError;
use crate::resolver::{FilterError, ResolveError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    MalformedIdentifier(#[from] IdentityError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("timed out waiting for {id}{}", last_state_suffix(.last_state))]
    TimedOut {
        id: String,
        last_state: Option<String>,
    },

    #[error("wait for {id} cancelled")]
    Cancelled { id: String },

    #[error("{id} reached failure state {state}")]
    ResourceFailed { id: String, state: String },

    #[error("{id} not found")]
    Gone { id: String },

    #[error(transparent)]
    InvalidPollSpec(#[from] PollSpecError),

    #[error(transparent)]
    Provider(#[from] crate::providers::ProviderError),

    #[error("configuration error: {0}")]
    Config(String),
}

fn last_state_suffix(last_state: &Option<String>) -> String {
    last_state
        .as_ref()
        .map(|s| format!(" (last state: {s})"))
        .unwrap_or_default()
}
