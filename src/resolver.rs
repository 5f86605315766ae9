use thiserror::Error;

use crate::identity::{IdentityError, ResourceId};
use crate::providers::{NameLookup, ProviderError};

/// How the caller designates a resource: either directly or by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Id { id: String, region: String },
    Name { region: String, name: String },
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{id_field} and name are mutually exclusive")]
    Conflict { id_field: &'static str },

    #[error("one of {id_field} or name must be set")]
    Missing { id_field: &'static str },
}

impl Filter {
    /// Builds a filter from optional inputs, where the id and the name
    /// conflict with each other. `id_field` names the id input in errors.
    pub fn from_options(
        id_field: &'static str,
        id: Option<String>,
        name: Option<String>,
        region: impl Into<String>,
    ) -> Result<Self, FilterError> {
        let region = region.into();
        match (id, name) {
            (Some(_), Some(_)) => Err(FilterError::Conflict { id_field }),
            (Some(id), None) => Ok(Filter::Id { id, region }),
            (None, Some(name)) => Ok(Filter::Name { region, name }),
            (None, None) => Err(FilterError::Missing { id_field }),
        }
    }

    pub fn is_by_name(&self) -> bool {
        matches!(self, Filter::Name { .. })
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Malformed(#[from] IdentityError),

    #[error("no {kind} found with the name {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("{count} {kind}s found with the name {name}")]
    Ambiguous {
        kind: &'static str,
        name: String,
        count: usize,
    },

    #[error("listing {kind} failed: {source}")]
    Transport {
        kind: &'static str,
        #[source]
        source: ProviderError,
    },
}

pub struct Resolver<'a, L> {
    lookup: &'a L,
}

impl<'a, L: NameLookup> Resolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, filter: &Filter) -> Result<L::Id, ResolveError> {
        match filter {
            Filter::Id { id, region } => Ok(L::Id::normalize(id, region)?),
            Filter::Name { region, name } => self.resolve_name(region, name).await,
        }
    }

    async fn resolve_name(&self, region: &str, name: &str) -> Result<L::Id, ResolveError> {
        let kind = self.lookup.kind();
        let mut matches = self
            .lookup
            .list_by_name(region, name)
            .await
            .map_err(|source| ResolveError::Transport { kind, source })?;

        tracing::debug!(kind, name, region, count = matches.len(), "name lookup");

        match matches.len() {
            0 => Err(ResolveError::NotFound {
                kind,
                name: name.to_string(),
            }),
            1 => {
                let found = matches.remove(0);
                Ok(L::Id::normalize(&found.local_id, region)?)
            }
            count => Err(ResolveError::Ambiguous {
                kind,
                name: name.to_string(),
                count,
            }),
        }
    }
}
