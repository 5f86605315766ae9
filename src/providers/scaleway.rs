mod client;
mod error;
mod types;

pub use client::ScalewayClient;
pub use error::ScalewayError;
pub use types::{
    Database, DocumentDbInstance, InstanceStatus, Money, OfferProduct, PrivateNetwork,
    WebhostingOffer,
};

use async_trait::async_trait;

use super::{Listed, NameLookup, ProviderError, StateSource};
use crate::config::ProviderConfig;
use crate::identity::{CompositeId, RegionalId, ResourceId};
use crate::poller::{PollSpec, PollSpecError, Poller, Target};

/// Entry point handing out one adapter per resource kind, all sharing a
/// single HTTP client.
#[derive(Debug, Clone)]
pub struct ScalewayProvider {
    client: ScalewayClient,
}

impl ScalewayProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let secret_key = config.secret_key.clone().ok_or_else(|| {
            ProviderError::Auth(
                "No secret key provided. Set SCW_SECRET_KEY or use --secret-key flag".to_string(),
            )
        })?;

        let client = ScalewayClient::with_base_url(secret_key, config.api_url.clone())?;
        Ok(Self { client })
    }

    pub fn from_client(client: ScalewayClient) -> Self {
        Self { client }
    }

    pub fn private_networks(&self) -> PrivateNetworks {
        PrivateNetworks {
            client: self.client.clone(),
        }
    }

    pub fn documentdb_instances(&self) -> DocumentDbInstances {
        DocumentDbInstances {
            client: self.client.clone(),
        }
    }

    pub fn documentdb_databases(&self) -> DocumentDbDatabases {
        DocumentDbDatabases {
            client: self.client.clone(),
        }
    }

    pub fn webhosting_offers(&self) -> WebhostingOffers {
        WebhostingOffers {
            client: self.client.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrivateNetworks {
    client: ScalewayClient,
}

#[async_trait]
impl NameLookup for PrivateNetworks {
    type Id = RegionalId;

    fn kind(&self) -> &'static str {
        "private network"
    }

    // NOTE: The API matches names partially; only exact matches count here.
    async fn list_by_name(&self, region: &str, name: &str) -> Result<Vec<Listed>, ProviderError> {
        let networks = self.client.list_private_networks(region, Some(name)).await?;
        Ok(networks
            .into_iter()
            .filter(|pn| pn.name == name)
            .map(|pn| Listed {
                local_id: pn.id,
                display_name: pn.name,
            })
            .collect())
    }
}

#[async_trait]
impl StateSource for PrivateNetworks {
    type Id = RegionalId;
    type Snapshot = PrivateNetwork;

    fn kind(&self) -> &'static str {
        "private network"
    }

    async fn fetch_state(&self, id: &RegionalId) -> Result<Option<PrivateNetwork>, ProviderError> {
        Ok(self
            .client
            .get_private_network(id.region(), id.local_id())
            .await?)
    }
}

#[derive(Debug, Clone)]
pub struct DocumentDbInstances {
    client: ScalewayClient,
}

impl DocumentDbInstances {
    /// Wait used after create and resize.
    pub fn until_ready(
        poller: &Poller,
        id: RegionalId,
    ) -> Result<PollSpec<RegionalId, InstanceStatus>, PollSpecError> {
        poller
            .spec(id, Target::states([InstanceStatus::Ready]))
            .failing_on([
                InstanceStatus::Error,
                InstanceStatus::Locked,
                InstanceStatus::DiskFull,
            ])
    }

    /// Wait used after delete.
    pub fn until_deleted(
        poller: &Poller,
        id: RegionalId,
    ) -> Result<PollSpec<RegionalId, InstanceStatus>, PollSpecError> {
        poller
            .spec(id, Target::Gone)
            .failing_on([InstanceStatus::Error])
    }
}

#[async_trait]
impl NameLookup for DocumentDbInstances {
    type Id = RegionalId;

    fn kind(&self) -> &'static str {
        "documentdb instance"
    }

    async fn list_by_name(&self, region: &str, name: &str) -> Result<Vec<Listed>, ProviderError> {
        let instances = self
            .client
            .list_documentdb_instances(region, Some(name))
            .await?;
        Ok(instances
            .into_iter()
            .filter(|i| i.name == name)
            .map(|i| Listed {
                local_id: i.id,
                display_name: i.name,
            })
            .collect())
    }
}

#[async_trait]
impl StateSource for DocumentDbInstances {
    type Id = RegionalId;
    type Snapshot = DocumentDbInstance;

    fn kind(&self) -> &'static str {
        "documentdb instance"
    }

    async fn fetch_state(
        &self,
        id: &RegionalId,
    ) -> Result<Option<DocumentDbInstance>, ProviderError> {
        Ok(self
            .client
            .get_documentdb_instance(id.region(), id.local_id())
            .await?)
    }
}

/// Databases have no id of their own; they are addressed as
/// `<region>/<instance_id>/<name>`.
#[derive(Debug, Clone)]
pub struct DocumentDbDatabases {
    client: ScalewayClient,
}

#[async_trait]
impl StateSource for DocumentDbDatabases {
    type Id = CompositeId;
    type Snapshot = Database;

    fn kind(&self) -> &'static str {
        "documentdb database"
    }

    async fn fetch_state(&self, id: &CompositeId) -> Result<Option<Database>, ProviderError> {
        let databases = self
            .client
            .list_documentdb_databases(id.region(), id.parent_id(), Some(id.leaf_name()))
            .await?;

        Ok(databases.and_then(|dbs| dbs.into_iter().find(|db| db.name == id.leaf_name())))
    }
}

#[derive(Debug, Clone)]
pub struct WebhostingOffers {
    client: ScalewayClient,
}

#[async_trait]
impl NameLookup for WebhostingOffers {
    type Id = RegionalId;

    fn kind(&self) -> &'static str {
        "webhosting offer"
    }

    async fn list_by_name(&self, region: &str, name: &str) -> Result<Vec<Listed>, ProviderError> {
        let offers = self.client.list_webhosting_offers(region).await?;
        Ok(offers
            .into_iter()
            .filter(|offer| offer.product.name == name)
            .map(|offer| Listed {
                local_id: offer.id,
                display_name: offer.product.name,
            })
            .collect())
    }
}

#[async_trait]
impl StateSource for WebhostingOffers {
    type Id = RegionalId;
    type Snapshot = WebhostingOffer;

    fn kind(&self) -> &'static str {
        "webhosting offer"
    }

    // NOTE: There is no get-by-id endpoint for offers
    async fn fetch_state(&self, id: &RegionalId) -> Result<Option<WebhostingOffer>, ProviderError> {
        let offers = self.client.list_webhosting_offers(id.region()).await?;
        Ok(offers.into_iter().find(|offer| offer.id == id.local_id()))
    }
}
