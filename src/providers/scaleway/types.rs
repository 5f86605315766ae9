use serde::Deserialize;

use crate::identity::{encode_composite, encode_regional};
use crate::providers::Observed;
use crate::resource::Resource;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub subnet: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrivateNetwork {
    pub id: String,
    pub name: String,
    pub region: String,
    pub project_id: String,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub dhcp_enabled: bool,
}

impl Observed for PrivateNetwork {
    type State = ();

    fn state(&self) {}
}

impl PrivateNetwork {
    pub fn into_resource(self) -> Resource {
        let subnets: Vec<String> = self.subnets.into_iter().map(|s| s.subnet).collect();
        Resource {
            resource_type: "scaleway_vpc_private_network".to_string(),
            resource_id: encode_regional(&self.region, &self.id),
            name: self.name,
            region: self.region,
            metadata: serde_json::json!({
                "project_id": self.project_id,
                "vpc_id": self.vpc_id,
                "tags": self.tags,
                "subnets": subnets,
                "dhcp_enabled": self.dhcp_enabled,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Ready,
    Provisioning,
    Configuring,
    Deleting,
    Error,
    Autohealing,
    Locked,
    Initializing,
    DiskFull,
    Backuping,
    Snapshotting,
    Restarting,
    #[serde(other)]
    Unknown,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Ready => "ready",
            InstanceStatus::Provisioning => "provisioning",
            InstanceStatus::Configuring => "configuring",
            InstanceStatus::Deleting => "deleting",
            InstanceStatus::Error => "error",
            InstanceStatus::Autohealing => "autohealing",
            InstanceStatus::Locked => "locked",
            InstanceStatus::Initializing => "initializing",
            InstanceStatus::DiskFull => "disk_full",
            InstanceStatus::Backuping => "backuping",
            InstanceStatus::Snapshotting => "snapshotting",
            InstanceStatus::Restarting => "restarting",
            InstanceStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    #[serde(rename = "type")]
    pub type_: String,
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentDbInstance {
    pub id: String,
    pub name: String,
    pub region: String,
    pub status: InstanceStatus,
    pub engine: String,
    pub node_type: String,
    #[serde(default)]
    pub is_ha_cluster: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub volume: Option<Volume>,
}

impl Observed for DocumentDbInstance {
    type State = InstanceStatus;

    fn state(&self) -> InstanceStatus {
        self.status
    }
}

impl DocumentDbInstance {
    pub fn into_resource(self) -> Resource {
        Resource {
            resource_type: "scaleway_documentdb_instance".to_string(),
            resource_id: encode_regional(&self.region, &self.id),
            name: self.name,
            region: self.region,
            metadata: serde_json::json!({
                "status": self.status.as_str(),
                "engine": self.engine,
                "node_type": self.node_type,
                "is_ha_cluster": self.is_ha_cluster,
                "tags": self.tags,
                "volume_size": self.volume.map(|v| v.size),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub size: u64,
}

impl Observed for Database {
    type State = ();

    fn state(&self) {}
}

impl Database {
    pub fn into_resource(self, region: &str, instance_id: &str) -> Resource {
        Resource {
            resource_type: "scaleway_documentdb_database".to_string(),
            resource_id: encode_composite(region, instance_id, &self.name),
            name: self.name,
            region: region.to_string(),
            metadata: serde_json::json!({
                "instance_id": encode_regional(region, instance_id),
                "owner": self.owner,
                "managed": self.managed,
                "size": self.size,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub units: i64,
    pub nanos: i32,
}

impl Money {
    /// Renders as the console does, e.g. `€ 18.99`.
    pub fn display(&self) -> String {
        let symbol = match self.currency_code.as_str() {
            "EUR" => "€",
            "USD" => "$",
            "GBP" => "£",
            other => other,
        };
        // NOTE: Negative amounts carry the sign on both fields, or only on
        // `nanos` when `units` is zero.
        let sign = if self.units < 0 || self.nanos < 0 { "-" } else { "" };
        let cents = self.nanos.unsigned_abs() / 10_000_000;
        format!(
            "{} {}{}.{:02}",
            symbol,
            sign,
            self.units.unsigned_abs(),
            cents
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferProduct {
    pub name: String,
    pub option: bool,
    pub email_accounts_quota: i32,
    pub email_storage_quota: i32,
    pub databases_quota: i32,
    pub hosting_storage_quota: i32,
    pub support_included: bool,
    pub v_cpu: i32,
    pub ram: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhostingOffer {
    pub id: String,
    #[serde(default)]
    pub billing_operation_path: String,
    pub product: OfferProduct,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub available: bool,
}

impl Observed for WebhostingOffer {
    type State = ();

    fn state(&self) {}
}

impl WebhostingOffer {
    pub fn into_resource(self, region: &str) -> Resource {
        let product = &self.product;
        Resource {
            resource_type: "scaleway_webhosting_offer".to_string(),
            resource_id: encode_regional(region, &self.id),
            name: product.name.clone(),
            region: region.to_string(),
            metadata: serde_json::json!({
                "billing_operation_path": self.billing_operation_path,
                "price": self.price.as_ref().map(Money::display),
                "available": self.available,
                "product": [{
                    "option": product.option,
                    "email_accounts_quota": product.email_accounts_quota,
                    "email_storage_quota": product.email_storage_quota,
                    "databases_quota": product.databases_quota,
                    "hosting_storage_quota": product.hosting_storage_quota,
                    "support_included": product.support_included,
                    "v_cpu": product.v_cpu,
                    "ram": product.ram,
                }],
            }),
        }
    }
}
