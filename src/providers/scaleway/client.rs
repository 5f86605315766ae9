use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::ScalewayError;
use super::types::{
    DEFAULT_PAGE_SIZE, Database, DocumentDbInstance, PrivateNetwork, WebhostingOffer,
};
use crate::config::SCALEWAY_API_BASE;

const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Clone)]
pub struct ScalewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScalewayClient {
    pub fn new(secret_key: String) -> Result<Self, ScalewayError> {
        Self::with_base_url(secret_key, SCALEWAY_API_BASE.to_string())
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(secret_key: String, base_url: String) -> Result<Self, ScalewayError> {
        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(&secret_key).map_err(|_| ScalewayError::Auth {
            message: "Invalid secret key format".to_string(),
        })?;
        headers.insert(AUTH_HEADER, header_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ScalewayError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn list_private_networks(
        &self,
        region: &str,
        name: Option<&str>,
    ) -> Result<Vec<PrivateNetwork>, ScalewayError> {
        let mut url = format!(
            "{}/vpc/v2/regions/{}/private-networks",
            self.base_url, region
        );
        if let Some(name) = name {
            url.push_str(&format!("?name={}", urlencoding::encode(name)));
        }

        self.fetch_all_pages(&url, DEFAULT_PAGE_SIZE, |body| {
            decode_field(body, "private_networks", "private network")
        })
        .await
    }

    pub async fn get_private_network(
        &self,
        region: &str,
        id: &str,
    ) -> Result<Option<PrivateNetwork>, ScalewayError> {
        let url = format!(
            "{}/vpc/v2/regions/{}/private-networks/{}",
            self.base_url, region, id
        );
        self.get_optional(&url, "private network").await
    }

    pub async fn list_documentdb_instances(
        &self,
        region: &str,
        name: Option<&str>,
    ) -> Result<Vec<DocumentDbInstance>, ScalewayError> {
        let mut url = format!(
            "{}/document-db/v1beta1/regions/{}/instances",
            self.base_url, region
        );
        if let Some(name) = name {
            url.push_str(&format!("?name={}", urlencoding::encode(name)));
        }

        self.fetch_all_pages(&url, DEFAULT_PAGE_SIZE, |body| {
            decode_field(body, "instances", "documentdb instance")
        })
        .await
    }

    pub async fn get_documentdb_instance(
        &self,
        region: &str,
        id: &str,
    ) -> Result<Option<DocumentDbInstance>, ScalewayError> {
        let url = format!(
            "{}/document-db/v1beta1/regions/{}/instances/{}",
            self.base_url, region, id
        );
        self.get_optional(&url, "documentdb instance").await
    }

    /// `Ok(None)` when the parent instance itself does not exist.
    pub async fn list_documentdb_databases(
        &self,
        region: &str,
        instance_id: &str,
        name: Option<&str>,
    ) -> Result<Option<Vec<Database>>, ScalewayError> {
        let mut url = format!(
            "{}/document-db/v1beta1/regions/{}/instances/{}/databases",
            self.base_url, region, instance_id
        );
        if let Some(name) = name {
            url.push_str(&format!("?name={}", urlencoding::encode(name)));
        }

        let result = self
            .fetch_all_pages(&url, DEFAULT_PAGE_SIZE, |body| {
                decode_field(body, "databases", "documentdb database")
            })
            .await;

        match result {
            Ok(databases) => Ok(Some(databases)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    // NOTE: The offers endpoint is not paginated and has no name filter
    pub async fn list_webhosting_offers(
        &self,
        region: &str,
    ) -> Result<Vec<WebhostingOffer>, ScalewayError> {
        let url = format!(
            "{}/webhosting/v1alpha1/regions/{}/offers",
            self.base_url, region
        );
        let body = self.get_json(&url).await?;
        decode_field(body, "offers", "webhosting offer")
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
        resource_type: &str,
    ) -> Result<Option<T>, ScalewayError> {
        match self.get_json(url).await {
            Ok(body) => serde_json::from_value(body)
                .map(Some)
                .map_err(|e| ScalewayError::Decode {
                    resource_type: resource_type.to_string(),
                    message: e.to_string(),
                }),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, ScalewayError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        let body: serde_json::Value = response.json().await.map_err(|e| ScalewayError::Api {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })?;

        if status.is_success() {
            return Ok(body);
        }

        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ScalewayError::Auth { message }),
            _ => Err(ScalewayError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Walks `page`/`page_size` pagination until `total_count` items have
    /// been seen or a page comes back empty.
    pub async fn fetch_all_pages<T, F>(
        &self,
        base_url: &str,
        page_size: u32,
        parse_fn: F,
    ) -> Result<Vec<T>, ScalewayError>
    where
        F: Fn(serde_json::Value) -> Result<Vec<T>, ScalewayError>,
    {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        let mut all_results = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}{}page={}&page_size={}",
                base_url, separator, page, page_size
            );
            let body = self.get_json(&url).await?;

            let total_count = body
                .get("total_count")
                .and_then(|tc| tc.as_u64())
                .unwrap_or(0);

            let page_results = parse_fn(body)?;
            let count = page_results.len();
            all_results.extend(page_results);

            if u64::from(page) * u64::from(page_size) >= total_count || count == 0 {
                break;
            }

            page += 1;
        }

        Ok(all_results)
    }
}

fn decode_field<T: DeserializeOwned>(
    mut body: serde_json::Value,
    field: &str,
    resource_type: &str,
) -> Result<Vec<T>, ScalewayError> {
    let items = body
        .get_mut(field)
        .map(serde_json::Value::take)
        .unwrap_or_else(|| serde_json::json!([]));

    serde_json::from_value(items).map_err(|e| ScalewayError::Decode {
        resource_type: resource_type.to_string(),
        message: e.to_string(),
    })
}

impl std::fmt::Debug for ScalewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalewayClient")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}
