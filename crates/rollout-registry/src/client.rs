use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use rollout_core::{RegistryError, VersionRegistry};
use rollout_model::VersionSnapshot;

use crate::config::RegistryConfig;
use crate::errors::HttpRegistryError;

const GET_DEFAULT_PATH: &str = "/v1/actor_definition_versions/get_default";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetDefaultVersionRequest {
    actor_definition_id: Uuid,
}

/// Registry client backed by a pooled `reqwest::Client`.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpVersionRegistry {
    client: reqwest::Client,
    url: String,
}

impl HttpVersionRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self, HttpRegistryError> {
        let mut builder = reqwest::Client::builder();
        if config.request_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.request_timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            url: format!("{}{}", config.endpoint.trim_end_matches('/'), GET_DEFAULT_PATH),
        })
    }

    async fn get_default(&self, actor_definition_id: Uuid) -> Result<VersionSnapshot, HttpRegistryError> {
        debug!(%actor_definition_id, url = %self.url, "fetching default version");

        let response = self
            .client
            .post(&self.url)
            .json(&GetDefaultVersionRequest { actor_definition_id })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(HttpRegistryError::NotFound(actor_definition_id));
        }
        if !status.is_success() {
            return Err(HttpRegistryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            HttpRegistryError::InvalidResponse(format!(
                "failed to parse response: {}, body: {}",
                e, body
            ))
        })
    }
}

#[async_trait]
impl VersionRegistry for HttpVersionRegistry {
    async fn fetch_default_version(
        &self,
        actor_definition_id: Uuid,
    ) -> Result<VersionSnapshot, RegistryError> {
        self.get_default(actor_definition_id).await.map_err(|e| {
            warn!(%actor_definition_id, "default version lookup failed: {}", e);
            RegistryError::from(e)
        })
    }
}
