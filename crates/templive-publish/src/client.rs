//! HTTP client for the publish endpoint

use crate::endpoint::{parse_endpoint, publish_url};
use crate::error::PublishError;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use templive_core::config::PublishConfig;
use templive_core::publish::{PublishRequest, PublishResult, Publisher};
use url::Url;

/// User agent sent with publish requests
pub const USER_AGENT: &str = concat!("templive/", env!("CARGO_PKG_VERSION"));

/// Longest response body kept in a [`PublishError::Rejected`]
const MAX_ERROR_BODY: usize = 512;

/// Builds HTTP client with the given request timeout
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

#[derive(Serialize)]
struct PublishBody<'a> {
    body: &'a str,
    styles: &'a str,
}

#[derive(Deserialize)]
struct PublishResponse {
    template: serde_json::Value,
}

impl PublishResponse {
    /// Template id as text; the service may send a string or a number
    fn template_id(self) -> Result<String, PublishError> {
        let id = match self.template {
            serde_json::Value::String(id) => id,
            serde_json::Value::Number(id) => id.to_string(),
            other => {
                return Err(PublishError::InvalidResponse(format!(
                    "template id is not a string or number: {}",
                    other
                )));
            }
        };
        if id.trim().is_empty() {
            return Err(PublishError::InvalidResponse(
                "empty template id".to_string(),
            ));
        }
        Ok(id)
    }
}

/// Publishes templates to a remote service
#[derive(Debug, Clone)]
pub struct PublishClient {
    client: Client,
    endpoint: Url,
}

impl PublishClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, PublishError> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = build_client(timeout)?;
        Ok(Self { client, endpoint })
    }

    /// Client for the configured endpoint, honouring `TEMPLIVE_PUBLISH_URL`
    pub fn from_config(config: &PublishConfig) -> Result<Self, PublishError> {
        Self::new(&config.resolved_endpoint(), config.timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one publish request and return the template id
    ///
    /// The credential must already be known to be non-empty.
    pub async fn send(&self, request: &PublishRequest) -> Result<String, PublishError> {
        let url = publish_url(&self.endpoint)?;
        tracing::debug!(url = %url, "publishing template");

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, request.credential.expose())
            .json(&PublishBody {
                body: &request.markup,
                styles: &request.stylesheet,
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let mut body = text;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PublishResponse = serde_json::from_str(&text)
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;
        parsed.template_id()
    }
}

impl Publisher for PublishClient {
    async fn publish(&self, request: &PublishRequest) -> PublishResult {
        if request.credential.is_empty() {
            return PublishResult::MissingCredential;
        }

        match self.send(request).await {
            Ok(template_id) => {
                tracing::info!(template_id = %template_id, "template published");
                PublishResult::Success { template_id }
            }
            Err(err) => {
                tracing::error!(error = %err, "publish failed");
                PublishResult::failure()
            }
        }
    }
}
