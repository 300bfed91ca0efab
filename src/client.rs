//! HTTP client for the remote usage API and the local ticker receiver

use serde_json::Value;

const ANTHROPIC_BETA: &str = "oauth-2025-04-20";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("GET {url} failed: {status} {body}")]
    Upstream { url: String, status: u16, body: String },
    #[error("POST {url} failed: {status} {body}")]
    Downstream { url: String, status: u16, body: String },
}

pub struct TickerClient {
    client: reqwest::Client,
    usage_url: String,
    update_url: String,
}

impl TickerClient {
    pub fn new(usage_url: &str, update_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            usage_url: usage_url.to_string(),
            update_url: update_url.to_string(),
        }
    }

    pub fn update_url(&self) -> &str {
        &self.update_url
    }

    /// Fetches the account usage document. The body is decoded as
    /// arbitrary JSON and passed through; nothing here depends on its
    /// shape.
    pub async fn fetch_usage(&self, token: &str) -> Result<Value, ClientError> {
        let response = self
            .client
            .get(&self.usage_url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .header("anthropic-beta", ANTHROPIC_BETA)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Upstream {
                url: self.usage_url.clone(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// Relays the usage document verbatim to the local receiver.
    pub async fn post_update(&self, payload: &Value) -> Result<(), ClientError> {
        let response = self
            .client
            .post(&self.update_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Downstream {
                url: self.update_url.clone(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
