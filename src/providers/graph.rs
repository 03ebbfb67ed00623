use crate::core::credentials::Credential;
use crate::core::error::RequestError;
use crate::core::settings::ApiSettings;
use crate::providers::GraphApi;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

const USAGE_HEADER: &str = "x-app-usage";

pub struct GraphClient {
    client: reqwest::Client,
    endpoint: String,
    fields: String,
}

impl GraphClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: settings.endpoint(),
            fields: settings.fields_param(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Non-JSON success bodies are passed through as a JSON string.
fn parse_payload(body: String) -> Value {
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

#[async_trait]
impl GraphApi for GraphClient {
    async fn get(&self, credential: &Credential) -> Result<Value, RequestError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("fields", self.fields.as_str()),
                ("access_token", credential.expose()),
            ])
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let usage_header = response
                .headers()
                .get(USAGE_HEADER)
                .map(|v| v.as_bytes().to_vec());
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status {
                status: status.as_u16(),
                usage_header,
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Body(e.without_url().to_string()))?;

        Ok(parse_payload(body))
    }
}
