mod graph;

use crate::core::credentials::Credential;
use crate::core::error::RequestError;
use async_trait::async_trait;
use serde_json::Value;

pub use graph::GraphClient;

#[cfg(test)]
pub mod fake;

/// One GET against the configured resource. Implementations issue exactly one
/// request per call and never retry on their own.
#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn get(&self, credential: &Credential) -> Result<Value, RequestError>;
}
