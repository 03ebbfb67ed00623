mod fetch;
mod polling;

use crate::core::credentials::Credential;
use crate::core::error::ConfigError;
use crate::core::settings::Settings;
use crate::providers::{GraphApi, GraphClient};
use anyhow::Result;
use polling::PollingLoop;

pub use fetch::fetch_with_backoff;

pub async fn run(settings: &Settings, max_cycles: Option<u64>) -> Result<()> {
    tracing::info!("Starting graph-poll");

    let client = GraphClient::new(&settings.api)?;
    tracing::info!(endpoint = client.endpoint(), "Polling resource");

    start(&client, settings, max_cycles, |var| std::env::var(var).ok()).await?;
    Ok(())
}

/// Reads the credential and hands off to the poll loop. Returns the number of
/// cycles run, which only happens when `max_cycles` is set.
pub async fn start<F>(
    api: &dyn GraphApi,
    settings: &Settings,
    max_cycles: Option<u64>,
    lookup: F,
) -> Result<u64, ConfigError>
where
    F: FnOnce(&str) -> Option<String>,
{
    let credential = Credential::from_lookup(&settings.credential_env, lookup)?;

    Ok(PollingLoop::new(api, &credential, settings)
        .run(max_cycles)
        .await)
}
