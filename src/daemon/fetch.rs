use crate::core::credentials::Credential;
use crate::core::models::{format_secs, CycleOutcome, UsageSignal};
use crate::core::retry::BackoffState;
use crate::core::settings::BackoffSettings;
use crate::providers::GraphApi;

/// Runs one fetch cycle to completion.
///
/// Rate-limited responses (an `x-app-usage` metric at `max_usage`) are retried
/// after an exponentially growing wait. Anything else, including a missing or
/// unparseable usage header, ends the cycle without retrying.
pub async fn fetch_with_backoff(
    api: &dyn GraphApi,
    credential: &Credential,
    settings: &BackoffSettings,
) -> CycleOutcome {
    let mut backoff = BackoffState::from_settings(settings);

    loop {
        tracing::debug!(
            attempt = backoff.waits() + 1,
            next_backoff_ms =
                u64::try_from(backoff.current_delay().as_millis()).unwrap_or(u64::MAX),
            "Requesting resource"
        );

        let error = match api.get(credential).await {
            Ok(payload) => {
                tracing::info!(%payload, "Fetched resource");
                return CycleOutcome::Success {
                    payload,
                    backoffs: backoff.waits(),
                };
            }
            Err(error) => error,
        };

        match UsageSignal::from_error(&error) {
            Ok(signal) if signal.is_saturated(settings.max_usage) => {
                let delay = backoff.next_delay();
                tracing::warn!(
                    usage = ?signal.metrics,
                    "Backing off, waiting {} secs...",
                    format_secs(delay)
                );
                tokio::time::sleep(delay).await;
            }
            signal => {
                if let Err(parse_error) = &signal {
                    tracing::debug!(error = %parse_error, "No usable usage signal");
                }
                tracing::error!(error = %error, "Failed to fetch resource");
                return CycleOutcome::Failed {
                    error,
                    backoffs: backoff.waits(),
                };
            }
        }
    }
}
