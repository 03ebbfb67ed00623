use crate::core::credentials::Credential;
use crate::core::settings::Settings;
use crate::daemon::fetch::fetch_with_backoff;
use crate::providers::GraphApi;
use std::time::Duration;
use tokio::time::Instant;

pub struct PollingLoop<'a> {
    api: &'a dyn GraphApi,
    credential: &'a Credential,
    settings: &'a Settings,
}

impl<'a> PollingLoop<'a> {
    pub fn new(api: &'a dyn GraphApi, credential: &'a Credential, settings: &'a Settings) -> Self {
        Self {
            api,
            credential,
            settings,
        }
    }

    /// Runs fetch cycles back to back, one per interval measured from cycle
    /// start to cycle start. `max_cycles = None` runs forever.
    pub async fn run(&self, max_cycles: Option<u64>) -> u64 {
        let interval = self.settings.polling.interval();
        tracing::info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Polling loop started"
        );

        let mut cycles = 0u64;
        while max_cycles.map_or(true, |max| cycles < max) {
            let start = Instant::now();

            let outcome =
                fetch_with_backoff(self.api, self.credential, &self.settings.backoff).await;
            cycles += 1;

            let elapsed = start.elapsed();
            tracing::debug!(
                cycle = cycles,
                success = outcome.is_success(),
                backoffs = outcome.backoffs(),
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "Fetch cycle finished"
            );

            if max_cycles.is_some_and(|max| cycles >= max) {
                break;
            }

            let wait = remaining_wait(interval, elapsed);
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        }

        cycles
    }
}

/// `max(0, interval - elapsed)`.
pub fn remaining_wait(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}
