use crate::core::settings::BackoffSettings;
use std::time::Duration;

const BACKOFF_FACTOR: u32 = 2;

/// Wait state for a single fetch cycle. Create a fresh one per cycle.
#[derive(Debug, Clone)]
pub struct BackoffState {
    current: Duration,
    max: Option<Duration>,
    waits: u32,
}

impl BackoffState {
    pub fn new(initial: Duration, max: Option<Duration>) -> Self {
        Self {
            current: initial,
            max,
            waits: 0,
        }
    }

    pub fn from_settings(settings: &BackoffSettings) -> Self {
        Self::new(settings.initial(), settings.max())
    }

    pub fn current_delay(&self) -> Duration {
        self.current
    }

    pub fn waits(&self) -> u32 {
        self.waits
    }

    /// Returns the delay to wait now and doubles the next one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        let doubled = self
            .current
            .checked_mul(BACKOFF_FACTOR)
            .unwrap_or(Duration::MAX);
        self.current = match self.max {
            Some(max) => doubled.min(max),
            None => doubled,
        };
        self.waits = self.waits.saturating_add(1);
        delay
    }
}

impl Default for BackoffState {
    fn default() -> Self {
        Self::from_settings(&BackoffSettings::default())
    }
}
