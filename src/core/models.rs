use crate::core::error::{RequestError, UsageParseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-metric usage percentages reported in the `x-app-usage` header. Any JSON
/// object is accepted; only numeric values take part in the saturation check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageSignal {
    pub metrics: BTreeMap<String, Value>,
}

impl UsageSignal {
    pub fn parse(header: Option<&[u8]>) -> Result<Self, UsageParseError> {
        let raw = header.ok_or(UsageParseError::Missing)?;
        Ok(serde_json::from_slice(raw)?)
    }

    pub fn from_error(error: &RequestError) -> Result<Self, UsageParseError> {
        Self::parse(error.usage_header())
    }

    /// True when any numeric metric sits exactly at `max_usage` (`100` and
    /// `100.0` both count).
    pub fn is_saturated(&self, max_usage: i64) -> bool {
        let max = max_usage as f64;
        self.metrics
            .values()
            .any(|v| v.as_f64().is_some_and(|n| n == max))
    }
}

/// How one fetch cycle ended. `backoffs` counts the rate-limit waits taken.
#[derive(Debug)]
pub enum CycleOutcome {
    Success { payload: Value, backoffs: u32 },
    Failed { error: RequestError, backoffs: u32 },
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Success { .. })
    }

    pub fn backoffs(&self) -> u32 {
        match self {
            CycleOutcome::Success { backoffs, .. } | CycleOutcome::Failed { backoffs, .. } => {
                *backoffs
            }
        }
    }
}

/// Whole-second rendering used by the backoff notice.
pub fn format_secs(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1000 == 0 {
        format!("{}", millis / 1000)
    } else {
        format!("{:.3}", duration.as_secs_f64())
    }
}
