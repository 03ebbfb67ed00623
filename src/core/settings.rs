use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub polling: PollingSettings,
    pub backoff: BackoffSettings,
    pub credential_env: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            polling: PollingSettings::default(),
            backoff: BackoffSettings::default(),
            credential_env: "ACCESS_TOKEN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub version: String,
    pub path: String,
    pub fields: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com".to_string(),
            version: "v19.0".to_string(),
            path: "me".to_string(),
            fields: vec!["id".into(), "name".into(), "last_name".into()],
            request_timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version.trim_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    pub fn fields_param(&self) -> String {
        self.fields.join(",")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self { interval_ms: 2000 }
    }
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSettings {
    pub initial_ms: u64,
    /// Unset means the wait keeps doubling with no ceiling.
    pub max_ms: Option<u64>,
    pub max_usage: i64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            initial_ms: 60_000,
            max_ms: None,
            max_usage: 100,
        }
    }
}

impl BackoffSettings {
    pub fn initial(&self) -> Duration {
        Duration::from_millis(self.initial_ms)
    }

    pub fn max(&self) -> Option<Duration> {
        self.max_ms.map(Duration::from_millis)
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("graph-poll").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config directory")?;

        if !path.exists() {
            tracing::info!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(?path, "Loaded config");
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.credential_env.trim().is_empty() {
            anyhow::bail!("credential_env must not be empty");
        }
        if self.api.fields.is_empty() {
            anyhow::bail!("api.fields must list at least one field");
        }
        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("api.request_timeout_secs must be greater than 0");
        }
        if self.polling.interval_ms == 0 {
            anyhow::bail!("polling.interval_ms must be greater than 0");
        }
        if self.backoff.initial_ms == 0 {
            anyhow::bail!("backoff.initial_ms must be greater than 0");
        }
        if let Some(max_ms) = self.backoff.max_ms {
            if max_ms < self.backoff.initial_ms {
                anyhow::bail!(
                    "backoff.max_ms ({}) must not be below backoff.initial_ms ({})",
                    max_ms,
                    self.backoff.initial_ms
                );
            }
        }
        if !(1..=100).contains(&self.backoff.max_usage) {
            anyhow::bail!(
                "backoff.max_usage must be between 1 and 100, got {}",
                self.backoff.max_usage
            );
        }
        Ok(())
    }
}
