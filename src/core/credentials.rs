use crate::core::error::ConfigError;
use std::fmt;

/// Opaque access token, read once at startup and reused for every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(var, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(var: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(var) {
            Some(token) if !token.is_empty() => Ok(Self(token)),
            _ => Err(ConfigError::MissingCredential {
                var: var.to_string(),
            }),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

// Keep tokens out of log output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_credential() {
        let cred = Credential::from_lookup("ACCESS_TOKEN", |_| Some("abc123".into())).unwrap();
        assert_eq!(cred.expose(), "abc123");
    }

    #[test]
    fn test_missing_credential() {
        let err = Credential::from_lookup("ACCESS_TOKEN", |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { ref var } if var == "ACCESS_TOKEN"));
    }

    #[test]
    fn test_empty_credential_is_missing() {
        assert!(Credential::from_lookup("ACCESS_TOKEN", |_| Some(String::new())).is_err());
    }

    #[test]
    fn test_whitespace_credential_is_kept_verbatim() {
        let cred = Credential::from_lookup("ACCESS_TOKEN", |_| Some("   ".into())).unwrap();
        assert_eq!(cred.expose(), "   ");
    }

    #[test]
    fn test_lookup_uses_configured_var() {
        let cred = Credential::from_lookup("GRAPH_TOKEN", |name| {
            (name == "GRAPH_TOKEN").then(|| "tok".to_string())
        })
        .unwrap();
        assert_eq!(cred.expose(), "tok");
    }

    #[test]
    fn test_debug_redacts_token() {
        let cred = Credential::from("secret");
        assert_eq!(format!("{:?}", cred), "Credential(***)");
    }
}
