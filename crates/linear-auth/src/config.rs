//! Credential store selection
//!
//! The CLI picks a backend once per invocation. By default that is the OS
//! keychain under [`SERVICE_NAME`]; tests and sandboxes switch to the
//! in-memory backend through the environment or an embedded config section.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{create_credential_store, has_backend, CredentialError, CredentialResult, CredentialStore};
use crate::SERVICE_NAME;

/// Backend name override
pub const ENV_STORE: &str = "LINEAR_CREDENTIAL_STORE";
/// Service namespace override
pub const ENV_SERVICE: &str = "LINEAR_CREDENTIAL_SERVICE";

pub const DEFAULT_BACKEND: &str = "keychain";

/// Which backend to open, and under which namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Registered backend name ("keychain", "memory", ...)
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Namespace scoping every entry
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}

fn default_service() -> String {
    SERVICE_NAME.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            service: default_service(),
        }
    }
}

impl StoreConfig {
    /// In-memory store under the given namespace
    pub fn memory(service: impl Into<String>) -> Self {
        Self {
            backend: "memory".to_string(),
            service: service.into(),
        }
    }

    /// Build from `LINEAR_CREDENTIAL_STORE` / `LINEAR_CREDENTIAL_SERVICE`
    pub fn from_env() -> CredentialResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    ///
    /// Empty values fall back to the defaults. The backend name is
    /// lower-cased and must be registered.
    pub fn from_lookup<F>(lookup: F) -> CredentialResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Self {
            backend: non_empty(ENV_STORE)
                .map(|v| v.to_lowercase())
                .unwrap_or_else(default_backend),
            service: non_empty(ENV_SERVICE).unwrap_or_else(default_service),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the backend exists and the namespace is usable
    pub fn validate(&self) -> CredentialResult<()> {
        if self.service.trim().is_empty() {
            return Err(CredentialError::Config("service name must not be empty".to_string()));
        }
        if !has_backend(&self.backend) {
            return Err(CredentialError::Config(format!(
                "unknown credential store backend '{}'",
                self.backend
            )));
        }
        Ok(())
    }
}

/// Open the store described by `config`
///
/// # Example
///
/// ```
/// use linear_auth::{open_credential_store, StoreConfig};
///
/// let store = open_credential_store(&StoreConfig::memory("linear-cli-test")).unwrap();
/// store.set_api_key("lin_api_abc123").unwrap();
/// assert_eq!(store.get_api_key().unwrap(), "lin_api_abc123");
/// ```
pub fn open_credential_store(config: &StoreConfig) -> CredentialResult<Arc<dyn CredentialStore>> {
    config.validate()?;
    let store = create_credential_store(&config.backend, &config.service).ok_or_else(|| {
        CredentialError::Config(format!("unknown credential store backend '{}'", config.backend))
    })?;
    crate::debug_log!("opened '{}' store for service '{}'", config.backend, config.service);
    Ok(store)
}
