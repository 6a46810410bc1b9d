//! API key resolution
//!
//! Checks sources in priority order:
//! 1. The `LINEAR_API_KEY` environment variable
//! 2. The credential store

use std::fmt;
use std::sync::Arc;

use crate::store::{CredentialError, CredentialResult, CredentialStore};

/// Environment variable that overrides a stored API key
pub const ENV_API_KEY: &str = "LINEAR_API_KEY";

/// Where a resolved secret came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Read from an environment variable
    Environment(String),
    /// Read from the named credential store backend
    Store(String),
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretSource::Environment(var) => write!(f, "environment ({})", var),
            SecretSource::Store(name) => write!(f, "{} store", name),
        }
    }
}

/// Result of resolving a secret
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value
    pub value: String,
    /// Which source provided the secret
    pub source: SecretSource,
}

// Keep the value out of debug output
impl fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves the API key from the environment, then the store
pub struct ApiKeyResolver {
    store: Arc<dyn CredentialStore>,
    env_var: String,
    check_environment: bool,
    lookup: EnvLookup,
}

impl ApiKeyResolver {
    /// Create a resolver over `store` that honours `LINEAR_API_KEY`
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            env_var: ENV_API_KEY.to_string(),
            check_environment: true,
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Use a different environment variable name
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    /// Replace the environment lookup (tests)
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    /// Set whether the environment is consulted at all
    pub fn set_check_environment(&mut self, check: bool) {
        self.check_environment = check;
    }

    pub fn get_check_environment(&self) -> bool {
        self.check_environment
    }

    /// Resolve the API key
    ///
    /// Returns `Ok(None)` when neither source has one. Store failures other
    /// than "not found" are returned as errors rather than skipped.
    pub fn resolve(&self) -> CredentialResult<Option<ResolvedSecret>> {
        if self.check_environment {
            if let Some(value) = (self.lookup)(&self.env_var).filter(|v| !v.is_empty()) {
                crate::debug_log!("API key resolved from {}", self.env_var);
                return Ok(Some(ResolvedSecret {
                    value,
                    source: SecretSource::Environment(self.env_var.clone()),
                }));
            }
        }

        match self.store.get_api_key() {
            Ok(value) => {
                crate::debug_log!("API key resolved from {} store", self.store.name());
                Ok(Some(ResolvedSecret {
                    value,
                    source: SecretSource::Store(self.store.name().to_string()),
                }))
            }
            Err(CredentialError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for ApiKeyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyResolver")
            .field("store", &self.store.name())
            .field("env_var", &self.env_var)
            .field("check_environment", &self.check_environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCredentialStore, SecretKind};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_environment_wins() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set_api_key("lin_api_stored").unwrap();

        let resolver = ApiKeyResolver::new(store).with_lookup(|name| {
            (name == ENV_API_KEY).then(|| "lin_api_env".to_string())
        });

        let resolved = resolver.resolve().unwrap().unwrap();
        assert_eq!(resolved.value, "lin_api_env");
        assert_eq!(resolved.source, SecretSource::Environment(ENV_API_KEY.to_string()));
    }

    #[test]
    fn test_falls_back_to_store() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set_api_key("lin_api_stored").unwrap();

        let resolver = ApiKeyResolver::new(store).with_lookup(|_| Some(String::new()));

        let resolved = resolver.resolve().unwrap().unwrap();
        assert_eq!(resolved.value, "lin_api_stored");
        assert_eq!(resolved.source, SecretSource::Store("memory".to_string()));
    }

    #[test]
    fn test_environment_disabled() {
        let store = Arc::new(MemoryCredentialStore::new());
        let mut resolver = ApiKeyResolver::new(store).with_lookup(|_| Some("lin_api_env".to_string()));
        resolver.set_check_environment(false);
        assert!(!resolver.get_check_environment());

        assert_eq!(resolver.resolve().unwrap(), None);
    }

    #[test]
    fn test_nothing_configured() {
        let store = Arc::new(MemoryCredentialStore::new());
        let resolver = ApiKeyResolver::new(store).with_lookup(no_env);
        assert_eq!(resolver.resolve().unwrap(), None);
    }

    #[test]
    fn test_custom_env_var() {
        let store = Arc::new(MemoryCredentialStore::new());
        let resolver = ApiKeyResolver::new(store)
            .with_env_var("LINEAR_TOKEN")
            .with_lookup(|name| (name == "LINEAR_TOKEN").then(|| "lin_api_custom".to_string()));

        let resolved = resolver.resolve().unwrap().unwrap();
        assert_eq!(resolved.source.to_string(), "environment (LINEAR_TOKEN)");
    }

    #[test]
    fn test_store_errors_propagate() {
        struct Broken;

        impl CredentialStore for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn service(&self) -> &str {
                "broken"
            }
            fn get(&self, _kind: SecretKind) -> CredentialResult<String> {
                Err(CredentialError::PermissionDenied("locked".to_string()))
            }
            fn set(&self, _kind: SecretKind, _value: &str) -> CredentialResult<()> {
                Ok(())
            }
            fn delete(&self, _kind: SecretKind) -> CredentialResult<()> {
                Ok(())
            }
        }

        let resolver = ApiKeyResolver::new(Arc::new(Broken)).with_lookup(no_env);
        assert!(matches!(resolver.resolve(), Err(CredentialError::PermissionDenied(_))));
    }

    #[test]
    fn test_debug_redacts_value() {
        let resolved = ResolvedSecret {
            value: "lin_api_secret".to_string(),
            source: SecretSource::Store("memory".to_string()),
        };
        let debug = format!("{:?}", resolved);
        assert!(!debug.contains("lin_api_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
