//! Backend registry for creating credential stores by name

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::keychain_store::KeychainCredentialStore;
use super::memory_store::MemoryCredentialStore;
use super::traits::CredentialStore;

/// Factory function type: builds a store scoped to the given service name
pub type BackendFactory = Box<dyn Fn(&str) -> Arc<dyn CredentialStore> + Send + Sync>;

/// Definition of a registered backend
pub struct BackendDefinition {
    /// Unique name for this backend
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function to create instances
    pub factory: BackendFactory,
}

impl std::fmt::Debug for BackendDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Global registry of credential store backends
static REGISTRY: Lazy<RwLock<HashMap<String, BackendDefinition>>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        "keychain".to_string(),
        BackendDefinition {
            name: "keychain".to_string(),
            description: "System keychain (macOS Keychain, Windows Credential Manager, Linux Secret Service)".to_string(),
            factory: Box::new(|service| Arc::new(KeychainCredentialStore::with_service(service))),
        },
    );

    map.insert(
        "memory".to_string(),
        BackendDefinition {
            name: "memory".to_string(),
            description: "In-memory storage for tests, nothing is persisted".to_string(),
            factory: Box::new(|service| Arc::new(MemoryCredentialStore::with_service(service))),
        },
    );

    RwLock::new(map)
});

/// Backend names are matched case-insensitively, ignoring surrounding spaces
fn registry_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Register a backend, replacing any existing one with the same name
///
/// The name is stored lower-cased, so lookups with any casing find it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use linear_auth::store::{register_backend, create_credential_store, MemoryCredentialStore};
///
/// register_backend(
///     "scratch",
///     "Throwaway store",
///     Box::new(|service| Arc::new(MemoryCredentialStore::with_service(service))),
/// );
///
/// let store = create_credential_store("scratch", "linear-cli").unwrap();
/// assert_eq!(store.name(), "memory");
/// ```
pub fn register_backend(name: &str, description: &str, factory: BackendFactory) {
    let key = registry_key(name);
    REGISTRY.write().insert(
        key.clone(),
        BackendDefinition {
            name: key,
            description: description.to_string(),
            factory,
        },
    );
}

/// Create a store from the named backend, scoped to `service`
///
/// Returns `None` if no backend is registered under `name`.
pub fn create_credential_store(name: &str, service: &str) -> Option<Arc<dyn CredentialStore>> {
    REGISTRY.read().get(&registry_key(name)).map(|def| (def.factory)(service))
}

/// List registered backends as (name, description) pairs, sorted by name
pub fn list_backends() -> Vec<(String, String)> {
    let mut backends: Vec<_> = REGISTRY
        .read()
        .values()
        .map(|def| (def.name.clone(), def.description.clone()))
        .collect();
    backends.sort();
    backends
}

/// Check if a backend is registered
pub fn has_backend(name: &str) -> bool {
    REGISTRY.read().contains_key(&registry_key(name))
}

/// Unregister a backend (mainly for testing)
pub fn unregister_backend(name: &str) -> bool {
    REGISTRY.write().remove(&registry_key(name)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        assert!(has_backend("keychain"));
        assert!(has_backend("memory"));
    }

    #[test]
    fn test_create_memory_store() {
        let store = create_credential_store("memory", "registry-test").unwrap();
        assert_eq!(store.name(), "memory");
        assert_eq!(store.service(), "registry-test");
    }

    #[test]
    fn test_create_keychain_store() {
        // Construction never touches the OS store
        let store = create_credential_store("keychain", "registry-test").unwrap();
        assert_eq!(store.name(), "keychain");
        assert_eq!(store.service(), "registry-test");
    }

    #[test]
    fn test_create_unknown_backend() {
        assert!(create_credential_store("nonexistent_xyz", "svc").is_none());
    }

    #[test]
    fn test_list_backends() {
        let names: Vec<_> = list_backends().into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"keychain".to_string()));
        assert!(names.contains(&"memory".to_string()));
    }

    #[test]
    fn test_register_custom_backend() {
        register_backend(
            "test_custom_backend",
            "A test backend",
            Box::new(|service| Arc::new(MemoryCredentialStore::with_service(service))),
        );

        assert!(has_backend("test_custom_backend"));
        let store = create_credential_store("test_custom_backend", "svc").unwrap();
        assert_eq!(store.name(), "memory");

        assert!(unregister_backend("test_custom_backend"));
        assert!(!has_backend("test_custom_backend"));
        assert!(!unregister_backend("test_custom_backend"));
    }

    #[test]
    fn test_backend_names_ignore_case() {
        register_backend(
            "Test_Mixed_Case",
            "Registered with capitals",
            Box::new(|service| Arc::new(MemoryCredentialStore::with_service(service))),
        );

        assert!(has_backend("test_mixed_case"));
        assert!(has_backend(" TEST_MIXED_CASE "));
        let store = create_credential_store("test_mixed_case", "svc").unwrap();
        assert_eq!(store.service(), "svc");
        assert!(list_backends().iter().any(|(n, _)| n == "test_mixed_case"));

        assert!(unregister_backend("Test_Mixed_Case"));
        assert!(!has_backend("test_mixed_case"));
    }

    #[test]
    fn test_builtin_lookup_ignores_case() {
        assert!(has_backend("Keychain"));
        assert_eq!(create_credential_store("MEMORY", "svc").unwrap().name(), "memory");
    }
}
