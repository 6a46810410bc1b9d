//! In-memory credential store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{CredentialError, CredentialResult, CredentialStore, SecretKind};
use crate::SERVICE_NAME;

/// In-memory credential store for tests and sandboxed runs
///
/// Nothing is persisted; credentials are lost when the store is dropped.
///
/// # Thread Safety
///
/// Each individual operation takes an internal lock, so the store can be
/// shared behind an `Arc`. Sequences of operations (read, then write) are not
/// atomic; callers that need that must serialize access themselves.
///
/// # Example
///
/// ```
/// use linear_auth::store::{CredentialStore, MemoryCredentialStore};
///
/// let store = MemoryCredentialStore::new();
/// store.set_client_id("client-123").unwrap();
/// assert_eq!(store.get_client_id().unwrap(), "client-123");
/// ```
#[derive(Debug)]
pub struct MemoryCredentialStore {
    service: String,
    entries: RwLock<HashMap<SecretKind, String>>,
}

impl MemoryCredentialStore {
    /// Create a new empty store under the default namespace
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Create a new empty store under a custom namespace
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store under `service`, pre-populated with raw values
    pub fn with_entries(service: impl Into<String>, initial: HashMap<SecretKind, String>) -> Self {
        Self {
            service: service.into(),
            entries: RwLock::new(initial),
        }
    }

    /// Write a raw value directly, bypassing any encoding
    ///
    /// Lets tests plant values the typed setters would never produce.
    pub fn insert_raw(&self, kind: SecretKind, raw: impl Into<String>) {
        self.entries.write().insert(kind, raw.into());
    }

    /// Read the raw value for `kind`, if any
    pub fn raw(&self, kind: SecretKind) -> Option<String> {
        self.entries.read().get(&kind).cloned()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryCredentialStore {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            entries: RwLock::new(self.entries.read().clone()),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn service(&self) -> &str {
        &self.service
    }

    fn get(&self, kind: SecretKind) -> CredentialResult<String> {
        self.entries
            .read()
            .get(&kind)
            .cloned()
            .ok_or(CredentialError::NotFound(kind))
    }

    fn set(&self, kind: SecretKind, value: &str) -> CredentialResult<()> {
        self.entries.write().insert(kind, value.to_string());
        Ok(())
    }

    fn delete(&self, kind: SecretKind) -> CredentialResult<()> {
        self.entries.write().remove(&kind);
        Ok(())
    }
}
