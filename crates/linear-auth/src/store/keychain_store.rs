//! System keychain credential store
//!
//! Uses the OS keychain for secure credential storage:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use std::fmt;
use std::sync::Arc;

use keyring::credential::{CredentialBuilder, CredentialBuilderApi};
use keyring::Entry;

use super::traits::{CredentialError, CredentialResult, CredentialStore, SecretKind};
use crate::logging::file_logger as log;
use crate::SERVICE_NAME;

const MODULE: &str = "KeychainCredentialStore";

/// Credential store backed by the system keychain
///
/// Each credential is addressed by `(service, kind)`: the service is fixed
/// for the store and the account name is the [`SecretKind`] key name.
///
/// Reads and writes pass straight through to the platform. The only
/// translation is on delete, where the platform's "no such entry" is treated
/// as success.
///
/// # Example
///
/// ```no_run
/// use linear_auth::store::{CredentialStore, KeychainCredentialStore};
///
/// let store = KeychainCredentialStore::new();
/// store.set_api_key("lin_api_abc123").unwrap();
/// assert_eq!(store.get_api_key().unwrap(), "lin_api_abc123");
/// ```
#[derive(Clone)]
pub struct KeychainCredentialStore {
    service: String,
    /// Overrides keyring's process-wide default builder when set
    builder: Option<Arc<CredentialBuilder>>,
}

impl KeychainCredentialStore {
    /// Create a keychain store under the default service name
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Create a keychain store under a custom service name
    ///
    /// Tests use this to keep their entries away from real credentials.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            builder: None,
        }
    }

    /// Create a store whose entries come from `builder` instead of the
    /// platform default (e.g. `keyring::mock::default_credential_builder()`)
    pub fn with_credential_builder(
        service: impl Into<String>,
        builder: Box<CredentialBuilder>,
    ) -> Self {
        Self {
            service: service.into(),
            builder: Some(Arc::from(builder)),
        }
    }

    fn entry(&self, kind: SecretKind) -> CredentialResult<Entry> {
        let entry = match &self.builder {
            Some(builder) => builder
                .build(None, &self.service, kind.as_str())
                .map(Entry::new_with_credential),
            None => Entry::new(&self.service, kind.as_str()),
        };
        entry.map_err(|e| translate_error(kind, e))
    }
}

impl Default for KeychainCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeychainCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeychainCredentialStore")
            .field("service", &self.service)
            .field("custom_builder", &self.builder.is_some())
            .finish()
    }
}

/// Map a keyring error onto the crate's error type
///
/// `NoEntry` becomes `NotFound`; callers that want delete semantics must
/// intercept it before calling this.
fn translate_error(kind: SecretKind, err: keyring::Error) -> CredentialError {
    match err {
        keyring::Error::NoEntry => CredentialError::NotFound(kind),
        keyring::Error::NoStorageAccess(e) => CredentialError::PermissionDenied(e.to_string()),
        keyring::Error::PlatformFailure(e) => CredentialError::BackendUnavailable(e.to_string()),
        other => CredentialError::Backend(format!("{}: {}", kind, other)),
    }
}

fn read_entry(kind: SecretKind, entry: &Entry) -> CredentialResult<String> {
    match entry.get_password() {
        Ok(value) => Ok(value),
        Err(keyring::Error::NoEntry) => {
            log::debug(MODULE, &format!("get({}) no entry", kind));
            Err(CredentialError::NotFound(kind))
        }
        Err(e) => {
            log::warn(MODULE, &format!("get({}) failed: {}", kind, e));
            Err(translate_error(kind, e))
        }
    }
}

fn write_entry(kind: SecretKind, entry: &Entry, value: &str) -> CredentialResult<()> {
    entry.set_password(value).map_err(|e| {
        log::error(MODULE, &format!("set({}) failed: {}", kind, e));
        translate_error(kind, e)
    })
}

/// Delete, treating "no such entry" as already done
fn delete_entry(kind: SecretKind, entry: &Entry) -> CredentialResult<()> {
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
        Err(e) => {
            log::error(MODULE, &format!("delete({}) failed: {}", kind, e));
            Err(translate_error(kind, e))
        }
    }
}

impl CredentialStore for KeychainCredentialStore {
    fn name(&self) -> &str {
        "keychain"
    }

    fn service(&self) -> &str {
        &self.service
    }

    fn get(&self, kind: SecretKind) -> CredentialResult<String> {
        log::debug(MODULE, &format!("get({}) service='{}'", kind, self.service));
        read_entry(kind, &self.entry(kind)?)
    }

    fn set(&self, kind: SecretKind, value: &str) -> CredentialResult<()> {
        log::debug(MODULE, &format!("set({}) service='{}'", kind, self.service));
        write_entry(kind, &self.entry(kind)?, value)
    }

    fn delete(&self, kind: SecretKind) -> CredentialResult<()> {
        log::debug(MODULE, &format!("delete({}) service='{}'", kind, self.service));
        delete_entry(kind, &self.entry(kind)?)
    }
}
