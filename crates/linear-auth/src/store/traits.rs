//! Core traits and types for credential storage

use std::fmt;

use thiserror::Error;

use crate::token::TokenInfo;

/// What is being stored
///
/// The identifiers double as key names inside the backend. Renaming one
/// orphans every credential already saved under the old name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKind {
    ApiKey,
    TokenInfo,
    ClientId,
    ClientSecret,
}

impl SecretKind {
    /// Every kind, in the order `clear_all` removes them
    pub const ALL: [SecretKind; 4] = [
        SecretKind::ApiKey,
        SecretKind::TokenInfo,
        SecretKind::ClientId,
        SecretKind::ClientSecret,
    ];

    /// Key name used inside the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretKind::ApiKey => "api_key",
            SecretKind::TokenInfo => "token_info",
            SecretKind::ClientId => "client_id",
            SecretKind::ClientSecret => "client_secret",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during credential store operations
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No {0} stored")]
    NotFound(SecretKind),

    #[error("Failed to serialize token info: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Stored token info is corrupt: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("Credential store unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Access to credential store denied: {0}")]
    PermissionDenied(String),

    #[error("Credential store error: {0}")]
    Backend(String),

    #[error("Invalid credential store configuration: {0}")]
    Config(String),
}

impl CredentialError {
    /// True when nothing is stored for the requested kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, CredentialError::NotFound(_))
    }

    /// True when stored token data could not be encoded or decoded
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            CredentialError::Serialization(_) | CredentialError::Deserialization(_)
        )
    }
}

pub type CredentialResult<T> = Result<T, CredentialError>;

/// How the user is currently authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    OAuth,
    ApiKey,
}

/// Which credentials are present in a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialStatus {
    pub api_key: bool,
    pub token_info: bool,
    pub client_id: bool,
    pub client_secret: bool,
}

impl CredentialStatus {
    /// Whether an entry exists for `kind`
    pub fn contains(&self, kind: SecretKind) -> bool {
        match kind {
            SecretKind::ApiKey => self.api_key,
            SecretKind::TokenInfo => self.token_info,
            SecretKind::ClientId => self.client_id,
            SecretKind::ClientSecret => self.client_secret,
        }
    }

    /// OAuth wins over an API key when both are stored
    pub fn auth_method(&self) -> Option<AuthMethod> {
        if self.token_info {
            Some(AuthMethod::OAuth)
        } else if self.api_key {
            Some(AuthMethod::ApiKey)
        } else {
            None
        }
    }

    /// True when nothing at all is stored
    pub fn is_empty(&self) -> bool {
        SecretKind::ALL.iter().all(|kind| !self.contains(*kind))
    }
}

/// Trait for credential storage backends
///
/// Backends implement the three raw primitives (`get`, `set`, `delete`) and
/// translate their native errors into [`CredentialError`]. The typed
/// per-kind operations are provided on top of them, so every backend gets the
/// same contract:
///
/// - a get on an absent entry fails with [`CredentialError::NotFound`]
/// - a set creates or overwrites
/// - a delete on an absent entry succeeds
///
/// Implementations:
/// - `KeychainCredentialStore`: OS keychain
/// - `MemoryCredentialStore`: process-local map for tests
///
/// # Example
///
/// ```
/// use linear_auth::store::{CredentialStore, MemoryCredentialStore};
///
/// let store = MemoryCredentialStore::new();
/// store.set_api_key("lin_api_abc123").unwrap();
/// assert_eq!(store.get_api_key().unwrap(), "lin_api_abc123");
///
/// store.delete_api_key().unwrap();
/// assert!(store.get_api_key().unwrap_err().is_not_found());
/// ```
pub trait CredentialStore: Send + Sync {
    /// Short name of the backend ("keychain", "memory", ...)
    fn name(&self) -> &str;

    /// Namespace scoping this store's entries
    fn service(&self) -> &str;

    /// Read the raw value stored for `kind`
    fn get(&self, kind: SecretKind) -> CredentialResult<String>;

    /// Write the raw value for `kind`, replacing any existing entry
    fn set(&self, kind: SecretKind, value: &str) -> CredentialResult<()>;

    /// Remove the entry for `kind`; succeeds if it is already gone
    fn delete(&self, kind: SecretKind) -> CredentialResult<()>;

    /// Check whether an entry exists for `kind`
    fn has(&self, kind: SecretKind) -> CredentialResult<bool> {
        match self.get(kind) {
            Ok(_) => Ok(true),
            Err(CredentialError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn get_api_key(&self) -> CredentialResult<String> {
        self.get(SecretKind::ApiKey)
    }

    fn set_api_key(&self, key: &str) -> CredentialResult<()> {
        self.set(SecretKind::ApiKey, key)
    }

    fn delete_api_key(&self) -> CredentialResult<()> {
        self.delete(SecretKind::ApiKey)
    }

    /// Read and decode the stored OAuth token envelope
    ///
    /// A stored value that does not decode is reported as
    /// [`CredentialError::Deserialization`]; it is left in place.
    fn get_token_info(&self) -> CredentialResult<TokenInfo> {
        let raw = self.get(SecretKind::TokenInfo)?;
        TokenInfo::from_json(&raw).map_err(CredentialError::Deserialization)
    }

    /// Encode and store the OAuth token envelope
    ///
    /// Encoding happens before the backend is touched.
    fn set_token_info(&self, info: &TokenInfo) -> CredentialResult<()> {
        let raw = info.to_json().map_err(CredentialError::Serialization)?;
        self.set(SecretKind::TokenInfo, &raw)
    }

    fn delete_token_info(&self) -> CredentialResult<()> {
        self.delete(SecretKind::TokenInfo)
    }

    fn get_client_id(&self) -> CredentialResult<String> {
        self.get(SecretKind::ClientId)
    }

    fn set_client_id(&self, id: &str) -> CredentialResult<()> {
        self.set(SecretKind::ClientId, id)
    }

    fn delete_client_id(&self) -> CredentialResult<()> {
        self.delete(SecretKind::ClientId)
    }

    fn get_client_secret(&self) -> CredentialResult<String> {
        self.get(SecretKind::ClientSecret)
    }

    fn set_client_secret(&self, secret: &str) -> CredentialResult<()> {
        self.set(SecretKind::ClientSecret, secret)
    }

    fn delete_client_secret(&self) -> CredentialResult<()> {
        self.delete(SecretKind::ClientSecret)
    }

    /// Remove every stored credential (logout)
    ///
    /// Stops at the first backend error; absent entries are not errors.
    fn clear_all(&self) -> CredentialResult<()> {
        for kind in SecretKind::ALL {
            self.delete(kind)?;
        }
        Ok(())
    }

    /// Report which credentials are present
    fn status(&self) -> CredentialResult<CredentialStatus> {
        Ok(CredentialStatus {
            api_key: self.has(SecretKind::ApiKey)?,
            token_info: self.has(SecretKind::TokenInfo)?,
            client_id: self.has(SecretKind::ClientId)?,
            client_secret: self.has(SecretKind::ClientSecret)?,
        })
    }
}
