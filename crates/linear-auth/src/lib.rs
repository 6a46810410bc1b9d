//! Linear CLI credential storage
//!
//! Persists the secrets the CLI needs between invocations (API key, OAuth
//! token envelope, OAuth client id and secret) in the operating system's
//! keychain, with an in-memory backend for tests.
//!
//! ## Usage
//!
//! ```rust
//! use linear_auth::{open_credential_store, StoreConfig, TokenInfo};
//!
//! let store = open_credential_store(&StoreConfig::memory("linear-cli-doc"))?;
//!
//! store.set_token_info(
//!     &TokenInfo::new("tok1")
//!         .with_refresh_token("ref1")
//!         .with_expiry("2025-01-01T00:00:00Z"),
//! )?;
//! assert_eq!(store.get_token_info()?.access_token, "tok1");
//!
//! // Logout: every delete succeeds even if nothing was stored
//! store.clear_all()?;
//! # Ok::<(), linear_auth::CredentialError>(())
//! ```
//!
//! The service name and the four key names (`api_key`, `token_info`,
//! `client_id`, `client_secret`) identify entries already saved on users'
//! machines and must not change between releases.

pub mod token;
pub mod store;
pub mod logging;
pub mod config;
pub mod resolver;

/// Keychain service name scoping every entry this tool writes
pub const SERVICE_NAME: &str = "linear-cli";

pub use token::TokenInfo;

pub use store::{
    AuthMethod, CredentialError, CredentialResult, CredentialStatus, CredentialStore, SecretKind,
    KeychainCredentialStore, MemoryCredentialStore,
    register_backend, create_credential_store, list_backends,
};

pub use config::{open_credential_store, StoreConfig};

pub use resolver::{ApiKeyResolver, ResolvedSecret, SecretSource};
