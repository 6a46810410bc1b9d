//! Credential storage abstractions and implementations
//!
//! This module provides a pluggable credential store with:
//! - `CredentialStore` trait: twelve typed operations over four secret kinds
//! - Built-in backends: `KeychainCredentialStore`, `MemoryCredentialStore`
//! - A registry for creating backends by name

mod traits;
mod memory_store;
mod keychain_store;
mod registry;

pub use traits::{
    AuthMethod, CredentialError, CredentialResult, CredentialStatus, CredentialStore, SecretKind,
};
pub use memory_store::MemoryCredentialStore;
pub use keychain_store::KeychainCredentialStore;
pub use registry::{
    create_credential_store, has_backend, list_backends, register_backend, unregister_backend,
    BackendDefinition, BackendFactory,
};
