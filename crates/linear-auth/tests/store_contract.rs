//! Behaviour every backend must share, exercised through `Arc<dyn CredentialStore>`.

use std::sync::Arc;

use linear_auth::store::{
    CredentialError, CredentialStore, KeychainCredentialStore, MemoryCredentialStore, SecretKind,
};
use linear_auth::{open_credential_store, AuthMethod, StoreConfig, TokenInfo};

fn check_contract(store: &dyn CredentialStore) {
    // Start from nothing; deleting absent entries must succeed
    store.clear_all().unwrap();

    for kind in SecretKind::ALL {
        assert!(
            matches!(store.get(kind), Err(CredentialError::NotFound(k)) if k == kind),
            "{} should start absent",
            kind
        );
        store.delete(kind).unwrap();
    }

    // Scenario: api key set, read, delete twice
    store.set_api_key("lin_api_abc123").unwrap();
    assert_eq!(store.get_api_key().unwrap(), "lin_api_abc123");
    store.delete_api_key().unwrap();
    assert!(store.get_api_key().unwrap_err().is_not_found());
    store.delete_api_key().unwrap();

    // Overwrite, not append
    store.set_client_id("id-1").unwrap();
    store.set_client_id("id-2").unwrap();
    assert_eq!(store.get_client_id().unwrap(), "id-2");

    // Idempotent set
    store.set_client_secret("s3cret").unwrap();
    store.set_client_secret("s3cret").unwrap();
    assert_eq!(store.get_client_secret().unwrap(), "s3cret");

    // Scenario: token envelope with three fields
    let token = TokenInfo::new("tok1")
        .with_refresh_token("ref1")
        .with_expiry("2025-01-01T00:00:00Z");
    store.set_token_info(&token).unwrap();
    let loaded = store.get_token_info().unwrap();
    assert_eq!(loaded, token);
    assert_eq!(loaded.access_token, "tok1");
    assert_eq!(loaded.refresh_token.as_deref(), Some("ref1"));
    assert_eq!(loaded.expiry.as_deref(), Some("2025-01-01T00:00:00Z"));

    // Minimal and full envelopes
    let minimal = TokenInfo::new("tok-min");
    store.set_token_info(&minimal).unwrap();
    assert_eq!(store.get_token_info().unwrap(), minimal);

    let full = TokenInfo::new("tok-full")
        .with_token_type("Bearer")
        .with_refresh_token("ref-full")
        .with_expiry("2030-06-30T12:00:00+02:00")
        .with_scope("read write issues:create");
    store.set_token_info(&full).unwrap();
    assert_eq!(store.get_token_info().unwrap(), full);

    // Corruption planted through the raw primitive
    store.set(SecretKind::TokenInfo, "garbage{").unwrap();
    assert!(matches!(store.get_token_info(), Err(CredentialError::Deserialization(_))));

    let status = store.status().unwrap();
    assert!(status.token_info);
    assert!(status.client_id);
    assert!(status.client_secret);
    assert!(!status.api_key);
    assert_eq!(status.auth_method(), Some(AuthMethod::OAuth));

    store.clear_all().unwrap();
    assert!(store.status().unwrap().is_empty());
}

#[test]
fn memory_backend_honours_contract() {
    let store = MemoryCredentialStore::with_service("linear-cli-contract");
    check_contract(&store);
}

#[test]
fn memory_backend_via_config() {
    let store: Arc<dyn CredentialStore> =
        open_credential_store(&StoreConfig::memory("linear-cli-contract")).unwrap();
    check_contract(store.as_ref());
}

#[test]
fn memory_backends_are_isolated() {
    let a = open_credential_store(&StoreConfig::memory("linear-cli-a")).unwrap();
    let b = open_credential_store(&StoreConfig::memory("linear-cli-a")).unwrap();

    a.set_api_key("only-in-a").unwrap();
    assert!(b.get_api_key().unwrap_err().is_not_found());
}

#[test]
fn corrupt_token_is_reported_not_repaired() {
    let store = MemoryCredentialStore::new();
    store.insert_raw(SecretKind::TokenInfo, r#"{"refresh_token":"ref1"}"#);

    let err = store.get_token_info().unwrap_err();
    assert!(err.is_corrupt());
    assert!(!err.is_not_found());
    assert!(store.has(SecretKind::TokenInfo).unwrap());

    // Caller-driven recovery
    store.delete_token_info().unwrap();
    assert!(store.get_token_info().unwrap_err().is_not_found());
}

#[test]
#[ignore] // Requires system keychain
fn keychain_backend_honours_contract() {
    let store = KeychainCredentialStore::with_service("linear-cli-contract-test");
    check_contract(&store);
}
