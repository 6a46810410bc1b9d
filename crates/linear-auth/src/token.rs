//! OAuth token envelope
//!
//! The envelope is stored as a single JSON document under the `token_info`
//! key. Fields are keyed by name, so new optional fields can be added without
//! breaking values written by older releases.

use serde::{Deserialize, Serialize};

/// OAuth credential set persisted as one unit
///
/// Unknown fields are rejected. An envelope written by a newer release that
/// added a field will therefore fail to load after a downgrade, and surfaces
/// as a corrupt entry until the user logs in again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenInfo {
    /// Bearer token sent with API requests
    pub access_token: String,
    /// Token type as returned by the authorization server (usually "Bearer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Refresh token, if the grant issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry timestamp (RFC 3339), stored exactly as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    /// Space-separated scopes granted to the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenInfo {
    /// Create an envelope holding only an access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: None,
            refresh_token: None,
            expiry: None,
            scope: None,
        }
    }

    /// Set the token type
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Set the refresh token
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Set the expiry timestamp
    pub fn with_expiry(mut self, expiry: impl Into<String>) -> Self {
        self.expiry = Some(expiry.into());
        self
    }

    /// Set the granted scopes
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Whether a refresh token is available
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Encode into the stored JSON form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the stored JSON form
    ///
    /// Fails on malformed JSON, a missing `access_token`, mistyped fields and
    /// unknown fields. A partially-populated envelope is never returned.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
