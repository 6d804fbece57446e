//! Port for password verification and token issuance.
//!
//! The domain never sees key material or hashing parameters. It asks the
//! adapter to verify, hash, issue and decode, and reacts to the typed
//! failures below.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token service adapters.
    pub enum TokenServiceError {
        /// The token's expiry has passed.
        Expired { message: String } => "{message}"; TokenExpired,
        /// The token is malformed, forged, or otherwise unusable.
        Invalid { message: String } => "{message}"; ValidationError,
        /// Signing keys or hashing backend unavailable.
        Backend { message: String } => "token service failure: {message}"; InternalError,
    }
}

/// Decoded token payload.
///
/// Claims are kept as a JSON object because adapters differ in which
/// registered and private claims they emit.
///
/// # Examples
/// ```
/// use auth_backend::domain::ports::TokenClaims;
/// use serde_json::json;
///
/// let claims = TokenClaims::try_from(json!({ "sub": "user123" })).unwrap();
/// assert_eq!(claims.subject(), Some("user123"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    /// Wrap an existing claims map.
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// The `sub` claim when it is a non-empty string.
    pub fn subject(&self) -> Option<&str> {
        self.0
            .get("sub")
            .and_then(Value::as_str)
            .filter(|sub| !sub.is_empty())
    }

    /// Look up an arbitrary claim.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Insert or replace a claim, returning `self` for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl TryFrom<Value> for TokenClaims {
    type Error = TokenServiceError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(TokenServiceError::invalid(format!(
                "token claims must be an object, found {other}"
            ))),
        }
    }
}

/// Port for credential hashing and token lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Whether `plain` matches the stored `hash`.
    async fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, TokenServiceError>;

    /// Hash a password for storage.
    async fn hash_password(&self, plain: &str) -> Result<String, TokenServiceError>;

    /// Issue a short-lived access token.
    async fn create_access_token(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<String, TokenServiceError>;

    /// Issue a long-lived refresh token.
    async fn create_refresh_token(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<String, TokenServiceError>;

    /// Issue a single-purpose password reset token.
    async fn create_reset_token(&self, user_id: &UserId) -> Result<String, TokenServiceError>;

    /// Decode and verify a token.
    ///
    /// Fails with [`TokenServiceError::Expired`] when the expiry has passed
    /// and [`TokenServiceError::Invalid`] for any other decode failure.
    async fn decode_token(&self, token: &str) -> Result<TokenClaims, TokenServiceError>;
}
