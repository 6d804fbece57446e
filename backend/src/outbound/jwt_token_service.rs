//! Token service adapter backed by Argon2 and HS256 JSON Web Tokens.
//!
//! Passwords are hashed with Argon2id in PHC string form. Tokens are signed
//! with the secret from [`AuthSettings`] and carry the claims
//! `{sub, kind, iss, iat, exp, jti, email?}`. Expiry is checked against the
//! injected clock rather than the system clock, so tests can move time.

use std::sync::Arc;
use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde_json::Value;
use tokio::task::spawn_blocking;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::AuthSettings;
use crate::domain::UserId;
use crate::domain::ports::{TokenClaims, TokenService, TokenServiceError};

/// Value of the `iss` claim on every issued token.
pub const TOKEN_ISSUER: &str = "auth-backend";
/// Message used when a token's `exp` has passed.
pub const EXPIRED_TOKEN_MESSAGE: &str = "Token has expired";
/// Message used when a token cannot be parsed at all.
pub const MALFORMED_TOKEN_MESSAGE: &str = "Token is malformed";
/// Message used when a token was signed with another key.
pub const BAD_SIGNATURE_MESSAGE: &str = "Token signature is invalid";

/// Purpose a token was issued for, recorded in its `kind` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived API access.
    Access,
    /// Exchanged for new access tokens.
    Refresh,
    /// Authorises a single password change.
    Reset,
}

impl TokenKind {
    /// Claim value for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
            Self::Reset => "reset",
        }
    }
}

/// Token service that signs JWTs and hashes passwords with Argon2.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    reset_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Create a service using the signing secret and token lifetimes from
    /// `settings`.
    pub fn new(settings: &AuthSettings, clock: Arc<dyn Clock>) -> Self {
        let secret = settings.jwt_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        validation.set_issuer(&[TOKEN_ISSUER]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl: settings.access_token_ttl(),
            refresh_ttl: settings.refresh_token_ttl(),
            reset_ttl: settings.reset_token_ttl(),
            clock,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
            TokenKind::Reset => self.reset_ttl,
        }
    }

    fn issue(
        &self,
        kind: TokenKind,
        user_id: &UserId,
        email: Option<&str>,
    ) -> Result<String, TokenServiceError> {
        let now = self.clock.utc();
        let expires_at = expiry_after(now, self.ttl(kind));
        let mut claims = TokenClaims::default()
            .with("sub", user_id.as_ref())
            .with("kind", kind.as_str())
            .with("iss", TOKEN_ISSUER)
            .with("iat", now.timestamp())
            .with("exp", expires_at.timestamp())
            .with("jti", uuid::Uuid::new_v4().to_string());
        if let Some(email) = email {
            claims = claims.with("email", email);
        }

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenServiceError::backend(format!("token signing failed: {err}")))?;
        debug!(user_id = %user_id, kind = kind.as_str(), %expires_at, "token issued");
        Ok(token)
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    i64::try_from(ttl.as_secs())
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn decode_failure(err: &jsonwebtoken::errors::Error) -> TokenServiceError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenServiceError::expired(EXPIRED_TOKEN_MESSAGE),
        ErrorKind::InvalidSignature => TokenServiceError::invalid(BAD_SIGNATURE_MESSAGE),
        ErrorKind::InvalidIssuer => TokenServiceError::invalid("Token issuer is not accepted"),
        ErrorKind::InvalidAlgorithm => {
            TokenServiceError::invalid("Token algorithm is not accepted")
        }
        ErrorKind::ImmatureSignature => TokenServiceError::invalid("Token is not yet valid"),
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenServiceError::invalid(format!("Token is missing the {claim} claim"))
        }
        _ => TokenServiceError::invalid(MALFORMED_TOKEN_MESSAGE),
    }
}

fn worker_failure(err: tokio::task::JoinError) -> TokenServiceError {
    TokenServiceError::backend(format!("password hashing task failed: {err}"))
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, TokenServiceError> {
        let plain = Zeroizing::new(plain.to_owned());
        let hash = hash.to_owned();
        spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&hash) else {
                debug!("stored hash is not a PHC string");
                return false;
            };
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .map_err(worker_failure)
    }

    async fn hash_password(&self, plain: &str) -> Result<String, TokenServiceError> {
        let plain = Zeroizing::new(plain.to_owned());
        spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(plain.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| TokenServiceError::backend(format!("password hashing failed: {err}")))
        })
        .await
        .map_err(worker_failure)?
    }

    async fn create_access_token(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<String, TokenServiceError> {
        self.issue(TokenKind::Access, user_id, Some(email))
    }

    async fn create_refresh_token(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<String, TokenServiceError> {
        self.issue(TokenKind::Refresh, user_id, Some(email))
    }

    async fn create_reset_token(&self, user_id: &UserId) -> Result<String, TokenServiceError> {
        self.issue(TokenKind::Reset, user_id, None)
    }

    async fn decode_token(&self, token: &str) -> Result<TokenClaims, TokenServiceError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |err| {
                debug!(error = %err, "token failed verification");
                decode_failure(&err)
            },
        )?;
        let claims = data.claims;
        let expires_at = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| TokenServiceError::invalid("Token is missing the exp claim"))?;
        if self.clock.utc().timestamp() >= expires_at {
            return Err(TokenServiceError::expired(EXPIRED_TOKEN_MESSAGE));
        }
        Ok(claims)
    }
}
