//! Authentication orchestration service.
//!
//! This service owns the login, password reset and token validation
//! workflows. It is stateless apart from its injected ports and runs each
//! operation as a single pass: validate, fetch, decide, apply side effects,
//! respond.

use std::sync::Arc;

use mockable::Clock;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, info, instrument, warn};

use crate::domain::auth::mask_email;
use crate::domain::ports::{EmailService, TokenService, TokenServiceError, UserStore};
use crate::domain::{
    Error, LoginCredentials, USER_NOT_FOUND_MESSAGE, User, UserId, UserUpdate,
    check_password_strength,
};

/// Message returned by every password reset request.
pub const PASSWORD_RESET_MESSAGE: &str = "Password reset email sent";
/// Message for a decoded token that names no subject.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Tokens and user returned by a successful login.
///
/// Failures never produce a `LoginResult`; they surface as [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    access_token: String,
    refresh_token: String,
    user: User,
}

impl LoginResult {
    /// Always `true`; kept for callers that echo the result envelope.
    pub fn success(&self) -> bool {
        true
    }

    /// Short-lived access token.
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Long-lived refresh token.
    pub fn refresh_token(&self) -> &str {
        self.refresh_token.as_str()
    }

    /// The user as fetched before the last-login update.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Successful logins carry no message.
    pub fn message(&self) -> Option<&str> {
        None
    }
}

impl Serialize for LoginResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LoginResult", 5)?;
        state.serialize_field("success", &self.success())?;
        state.serialize_field("access_token", &self.access_token)?;
        state.serialize_field("refresh_token", &self.refresh_token)?;
        state.serialize_field("user", &self.user)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

/// Outcome of a password reset request.
///
/// Identical whether or not the email is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordResetResult;

impl PasswordResetResult {
    /// Always `true`.
    pub fn success(&self) -> bool {
        true
    }

    /// Always [`PASSWORD_RESET_MESSAGE`].
    pub fn message(&self) -> &'static str {
        PASSWORD_RESET_MESSAGE
    }
}

impl Serialize for PasswordResetResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PasswordResetResult", 2)?;
        state.serialize_field("success", &self.success())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

/// Outcome of validating a token that has not expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidationResult {
    /// The token decoded and its subject exists.
    Valid(User),
    /// The token was rejected; `error` says why.
    Invalid {
        /// Human-readable rejection reason.
        error: String,
    },
}

impl TokenValidationResult {
    fn invalid(error: impl Into<String>) -> Self {
        Self::Invalid {
            error: error.into(),
        }
    }

    /// Whether the token identified an existing user.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The authenticated user for valid tokens.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Valid(user) => Some(user),
            Self::Invalid { .. } => None,
        }
    }

    /// The rejection reason for invalid tokens.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid { error } => Some(error.as_str()),
        }
    }
}

impl Serialize for TokenValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TokenValidationResult", 3)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("user", &self.user())?;
        state.serialize_field("error", &self.error())?;
        state.end()
    }
}

/// Domain service orchestrating authentication over the capability ports.
///
/// # Examples
/// ```
/// # use std::sync::Arc;
/// # use mockable::DefaultClock;
/// # use auth_backend::config::AuthSettings;
/// # use auth_backend::domain::AuthService;
/// # use auth_backend::outbound::{InMemoryUserStore, JwtTokenService, OutboxEmailService};
/// let clock = Arc::new(DefaultClock);
/// let service = AuthService::new(
///     Arc::new(InMemoryUserStore::default()),
///     Arc::new(JwtTokenService::new(&AuthSettings::default(), clock.clone())),
///     Arc::new(OutboxEmailService::default()),
///     clock,
/// );
/// assert!(service.validate_password_strength("ValidPassword123").is_ok());
/// ```
pub struct AuthService<S, T, E> {
    user_store: Arc<S>,
    token_service: Arc<T>,
    email_service: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<S, T, E> Clone for AuthService<S, T, E> {
    fn clone(&self) -> Self {
        Self {
            user_store: Arc::clone(&self.user_store),
            token_service: Arc::clone(&self.token_service),
            email_service: Arc::clone(&self.email_service),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, T, E> AuthService<S, T, E> {
    /// Create a new service over the given ports.
    pub fn new(
        user_store: Arc<S>,
        token_service: Arc<T>,
        email_service: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_store,
            token_service,
            email_service,
            clock,
        }
    }
}

impl<S, T, E> AuthService<S, T, E>
where
    S: UserStore,
    T: TokenService,
    E: EmailService,
{
    /// Authenticate `email` and `password` and issue a token pair.
    ///
    /// Input is validated before the store is touched. Unknown emails and
    /// wrong passwords fail with the same generic message; a deactivated
    /// account fails with its own message. A failed last-login update is
    /// returned as an error and no tokens are issued.
    #[instrument(skip_all, fields(email = %mask_email(email)))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, Error> {
        let credentials = LoginCredentials::try_from_parts(email, password).inspect_err(|err| {
            debug!(field = err.field(), reason = %err, "login input rejected");
        })?;

        let Some(user) = self
            .user_store
            .get_user_by_email(credentials.email())
            .await?
        else {
            info!("login rejected: no matching account");
            return Err(Error::invalid_credentials());
        };

        if !user.is_active() {
            warn!(user_id = %user.id(), "login rejected: account deactivated");
            return Err(Error::deactivated_account());
        }

        let verified = self
            .token_service
            .verify_password(credentials.password(), user.hashed_password())
            .await?;
        if !verified {
            info!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(Error::invalid_credentials());
        }

        self.user_store
            .update_user(user.id(), UserUpdate::last_login(self.clock.utc()))
            .await?;

        let access_token = self
            .token_service
            .create_access_token(user.id(), user.email())
            .await?;
        let refresh_token = self
            .token_service
            .create_refresh_token(user.id(), user.email())
            .await?;

        info!(user_id = %user.id(), "login succeeded");
        Ok(LoginResult {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Send a reset link when `email` belongs to an account.
    ///
    /// The result never reveals whether the account exists. Collaborator
    /// failures still propagate.
    #[instrument(skip_all, fields(email = %mask_email(email)))]
    pub async fn request_password_reset(&self, email: &str) -> Result<PasswordResetResult, Error> {
        match self.user_store.get_user_by_email(email).await? {
            Some(user) => {
                let reset_token = self.token_service.create_reset_token(user.id()).await?;
                self.email_service
                    .send_reset_email(user.email(), user.name(), &reset_token)
                    .await?;
                info!(user_id = %user.id(), "password reset email dispatched");
            }
            None => debug!("password reset requested for unregistered email"),
        }
        Ok(PasswordResetResult)
    }

    /// Resolve `token` to its user.
    ///
    /// Expiry is returned as an [`crate::domain::ErrorCode::TokenExpired`]
    /// error. Every other decode failure, a missing subject, or an unknown
    /// user yields [`TokenValidationResult::Invalid`]. User store failures
    /// propagate.
    #[instrument(skip_all)]
    pub async fn validate_token(&self, token: &str) -> Result<TokenValidationResult, Error> {
        let claims = match self.token_service.decode_token(token).await {
            Ok(claims) => claims,
            Err(TokenServiceError::Expired { message }) => {
                info!("token rejected: expired");
                return Err(Error::token_expired(message));
            }
            Err(err) => {
                debug!(error = %err, "token rejected by decoder");
                let reason = err.to_string();
                let reason = if reason.trim().is_empty() {
                    INVALID_TOKEN_MESSAGE.to_owned()
                } else {
                    reason
                };
                return Ok(TokenValidationResult::invalid(reason));
            }
        };

        let Some(user_id) = claims.subject().and_then(|sub| UserId::new(sub).ok()) else {
            debug!("token rejected: no usable subject");
            return Ok(TokenValidationResult::invalid(INVALID_TOKEN_MESSAGE));
        };

        match self.user_store.get_user_by_id(&user_id).await? {
            Some(user) => Ok(TokenValidationResult::Valid(user)),
            None => {
                debug!(user_id = %user_id, "token rejected: subject not found");
                Ok(TokenValidationResult::invalid(USER_NOT_FOUND_MESSAGE))
            }
        }
    }

    /// Check `password` against the strength policy.
    ///
    /// Pure; reports the first failing rule as a validation error on the
    /// `password` field.
    pub fn validate_password_strength(&self, password: &str) -> Result<(), Error> {
        check_password_strength(password).map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
