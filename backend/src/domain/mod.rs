//! Domain primitives, policies and the authentication workflow.
//!
//! Purpose: Define strongly typed domain entities and the orchestration that
//! sits between front ends and the capability ports. Keep types immutable
//! and document invariants and serialisation contracts (serde) in each
//! type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): account record and its public view.
//! - AuthService: login, password reset, token validation and the password
//!   policy, wired to the ports in [`ports`].

pub mod auth;
mod auth_service;
pub mod error;
pub mod ports;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN_LENGTH, PasswordPolicyError,
    check_password_strength, is_valid_email,
};
pub use self::auth_service::{
    AuthService, INVALID_TOKEN_MESSAGE, LoginResult, PASSWORD_RESET_MESSAGE, PasswordResetResult,
    TokenValidationResult,
};
pub use self::error::{
    DEACTIVATED_ACCOUNT_MESSAGE, Error, ErrorCode, ErrorValidationError,
    INVALID_CREDENTIALS_MESSAGE, TOKEN_EXPIRED_MESSAGE, USER_NOT_FOUND_MESSAGE,
};
pub use self::user::{NewUser, User, UserBuilder, UserId, UserUpdate, UserValidationError};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use auth_backend::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::user_not_found())
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
