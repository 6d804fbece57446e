//! Domain-level error types.
//!
//! These errors are transport agnostic. Front ends (HTTP handlers, the CLI,
//! RPC servers) map them onto their own envelopes by matching on
//! [`ErrorCode`] rather than on message text.

use serde::{Deserialize, Serialize};

/// Generic rejection shared by unknown-email and wrong-password logins.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
/// Rejection for a known account whose active flag is cleared.
pub const DEACTIVATED_ACCOUNT_MESSAGE: &str = "Account has been deactivated";
/// Default message for [`ErrorCode::UserNotFound`].
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
/// Default message for [`ErrorCode::TokenExpired`].
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token has expired";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input is missing or malformed. Never worth retrying.
    ValidationError,
    /// Authentication was rejected.
    InvalidCredentials,
    /// A user looked up by an already-known identity does not exist.
    UserNotFound,
    /// The presented token is past its expiry; the caller must re-authenticate.
    TokenExpired,
    /// A collaborator (store, token issuer, mailer) is unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain or a collaborator.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `field` is only populated for [`ErrorCode::ValidationError`].
///
/// # Examples
/// ```
/// use auth_backend::domain::{Error, ErrorCode};
///
/// let err = Error::validation("email", "Email is required");
/// assert_eq!(err.code(), ErrorCode::ValidationError);
/// assert_eq!(err.field(), Some("email"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    field: Option<String>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The message was blank.
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// # Panics
    /// Panics when `message` is blank. Every constructor in this module passes
    /// a literal or a formatted, non-empty message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            field: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Input field that failed validation, if any.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Validation failure attributed to `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorCode::ValidationError, message);
        error.field = Some(field.into());
        error
    }

    /// The generic credential rejection.
    ///
    /// Deliberately identical for unknown emails and wrong passwords.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS_MESSAGE)
    }

    /// Credential rejection for an account that has been deactivated.
    pub fn deactivated_account() -> Self {
        Self::new(ErrorCode::InvalidCredentials, DEACTIVATED_ACCOUNT_MESSAGE)
    }

    /// Convenience constructor for [`ErrorCode::UserNotFound`].
    pub fn user_not_found() -> Self {
        Self::new(ErrorCode::UserNotFound, USER_NOT_FOUND_MESSAGE)
    }

    /// Convenience constructor for [`ErrorCode::TokenExpired`].
    ///
    /// Falls back to the default message when the decoder supplied none.
    pub fn token_expired(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::new(ErrorCode::TokenExpired, TOKEN_EXPIRED_MESSAGE)
        } else {
            Self::new(ErrorCode::TokenExpired, message)
        }
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            field: value.field,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            field,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.field = field;
        Ok(error)
    }
}

#[cfg(test)]
mod tests;
