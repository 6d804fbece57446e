//! Authentication primitives: login credentials and the password policy.
//!
//! These are pure predicates over strings. Their error messages are part of
//! the public contract because callers surface them verbatim, so each
//! variant's `Display` text is fixed.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use crate::domain::Error;

/// Minimum number of characters accepted by the password policy.
pub const PASSWORD_MIN_LENGTH: usize = 8;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static DIGIT_RE: OnceLock<Regex> = OnceLock::new();

// A single trailing newline is tolerated after the top-level label.
fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"\A[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\n?\z";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

// Unicode decimal digits (`Nd`), not just ASCII `0-9`.
fn digit_regex() -> &'static Regex {
    DIGIT_RE.get_or_init(|| {
        Regex::new(r"\d").unwrap_or_else(|error| panic!("digit regex failed to compile: {error}"))
    })
}

/// Whether `email` has the shape `local@domain.tld`.
///
/// # Examples
/// ```
/// use auth_backend::domain::is_valid_email;
///
/// assert!(is_valid_email("john.doe@example.com"));
/// assert!(!is_valid_email("user name@example.com"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Render `email` for logs with the local part hidden.
///
/// # Examples
/// ```
/// use auth_backend::domain::auth::mask_email;
///
/// assert_eq!(mask_email("john.doe@example.com"), "j***@example.com");
/// assert_eq!(mask_email("not-an-email"), "***");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        _ => "***".to_owned(),
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was empty.
    EmptyEmail,
    /// Email did not match `local@domain.tld`.
    InvalidEmailFormat,
    /// Password was empty.
    EmptyPassword,
}

impl LoginValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmailFormat => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "Email is required"),
            Self::InvalidEmailFormat => write!(f, "Invalid email format"),
            Self::EmptyPassword => write!(f, "Password is required"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<LoginValidationError> for Error {
    fn from(value: LoginValidationError) -> Self {
        Self::validation(value.field(), value.to_string())
    }
}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is non-empty and matches `local@domain.tld`. It is kept exactly
///   as supplied; the store decides how lookups treat case.
/// - `password` is non-empty and is wiped from memory on drop.
///
/// # Examples
/// ```
/// use auth_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("john.doe@example.com", "secret").unwrap();
/// assert_eq!(creds.email(), "john.doe@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs, first failing rule wins:
    /// email present, email well formed, password present.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if email.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if !is_valid_email(email) {
            return Err(LoginValidationError::InvalidEmailFormat);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reasons a password fails the strength policy, in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password was empty.
    Empty,
    /// Password had fewer than `min` characters.
    TooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Password had no ASCII letter.
    MissingLetter,
    /// Password had no decimal digit.
    MissingDigit,
    /// Password lacked either a lowercase or an uppercase ASCII letter.
    MissingMixedCase,
}

impl fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Password is required"),
            Self::TooShort { min } => write!(f, "Password must be at least {min} characters"),
            Self::MissingLetter => write!(f, "Password must contain letters"),
            Self::MissingDigit => write!(f, "Password must contain numbers"),
            Self::MissingMixedCase => {
                write!(f, "Password must contain uppercase and lowercase letters")
            }
        }
    }
}

impl std::error::Error for PasswordPolicyError {}

impl From<PasswordPolicyError> for Error {
    fn from(value: PasswordPolicyError) -> Self {
        Self::validation("password", value.to_string())
    }
}

/// Check `password` against the strength policy.
///
/// Checks run in a fixed order and the first failure is reported.
///
/// # Examples
/// ```
/// use auth_backend::domain::{PasswordPolicyError, check_password_strength};
///
/// assert!(check_password_strength("ValidPassword123").is_ok());
/// assert_eq!(
///     check_password_strength("PASSWORD123"),
///     Err(PasswordPolicyError::MissingMixedCase),
/// );
/// ```
pub fn check_password_strength(password: &str) -> Result<(), PasswordPolicyError> {
    if password.is_empty() {
        return Err(PasswordPolicyError::Empty);
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: PASSWORD_MIN_LENGTH,
        });
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(PasswordPolicyError::MissingLetter);
    }
    if !digit_regex().is_match(password) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return Err(PasswordPolicyError::MissingMixedCase);
    }
    Ok(())
}
