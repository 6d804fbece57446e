//! User data model.
//!
//! Users are created and mutated by the user store; the domain only reads
//! them and describes the mutations it wants applied via [`UserUpdate`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier carried leading or trailing whitespace.
    PaddedId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::PaddedId => write!(f, "user id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier assigned by the user store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::UserId;
    ///
    /// let id = UserId::new("user123").expect("valid id");
    /// assert_eq!(id.as_ref(), "user123");
    /// assert!(UserId::new(" user123").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `hashed_password` is opaque; it is only ever handed back to the token
///   service for verification.
/// - The serialised form is the public view: it never contains the
///   password hash, and `Debug` output redacts it.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(into = "UserView")]
pub struct User {
    id: UserId,
    email: String,
    name: String,
    hashed_password: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Start building a user with its identity and creation time.
    ///
    /// # Examples
    /// ```
    /// use auth_backend::domain::{User, UserId};
    /// use chrono::Utc;
    ///
    /// let user = User::builder(UserId::new("user123").unwrap(), "john.doe@example.com", Utc::now())
    ///     .name("John Doe")
    ///     .hashed_password("$2b$12$hash")
    ///     .build();
    /// assert!(user.is_active());
    /// assert_eq!(user.name(), "John Doe");
    /// ```
    pub fn builder(
        id: UserId,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> UserBuilder {
        UserBuilder {
            id,
            email: email.into(),
            name: String::new(),
            hashed_password: String::new(),
            is_active: true,
            created_at,
            updated_at: None,
            last_login: None,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Email address, unique across the user store.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name used in correspondence.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Opaque password hash.
    pub fn hashed_password(&self) -> &str {
        self.hashed_password.as_str()
    }

    /// Whether the account may log in.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// When the account was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the account was last modified, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// When the account last logged in successfully, if ever.
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Merge a partial update; absent fields are left untouched.
    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &update.email {
            self.email.clone_from(email);
        }
        if let Some(hashed_password) = &update.hashed_password {
            self.hashed_password.clone_from(hashed_password);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(updated_at) = update.updated_at {
            self.updated_at = Some(updated_at);
        }
        if let Some(last_login) = update.last_login {
            self.last_login = Some(last_login);
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("hashed_password", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("last_login", &self.last_login)
            .finish()
    }
}

/// Builder for [`User`].
#[derive(Debug, Clone)]
pub struct UserBuilder {
    id: UserId,
    email: String,
    name: String,
    hashed_password: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
}

impl UserBuilder {
    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the opaque password hash.
    pub fn hashed_password(mut self, hashed_password: impl Into<String>) -> Self {
        self.hashed_password = hashed_password.into();
        self
    }

    /// Set the active flag. Defaults to `true`.
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Set the last-modified timestamp.
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Set the last-login timestamp.
    pub fn last_login(mut self, last_login: DateTime<Utc>) -> Self {
        self.last_login = Some(last_login);
        self
    }

    /// Finish building.
    pub fn build(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            hashed_password: self.hashed_password,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login: self.last_login,
        }
    }
}

/// Partial field set applied by [`crate::domain::ports::UserStore::update_user`].
///
/// Every field is optional; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New opaque password hash.
    pub hashed_password: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New last-modified timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// New last-login timestamp.
    pub last_login: Option<DateTime<Utc>>,
}

impl UserUpdate {
    /// Update that only records a successful login at `at`.
    pub fn last_login(at: DateTime<Utc>) -> Self {
        Self {
            last_login: Some(at),
            ..Self::default()
        }
    }

    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fields supplied when asking the user store to create an account.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Email address; the store enforces uniqueness.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Opaque password hash produced by the token service.
    pub hashed_password: String,
    /// Whether the account may log in immediately.
    pub is_active: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("hashed_password", &"<redacted>")
            .field("is_active", &self.is_active)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
struct UserView {
    id: String,
    email: String,
    name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserView {
    fn from(value: User) -> Self {
        let User {
            id,
            email,
            name,
            is_active,
            created_at,
            updated_at,
            last_login,
            ..
        } = value;
        Self {
            id: id.into(),
            email,
            name,
            is_active,
            created_at,
            updated_at,
            last_login,
        }
    }
}
