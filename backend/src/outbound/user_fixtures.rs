//! Seeding the in-memory user store from a JSON fixture file.
//!
//! The file holds an array of users. Each entry supplies either a plaintext
//! `password`, hashed on load through the token service, or a ready-made
//! `hashed_password`:
//!
//! ```json
//! [
//!   { "id": "user123", "email": "john.doe@example.com", "name": "John Doe",
//!     "password": "ValidPassword123!" },
//!   { "email": "former@example.com", "name": "Former", "password": "Secret123",
//!     "is_active": false }
//! ]
//! ```

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{TokenService, TokenServiceError, UserStoreError};
use crate::domain::{User, UserId, UserValidationError};
use crate::outbound::InMemoryUserStore;

/// Errors returned while loading or applying user fixtures.
#[derive(Debug, Error)]
pub enum UserFixtureError {
    /// Fixture file could not be read.
    #[error("failed to read user fixtures at {path}: {source}")]
    Read {
        /// Path to the fixture file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Fixture file was not valid JSON of the expected shape.
    #[error("failed to parse user fixtures at {path}: {source}")]
    Parse {
        /// Path to the fixture file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// An entry named an unusable identifier.
    #[error("fixture for {email} has an invalid id: {source}")]
    InvalidId {
        /// Email of the offending entry.
        email: String,
        /// Identifier validation failure.
        #[source]
        source: UserValidationError,
    },
    /// An entry had neither `password` nor `hashed_password`.
    #[error("fixture for {email} needs a password or hashed_password")]
    MissingPassword {
        /// Email of the offending entry.
        email: String,
    },
    /// Hashing a fixture password failed.
    #[error("failed to hash fixture password: {0}")]
    Hash(#[from] TokenServiceError),
    /// The store rejected a fixture user.
    #[error("failed to store fixture user: {0}")]
    Store(#[from] UserStoreError),
}

fn default_active() -> bool {
    true
}

/// One user entry in a fixture file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserFixture {
    /// Fixed identifier; a random one is assigned when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Account email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Plaintext password, hashed on load.
    #[serde(default)]
    pub password: Option<String>,
    /// Pre-hashed password stored as is.
    #[serde(default)]
    pub hashed_password: Option<String>,
    /// Whether the account may log in.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl std::fmt::Debug for UserFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserFixture")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

/// Read and parse a fixture file through `cap_std`.
pub fn load_user_fixtures(path: &Path) -> Result<Vec<UserFixture>, UserFixtureError> {
    let read_error = |source| UserFixtureError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "fixtures path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    serde_json::from_slice(&payload).map_err(|source| UserFixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Insert `fixtures` into `store`, hashing plaintext passwords with `tokens`.
///
/// Returns the number of users inserted.
pub async fn seed_users<T>(
    store: &InMemoryUserStore,
    tokens: &T,
    fixtures: Vec<UserFixture>,
    created_at: DateTime<Utc>,
) -> Result<usize, UserFixtureError>
where
    T: TokenService + ?Sized,
{
    let mut inserted = 0;
    for fixture in fixtures {
        let id = match fixture.id {
            Some(raw) => UserId::new(raw).map_err(|source| UserFixtureError::InvalidId {
                email: fixture.email.clone(),
                source,
            })?,
            None => UserId::random(),
        };
        let hashed_password = match (fixture.hashed_password, fixture.password) {
            (Some(hash), _) => hash,
            (None, Some(plain)) => tokens.hash_password(&plain).await?,
            (None, None) => {
                return Err(UserFixtureError::MissingPassword {
                    email: fixture.email,
                });
            }
        };
        let user = User::builder(id, fixture.email, created_at)
            .name(fixture.name)
            .hashed_password(hashed_password)
            .active(fixture.is_active)
            .build();
        store.insert(user).await?;
        inserted += 1;
    }
    info!(count = inserted, "user fixtures seeded");
    Ok(inserted)
}
