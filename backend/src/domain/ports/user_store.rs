//! Port abstraction for user store adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "user store connection failed: {message}"; ServiceUnavailable,
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}"; InternalError,
        /// A user with the same email already exists.
        Conflict { email: String } => "user with email {email} already exists"; ValidationError,
    }
}

/// Port for reading and mutating user accounts.
///
/// Lookups that find nothing return `Ok(None)`; errors are reserved for
/// infrastructure failures. Implementations must be safe to call from many
/// concurrent operations and keep each `update_user` atomic per record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by identifier.
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Merge `update` into the stored record for `id`.
    async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<(), UserStoreError>;

    /// Create a user and return the stored record.
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserStoreError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use rstest::rstest;

    #[rstest]
    #[case(UserStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UserStoreError::query("syntax"), ErrorCode::InternalError)]
    #[case(UserStoreError::conflict("a@b.io"), ErrorCode::ValidationError)]
    fn store_errors_map_to_domain_codes(#[case] err: UserStoreError, #[case] code: ErrorCode) {
        let domain: Error = err.into();
        assert_eq!(domain.code(), code);
    }
}
