//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Each capability the authentication workflow depends on is a trait here,
//! with a typed error enum that maps onto [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod email_service;
mod token_service;
mod user_store;

#[cfg(test)]
pub use email_service::MockEmailService;
pub use email_service::{EmailService, EmailServiceError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenClaims, TokenService, TokenServiceError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
