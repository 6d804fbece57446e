//! Outbound adapters implementing domain ports.
//!
//! These adapters run the crate end to end without external infrastructure:
//!
//! - **user store**: `RwLock`-guarded map with fixture seeding
//! - **tokens**: Argon2 password hashes and HS256-signed JWTs
//! - **email**: an outbox that records messages instead of sending them
//!
//! Adapters are thin translators between domain types and their storage.
//! They contain no business logic.

mod jwt_token_service;
mod memory_user_store;
mod outbox_email;
mod user_fixtures;

pub use jwt_token_service::{
    BAD_SIGNATURE_MESSAGE, EXPIRED_TOKEN_MESSAGE, JwtTokenService, MALFORMED_TOKEN_MESSAGE,
    TOKEN_ISSUER, TokenKind,
};
pub use memory_user_store::InMemoryUserStore;
pub use outbox_email::{OutboundEmail, OutboxEmailService};
pub use user_fixtures::{UserFixture, UserFixtureError, load_user_fixtures, seed_users};
