//! Authentication backend library.
//!
//! The [`domain`] module holds the authentication workflow and the ports it
//! depends on; [`outbound`] provides in-memory adapters for those ports.
//! [`config`] and [`telemetry`] carry the runtime settings and logging setup
//! shared by the `auth-backend` binary.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
