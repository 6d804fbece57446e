//! Port for outbound transactional email.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by email service adapters.
    pub enum EmailServiceError {
        /// The message could not be handed to the mail transport.
        Delivery { message: String } => "email delivery failed: {message}"; InternalError,
    }
}

/// Port for sending account emails.
///
/// Adapters own templating and transport; the domain only supplies the
/// recipient and the values that vary per message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send a password reset link carrying `reset_token`.
    async fn send_reset_email(
        &self,
        email: &str,
        name: &str,
        reset_token: &str,
    ) -> Result<(), EmailServiceError>;

    /// Greet a newly registered user.
    async fn send_welcome_email(&self, email: &str, name: &str) -> Result<(), EmailServiceError>;

    /// Send an address verification link carrying `verification_token`.
    async fn send_verification_email(
        &self,
        email: &str,
        name: &str,
        verification_token: &str,
    ) -> Result<(), EmailServiceError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Error, ErrorCode};
    use rstest::rstest;

    #[rstest]
    fn delivery_failures_surface_as_internal_errors() {
        let err: Error = EmailServiceError::delivery("smtp timeout").into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "email delivery failed: smtp timeout");
    }
}
