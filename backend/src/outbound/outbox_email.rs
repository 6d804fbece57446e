//! Email adapter that records messages instead of delivering them.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::auth::mask_email;
use crate::domain::ports::{EmailService, EmailServiceError};

/// A message captured by [`OutboxEmailService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEmail {
    /// Password reset link.
    Reset {
        /// Recipient address.
        to: String,
        /// Recipient display name.
        name: String,
        /// Reset token embedded in the link.
        token: String,
    },
    /// Welcome message for a new account.
    Welcome {
        /// Recipient address.
        to: String,
        /// Recipient display name.
        name: String,
    },
    /// Address verification link.
    Verification {
        /// Recipient address.
        to: String,
        /// Recipient display name.
        name: String,
        /// Verification token embedded in the link.
        token: String,
    },
}

impl OutboundEmail {
    /// Recipient address.
    pub fn to(&self) -> &str {
        match self {
            Self::Reset { to, .. } | Self::Welcome { to, .. } | Self::Verification { to, .. } => {
                to.as_str()
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Reset { .. } => "reset",
            Self::Welcome { .. } => "welcome",
            Self::Verification { .. } => "verification",
        }
    }
}

/// Email service that appends every message to an in-memory outbox.
#[derive(Debug, Default)]
pub struct OutboxEmailService {
    outbox: Mutex<Vec<OutboundEmail>>,
}

impl OutboxEmailService {
    /// Messages recorded so far, oldest first.
    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.outbox.lock().await.clone()
    }

    async fn record(&self, email: OutboundEmail) {
        info!(
            kind = email.kind(),
            to = %mask_email(email.to()),
            "email queued in outbox"
        );
        self.outbox.lock().await.push(email);
    }
}

#[async_trait]
impl EmailService for OutboxEmailService {
    async fn send_reset_email(
        &self,
        email: &str,
        name: &str,
        reset_token: &str,
    ) -> Result<(), EmailServiceError> {
        self.record(OutboundEmail::Reset {
            to: email.to_owned(),
            name: name.to_owned(),
            token: reset_token.to_owned(),
        })
        .await;
        Ok(())
    }

    async fn send_welcome_email(&self, email: &str, name: &str) -> Result<(), EmailServiceError> {
        self.record(OutboundEmail::Welcome {
            to: email.to_owned(),
            name: name.to_owned(),
        })
        .await;
        Ok(())
    }

    async fn send_verification_email(
        &self,
        email: &str,
        name: &str,
        verification_token: &str,
    ) -> Result<(), EmailServiceError> {
        self.record(OutboundEmail::Verification {
            to: email.to_owned(),
            name: name.to_owned(),
            token: verification_token.to_owned(),
        })
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn messages_are_recorded_in_order() {
        let outbox = OutboxEmailService::default();
        outbox
            .send_welcome_email("jane@example.com", "Jane")
            .await
            .expect("welcome recorded");
        outbox
            .send_reset_email("jane@example.com", "Jane", "reset-1")
            .await
            .expect("reset recorded");
        outbox
            .send_verification_email("jane@example.com", "Jane", "verify-1")
            .await
            .expect("verification recorded");

        let sent = outbox.sent().await;
        assert_eq!(sent.len(), 3);
        assert_eq!(
            sent[1],
            OutboundEmail::Reset {
                to: "jane@example.com".to_owned(),
                name: "Jane".to_owned(),
                token: "reset-1".to_owned(),
            }
        );
        assert!(sent.iter().all(|email| email.to() == "jane@example.com"));
    }
}
