use crate::domains::user::types::User;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

/// The kinds of email this system sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailKind {
    AccountSetup,
    AccountActivated,
    PasswordChangedReminder,
    Invitation,
}

/// A rendered, ready-to-deliver email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub to: String,
    pub kind: EmailKind,
    pub subject: String,
    pub body: String,
}

impl OutboundEmail {
    pub fn account_setup(user: &User) -> Self {
        Self {
            to: user.email.clone(),
            kind: EmailKind::AccountSetup,
            subject: "Set up your CASA account".to_string(),
            body: format!(
                "Hi {},\n\nAn account has been created for you. \
                 Follow the link in this email to finish setting it up.",
                user.display_name
            ),
        }
    }

    pub fn account_activated(user: &User) -> Self {
        Self {
            to: user.email.clone(),
            kind: EmailKind::AccountActivated,
            subject: "Your CASA volunteer account has been activated".to_string(),
            body: format!(
                "Hi {},\n\nYour volunteer account is active again. \
                 You can sign in and pick up where you left off.",
                user.display_name
            ),
        }
    }

    pub fn password_changed_reminder(user: &User) -> Self {
        Self {
            to: user.email.clone(),
            kind: EmailKind::PasswordChangedReminder,
            subject: "Your CASA password was changed".to_string(),
            body: format!(
                "Hi {},\n\nThis is a reminder that the password on your account \
                 was just changed. If this wasn't you, contact your administrator.",
                user.display_name
            ),
        }
    }

    pub fn invitation(user: &User) -> Self {
        Self {
            to: user.email.clone(),
            kind: EmailKind::Invitation,
            subject: "You're invited to join CASA".to_string(),
            body: format!(
                "Hi {},\n\nYou've been invited to volunteer. \
                 Follow the link in this email to accept the invitation.",
                user.display_name
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Delivery seam. Transport (SMTP, provider API) lives behind this trait;
/// the domain only ever hands over a rendered email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, email: OutboundEmail) -> Result<(), NotificationError>;
}

/// Default mailer: records the delivery in the log. Useful in development
/// and anywhere a real transport is not wired up.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, email: OutboundEmail) -> Result<(), NotificationError> {
        log::info!(
            "Delivering {:?} email to {}: {}",
            email.kind,
            email.to,
            email.subject
        );
        Ok(())
    }
}

/// Test mailer that records every delivered email in memory.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while the lock is held poisons it; the recorded mail is
    // still valid, so recover the guard instead of panicking again.
    fn inbox(&self) -> std::sync::MutexGuard<'_, Vec<OutboundEmail>> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.inbox().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.inbox().len()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn deliver(&self, email: OutboundEmail) -> Result<(), NotificationError> {
        self.inbox().push(email);
        Ok(())
    }
}

/// Best-effort dispatch: notifications never affect the outcome of the
/// state transition that triggered them. Failures are logged and dropped.
pub async fn dispatch_best_effort(mailer: &dyn Mailer, email: OutboundEmail) {
    let kind = email.kind;
    let to = email.to.clone();
    if let Err(e) = mailer.deliver(email).await {
        log::warn!("Failed to deliver {:?} email to {}: {}", kind, to, e);
    }
}
