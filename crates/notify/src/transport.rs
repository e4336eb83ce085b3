use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use stockcast_core::AlertId;

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: AlertId,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("message rejected: {0}")]
    Rejected(String),
}

/// Outbound message channel.
pub trait MailTransport: Send + Sync + 'static {
    fn send(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// In-memory transport for tests/dev.
///
/// Records every delivered message; can be switched into a failing mode to
/// exercise delivery-error handling.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    sent: Mutex<Vec<Notification>>,
    failure: Option<DeliveryError>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that rejects every message with `error`.
    pub fn failing(error: DeliveryError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl MailTransport for InMemoryTransport {
    fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification.clone());
        Ok(())
    }
}

/// Transport that writes the message to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        info!(
            alert = %notification.id,
            from = %notification.sender,
            to = %notification.recipient,
            subject = %notification.subject,
            body = %notification.body,
            "notification"
        );
        Ok(())
    }
}
