use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockcast_core::{AlertId, DataError, DataResult};
use stockcast_inventory::AlertEvent;

use crate::transport::{MailTransport, Notification};

/// Fixed sender/recipient pair for low-stock notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailIdentity {
    sender: String,
    recipient: String,
}

impl MailIdentity {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>) -> DataResult<Self> {
        let sender = sender.into().trim().to_string();
        let recipient = recipient.into().trim().to_string();
        for (role, address) in [("sender", &sender), ("recipient", &recipient)] {
            if !looks_like_address(address) {
                return Err(DataError::validation(format!(
                    "{role} `{address}` is not a mail address"
                )));
            }
        }
        Ok(Self { sender, recipient })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

fn looks_like_address(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !address.contains(' ')
        }
        None => false,
    }
}

/// What happened to a dispatched alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { id: AlertId },
    /// The transport failed; the failure has been logged and will not be retried.
    Failed { id: AlertId, reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Sends alert events through a transport, one message per event.
#[derive(Debug)]
pub struct AlertDispatcher<T: MailTransport> {
    identity: MailIdentity,
    transport: Arc<T>,
}

impl<T: MailTransport> Clone for AlertDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: MailTransport> AlertDispatcher<T> {
    pub fn new(identity: MailIdentity, transport: Arc<T>) -> Self {
        Self {
            identity,
            transport,
        }
    }

    pub fn identity(&self) -> &MailIdentity {
        &self.identity
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn notification_for(&self, alert: &AlertEvent) -> Notification {
        Notification {
            id: AlertId::new(),
            sender: self.identity.sender.clone(),
            recipient: self.identity.recipient.clone(),
            subject: alert.subject.clone(),
            body: alert.message.clone(),
        }
    }

    /// Deliver `alert` once. Transport failures are logged and reported in the
    /// outcome; they never propagate.
    pub fn dispatch(&self, alert: &AlertEvent) -> DeliveryOutcome {
        let notification = self.notification_for(alert);
        let id = notification.id;

        match self.transport.send(&notification) {
            Ok(()) => {
                info!(
                    alert = %id,
                    item = %alert.item,
                    week = alert.week,
                    to = %notification.recipient,
                    "low-stock alert delivered"
                );
                DeliveryOutcome::Delivered { id }
            }
            Err(e) => {
                warn!(
                    alert = %id,
                    item = %alert.item,
                    error = %e,
                    "low-stock alert delivery failed"
                );
                DeliveryOutcome::Failed {
                    id,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{DeliveryError, InMemoryTransport};
    use stockcast_core::ItemName;

    fn identity() -> MailIdentity {
        MailIdentity::new("pharmacy@example.org", "buyer@example.org").unwrap()
    }

    fn alert() -> AlertEvent {
        AlertEvent::new(ItemName::new("Insulin").unwrap(), 3, 12.5, 50.0)
    }

    #[test]
    fn delivers_subject_and_message_from_the_alert() {
        let transport = Arc::new(InMemoryTransport::new());
        let dispatcher = AlertDispatcher::new(identity(), transport.clone());

        let outcome = dispatcher.dispatch(&alert());

        assert!(outcome.is_delivered());
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].sender, "pharmacy@example.org");
        assert_eq!(sent[0].recipient, "buyer@example.org");
        assert_eq!(sent[0].subject, "Low Stock Alert: Insulin");
        assert!(sent[0].body.contains("Week 3"));
        assert_eq!(outcome, DeliveryOutcome::Delivered { id: sent[0].id });
    }

    #[test]
    fn transport_failure_is_reported_not_raised() {
        let transport = Arc::new(InMemoryTransport::failing(DeliveryError::Unavailable(
            "connection refused".to_string(),
        )));
        let dispatcher = AlertDispatcher::new(identity(), transport.clone());

        let outcome = dispatcher.dispatch(&alert());

        match outcome {
            DeliveryOutcome::Failed { reason, .. } => assert!(reason.contains("connection refused")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn identity_requires_addresses() {
        assert!(MailIdentity::new("", "buyer@example.org").is_err());
        assert!(MailIdentity::new("pharmacy@example.org", "buyer").is_err());
        assert!(MailIdentity::new("pharmacy@example.org", "bu yer@example.org").is_err());
    }
}
