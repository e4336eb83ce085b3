//! Low-stock notification delivery.
//!
//! The transport (SMTP, chat webhook, ...) lives behind [`MailTransport`].
//! [`AlertDispatcher`] turns an [`AlertEvent`](stockcast_inventory::AlertEvent)
//! into one message and isolates transport failures: they are logged and
//! reported as an outcome, never returned as errors and never retried.

pub mod dispatcher;
pub mod transport;

pub use dispatcher::{AlertDispatcher, DeliveryOutcome, MailIdentity};
pub use transport::{DeliveryError, InMemoryTransport, LogTransport, MailTransport, Notification};
