//! Use cases. Each service holds the ports it needs behind `Arc<dyn _>`.
pub mod admin;
pub mod catalog;
pub mod checkout;
pub mod payments;

use std::sync::Arc;
use crate::domain::events::DomainEvent;
use crate::domain::ports::EventPublisher;

pub use admin::{AdminService, OrderStats};
pub use catalog::{CatalogService, ProductDetail, ProductSummary, ReviewRequest};
pub use checkout::{
    CheckoutItem, CheckoutReceipt, CheckoutRequest, CheckoutService, OrderConfirmation, GATEWAY_FALLBACK_MESSAGE,
};
pub use payments::{CallbackOutcome, PaymentService};

/// Publishes events best-effort; failures are logged and dropped.
pub(crate) async fn publish_events(publisher: Option<&Arc<dyn EventPublisher>>, events: Vec<DomainEvent>) {
    let Some(publisher) = publisher else { return };
    for event in events {
        if let Err(e) = publisher.publish(&event).await {
            tracing::warn!(subject = event.subject(), error = %e, "dropping domain event");
        }
    }
}
