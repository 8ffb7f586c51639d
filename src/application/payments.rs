//! Reconciles an order with the gateway when the buyer returns from checkout.

use std::sync::Arc;
use crate::application::publish_events;
use crate::domain::aggregates::PaymentStatus;
use crate::domain::ports::{EventPublisher, GatewayPaymentStatus, OrderRepository, PaymentGateway};
use crate::domain::value_objects::OrderId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    MissingOrderId,
    Paid(OrderId),
    Failed(OrderId),
    /// The gateway has no attempt on record yet; the order is left as is.
    NoAttempts(OrderId),
    VerificationFailed,
}

impl CallbackOutcome {
    /// Storefront page the buyer is sent to.
    pub fn redirect_path(&self) -> String {
        match self {
            Self::MissingOrderId => "/cart".to_string(),
            Self::Paid(id) | Self::NoAttempts(id) => format!("/order-confirmation/{id}"),
            Self::Failed(id) => format!("/checkout?error=payment_failed&order_id={id}"),
            Self::VerificationFailed => "/checkout?error=verification_failed".to_string(),
        }
    }
}

pub struct PaymentService {
    orders: Arc<dyn OrderRepository>,
    gateway: Arc<dyn PaymentGateway>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl PaymentService {
    pub fn new(orders: Arc<dyn OrderRepository>, gateway: Arc<dyn PaymentGateway>, events: Option<Arc<dyn EventPublisher>>) -> Self {
        Self { orders, gateway, events }
    }

    /// Never fails: every error ends up as a redirect.
    pub async fn handle_callback(&self, order_id: Option<&str>) -> CallbackOutcome {
        let Some(id) = order_id.and_then(|raw| OrderId::new(raw).ok()) else {
            return CallbackOutcome::MissingOrderId;
        };

        let attempts = match self.gateway.fetch_payment_status(&id).await {
            Ok(attempts) => attempts,
            Err(e) => {
                tracing::error!(order_id = %id, error = %e, "payment verification failed");
                return CallbackOutcome::VerificationFailed;
            }
        };
        let Some(last) = attempts.last().copied() else {
            tracing::info!(order_id = %id, "no payment attempts yet");
            return CallbackOutcome::NoAttempts(id);
        };

        let mut order = match self.orders.get_order(&id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                tracing::warn!(order_id = %id, "payment callback for unknown order");
                return CallbackOutcome::VerificationFailed;
            }
            Err(e) => {
                tracing::error!(order_id = %id, error = %e, "could not load order");
                return CallbackOutcome::VerificationFailed;
            }
        };

        let paid = last == GatewayPaymentStatus::Success;
        let status = if paid {
            order.mark_paid();
            PaymentStatus::Paid
        } else {
            order.mark_payment_failed();
            PaymentStatus::Failed
        };
        if let Err(e) = self.orders.update_payment_status(&id, status).await {
            tracing::error!(order_id = %id, error = %e, "could not record payment status");
            return CallbackOutcome::VerificationFailed;
        }
        tracing::info!(order_id = %id, payment_status = %status, "payment reconciled");
        publish_events(self.events.as_ref(), order.take_events()).await;

        if paid { CallbackOutcome::Paid(id) } else { CallbackOutcome::Failed(id) }
    }
}
