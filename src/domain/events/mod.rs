//! Domain events
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use crate::domain::aggregates::order::{OrderStatus, PaymentStatus};
use crate::domain::services::pricing::PaymentMethod;
use crate::domain::value_objects::OrderId;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Order(OrderEvent),
    Catalog(CatalogEvent),
}

impl DomainEvent {
    /// NATS subject the event is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Order(OrderEvent::Placed { .. }) => "storefront.orders.placed",
            Self::Order(OrderEvent::PaymentConfirmed { .. }) => "storefront.orders.payment_confirmed",
            Self::Order(OrderEvent::PaymentFailed { .. }) => "storefront.orders.payment_failed",
            Self::Order(OrderEvent::PaymentStatusChanged { .. }) => "storefront.orders.payment_status_changed",
            Self::Order(OrderEvent::StatusChanged { .. }) => "storefront.orders.status_changed",
            Self::Catalog(CatalogEvent::ReviewSubmitted { .. }) => "storefront.catalog.review_submitted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: OrderId, payment_method: PaymentMethod, total: Decimal },
    PaymentConfirmed { order_id: OrderId },
    PaymentFailed { order_id: OrderId },
    PaymentStatusChanged { order_id: OrderId, from: PaymentStatus, to: PaymentStatus },
    StatusChanged { order_id: OrderId, from: OrderStatus, to: OrderStatus },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    ReviewSubmitted { review_id: Uuid, product_id: Uuid, rating: u8 },
}
