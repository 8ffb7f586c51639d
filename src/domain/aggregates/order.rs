//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::domain::aggregates::cart::{Cart, LineItem};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::services::pricing::{CourierService, PaymentMethod, PricingResult};
use crate::domain::value_objects::{Money, OrderId, ValueError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus { #[default] Pending, Paid, Failed }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus { #[default] NotYetShipped, Shipped, Delivered }

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Pending => "pending", Self::Paid => "paid", Self::Failed => "failed" }
    }
}

impl FromStr for PaymentStatus {
    type Err = ValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(ValueError::UnknownVariant { kind: "payment status", value: other.to_string() }),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self { Self::NotYetShipped => "not_yet_shipped", Self::Shipped => "shipped", Self::Delivered => "delivered" }
    }
}

impl FromStr for OrderStatus {
    type Err = ValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_yet_shipped" => Ok(Self::NotYetShipped),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            other => Err(ValueError::UnknownVariant { kind: "order status", value: other.to_string() }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub shipping_address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub(crate) order_id: OrderId,
    pub(crate) customer: Customer,
    pub(crate) items: Vec<LineItem>,
    pub(crate) subtotal: Money,
    pub(crate) shipping_charge: Money,
    pub(crate) total: Money,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) courier_service: CourierService,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) order_status: OrderStatus,
    pub(crate) gateway_order_id: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) events: Vec<DomainEvent>,
}

impl Order {
    /// Seeds a new order from a resolved price. The `Placed` event is raised
    /// by [`Order::confirm_placed`] once the id has been accepted by the store.
    pub fn place(
        order_id: OrderId,
        customer: Customer,
        cart: Cart,
        payment_method: PaymentMethod,
        courier_service: CourierService,
        pricing: PricingResult,
    ) -> Self {
        let now = Utc::now();
        Self {
            order_id, customer, items: cart.into_items(),
            subtotal: pricing.subtotal, shipping_charge: pricing.shipping_charge, total: pricing.total,
            payment_method, courier_service,
            payment_status: pricing.initial_payment_status, order_status: pricing.initial_order_status,
            gateway_order_id: None, created_at: now, updated_at: now, events: vec![],
        }
    }

    pub fn order_id(&self) -> &OrderId { &self.order_id }
    pub fn customer(&self) -> &Customer { &self.customer }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn subtotal(&self) -> &Money { &self.subtotal }
    pub fn shipping_charge(&self) -> &Money { &self.shipping_charge }
    pub fn total(&self) -> &Money { &self.total }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn courier_service(&self) -> CourierService { self.courier_service }
    pub fn payment_status(&self) -> PaymentStatus { self.payment_status }
    pub fn order_status(&self) -> OrderStatus { self.order_status }
    pub fn gateway_order_id(&self) -> Option<&str> { self.gateway_order_id.as_deref() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Swaps in a fresh id after the store rejected the previous one.
    pub fn reassign_id(&mut self, order_id: OrderId) { self.order_id = order_id; }

    pub fn confirm_placed(&mut self) {
        self.raise_event(DomainEvent::Order(OrderEvent::Placed {
            order_id: self.order_id.clone(), payment_method: self.payment_method, total: self.total.amount(),
        }));
    }

    pub fn attach_gateway_order(&mut self, gateway_order_id: impl Into<String>) {
        self.gateway_order_id = Some(gateway_order_id.into());
        self.touch();
    }

    pub fn mark_paid(&mut self) {
        self.payment_status = PaymentStatus::Paid;
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::PaymentConfirmed { order_id: self.order_id.clone() }));
    }

    pub fn mark_payment_failed(&mut self) {
        self.payment_status = PaymentStatus::Failed;
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::PaymentFailed { order_id: self.order_id.clone() }));
    }

    /// Admin override of the payment status. Returns false when nothing changed.
    pub fn set_payment_status(&mut self, status: PaymentStatus) -> bool {
        if self.payment_status == status { return false; }
        let from = std::mem::replace(&mut self.payment_status, status);
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::PaymentStatusChanged { order_id: self.order_id.clone(), from, to: status }));
        true
    }

    /// Admin shipping update; any status may be set, last write wins.
    pub fn set_order_status(&mut self, status: OrderStatus) -> bool {
        if self.order_status == status { return false; }
        let from = std::mem::replace(&mut self.order_status, status);
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_id: self.order_id.clone(), from, to: status }));
        true
    }

    /// Case-insensitive match on order id, customer name or phone.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.order_id.as_str().to_lowercase().contains(&needle)
            || self.customer.name.to_lowercase().contains(&needle)
            || self.customer.phone.contains(&needle)
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::pricing;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn sample_order() -> Order {
        let cart = Cart::from_items(vec![LineItem::new(Uuid::new_v4(), "Lip Balm", Decimal::from(250), 2)]);
        let pricing = pricing::resolve(&cart, PaymentMethod::Online, CourierService::ExpressCourier).unwrap();
        let customer = Customer { name: "Asha Rao".into(), phone: "9876543210".into(), email: "asha@example.com".into(), shipping_address: "12 MG Road, Pune".into() };
        Order::place(OrderId::new("XC1").unwrap(), customer, cart, PaymentMethod::Online, CourierService::ExpressCourier, pricing)
    }

    #[test]
    fn test_order_workflow() {
        let mut order = sample_order();
        assert_eq!(order.total().amount(), Decimal::from(560));
        assert_eq!(order.payment_status(), PaymentStatus::Pending);
        assert_eq!(order.order_status(), OrderStatus::NotYetShipped);
        order.confirm_placed();
        order.mark_paid();
        assert!(order.set_order_status(OrderStatus::Shipped));
        assert!(!order.set_order_status(OrderStatus::Shipped));
        assert_eq!(order.order_status(), OrderStatus::Shipped);
        let events = order.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], DomainEvent::Order(OrderEvent::Placed { .. })));
        assert!(order.take_events().is_empty());
    }

    #[test]
    fn test_payment_failure_and_admin_override() {
        let mut order = sample_order();
        order.mark_payment_failed();
        assert_eq!(order.payment_status(), PaymentStatus::Failed);
        assert!(order.set_payment_status(PaymentStatus::Paid));
        assert_eq!(order.payment_status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_search() {
        let order = sample_order();
        assert!(order.matches_search("asha"));
        assert!(order.matches_search("xc1"));
        assert!(order.matches_search("98765"));
        assert!(!order.matches_search("ravi"));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!("not_yet_shipped".parse::<OrderStatus>().unwrap(), OrderStatus::NotYetShipped);
        assert_eq!(serde_json::to_string(&PaymentStatus::Failed).unwrap(), "\"failed\"");
        assert!("lost".parse::<OrderStatus>().is_err());
    }
}
