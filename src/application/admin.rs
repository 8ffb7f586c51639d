//! Back-office order management.

use serde::Serialize;
use std::sync::Arc;
use crate::application::publish_events;
use crate::domain::aggregates::{Order, OrderStatus, PaymentStatus};
use crate::domain::ports::{EventPublisher, OrderFilter, OrderRepository};
use crate::domain::value_objects::OrderId;
use crate::{Result, StorefrontError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub total: usize,
    pub not_yet_shipped: usize,
    pub shipped: usize,
    pub delivered: usize,
}

impl OrderStats {
    fn count(&mut self, status: OrderStatus) {
        self.total += 1;
        match status {
            OrderStatus::NotYetShipped => self.not_yet_shipped += 1,
            OrderStatus::Shipped => self.shipped += 1,
            OrderStatus::Delivered => self.delivered += 1,
        }
    }
}

pub struct AdminService {
    orders: Arc<dyn OrderRepository>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl AdminService {
    pub fn new(orders: Arc<dyn OrderRepository>, events: Option<Arc<dyn EventPublisher>>) -> Self {
        Self { orders, events }
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        Ok(self.orders.list_orders(filter).await?)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order> {
        let id = OrderId::new(order_id)?;
        self.load(&id).await
    }

    pub async fn stats(&self) -> Result<OrderStats> {
        let orders = self.orders.list_orders(&OrderFilter::default()).await?;
        let mut stats = OrderStats::default();
        for order in &orders {
            stats.count(order.order_status());
        }
        Ok(stats)
    }

    /// Last write wins; setting the current status is a no-op.
    pub async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order> {
        let id = OrderId::new(order_id)?;
        let mut order = self.load(&id).await?;
        if order.set_order_status(status) {
            self.orders.update_order_status(&id, status).await?;
            tracing::info!(order_id = %id, order_status = %status, "order status updated");
            publish_events(self.events.as_ref(), order.take_events()).await;
        }
        Ok(order)
    }

    pub async fn set_payment_status(&self, order_id: &str, status: PaymentStatus) -> Result<Order> {
        let id = OrderId::new(order_id)?;
        let mut order = self.load(&id).await?;
        if order.set_payment_status(status) {
            self.orders.update_payment_status(&id, status).await?;
            tracing::info!(order_id = %id, payment_status = %status, "payment status updated");
            publish_events(self.events.as_ref(), order.take_events()).await;
        }
        Ok(order)
    }

    async fn load(&self, id: &OrderId) -> Result<Order> {
        self.orders
            .get_order(id)
            .await?
            .ok_or_else(|| StorefrontError::OrderNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use tokio::sync::Mutex;
    use uuid::Uuid;
    use crate::domain::aggregates::{Cart, Customer, LineItem};
    use crate::domain::events::DomainEvent;
    use crate::domain::ports::PublishError;
    use crate::domain::services::{pricing, CourierService, PaymentMethod};
    use crate::infrastructure::InMemoryOrderRepository;

    #[derive(Default)]
    struct RecordingPublisher(Mutex<Vec<&'static str>>);

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: &DomainEvent) -> std::result::Result<(), PublishError> {
            self.0.lock().await.push(event.subject());
            Ok(())
        }
    }

    async fn place(repo: &InMemoryOrderRepository, id: &str, name: &str) {
        let cart = Cart::from_items(vec![LineItem::new(Uuid::new_v4(), "Face Cream", Decimal::from(300), 1)]);
        let pricing = pricing::resolve(&cart, PaymentMethod::CashOnDelivery, CourierService::PostalService).unwrap();
        let customer = Customer { name: name.into(), phone: "9123456780".into(), ..Customer::default() };
        let order = Order::place(OrderId::new(id).unwrap(), customer, cart, PaymentMethod::CashOnDelivery, CourierService::PostalService, pricing);
        repo.create_order(&order).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_updates_and_stats() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        place(&repo, "XCA1", "Meera").await;
        place(&repo, "XCA2", "Kiran").await;
        let publisher = Arc::new(RecordingPublisher::default());
        let svc = AdminService::new(repo.clone(), Some(publisher.clone() as Arc<dyn EventPublisher>));

        let updated = svc.set_order_status("xca1", OrderStatus::Shipped).await.unwrap();
        assert_eq!(updated.order_status(), OrderStatus::Shipped);
        svc.set_order_status("XCA1", OrderStatus::Shipped).await.unwrap();
        svc.set_payment_status("XCA2", PaymentStatus::Paid).await.unwrap();

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats, OrderStats { total: 2, not_yet_shipped: 1, shipped: 1, delivered: 0 });
        assert_eq!(
            *publisher.0.lock().await,
            vec!["storefront.orders.status_changed", "storefront.orders.payment_status_changed"]
        );
    }

    #[tokio::test]
    async fn test_filter_and_search() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        place(&repo, "XCB1", "Meera").await;
        place(&repo, "XCB2", "Kiran").await;
        let svc = AdminService::new(repo, None);
        svc.set_order_status("XCB2", OrderStatus::Delivered).await.unwrap();

        let delivered = svc.list_orders(&OrderFilter { order_status: Some(OrderStatus::Delivered), search: None }).await.unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].order_id().as_str(), "XCB2");

        let found = svc.list_orders(&OrderFilter { order_status: None, search: Some("meer".into()) }).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].customer().name, "Meera");
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let svc = AdminService::new(Arc::new(InMemoryOrderRepository::new()), None);
        assert!(matches!(svc.get_order("XCZZ").await, Err(StorefrontError::OrderNotFound(_))));
        assert!(matches!(svc.set_order_status("XCZZ", OrderStatus::Shipped).await, Err(StorefrontError::OrderNotFound(_))));
    }
}
