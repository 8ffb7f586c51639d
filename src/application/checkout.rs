//! Checkout: price the cart, allocate an order id, open a payment session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use crate::application::publish_events;
use crate::domain::aggregates::{Cart, Customer, LineItem, Order, OrderStatus, PaymentStatus};
use crate::domain::ports::{
    CatalogRepository, EmailError, EmailSender, EventPublisher, OrderRepository, PaymentGateway,
    PaymentSessionRequest, RepositoryError,
};
use crate::domain::services::{pricing, CourierService, OrderIdGenerator, PaymentMethod, PricingError};
use crate::domain::value_objects::{Money, OrderId};
use crate::{Result, StorefrontError};

pub const GATEWAY_FALLBACK_MESSAGE: &str = "Payment gateway error. Order placed as COD.";

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    #[validate(length(min = 10, max = 15))]
    pub customer_phone: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1))]
    pub shipping_address: String,
    #[validate(length(min = 1))]
    pub items: Vec<CheckoutItem>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub courier_service: Option<CourierService>,
}

/// Prices are looked up from the catalog; clients only choose what and how many.
/// Quantity is signed so that a negative count reaches the cart check instead of
/// failing deserialization.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub quantity: i64,
}

impl CheckoutItem {
    fn checked_quantity(&self) -> std::result::Result<u32, PricingError> {
        if self.quantity < 1 {
            return Err(PricingError::InvalidCart(format!("quantity for {} must be at least 1", self.product_id)));
        }
        u32::try_from(self.quantity)
            .map_err(|_| PricingError::InvalidCart(format!("quantity for {} is too large", self.product_id)))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub subtotal: Money,
    pub shipping_charge: Money,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Public view of a placed order. Contact details and the gateway reference
/// stay behind the admin API.
#[derive(Clone, Debug, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub shipping_charge: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub courier_service: CourierService,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderConfirmation {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id().clone(),
            customer_name: order.customer().name.clone(),
            items: order.items().to_vec(),
            subtotal: order.subtotal().clone(),
            shipping_charge: order.shipping_charge().clone(),
            total: order.total().clone(),
            payment_method: order.payment_method(),
            courier_service: order.courier_service(),
            payment_status: order.payment_status(),
            order_status: order.order_status(),
            created_at: order.created_at(),
        }
    }
}

pub struct CheckoutService {
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogRepository>,
    gateway: Arc<dyn PaymentGateway>,
    email: Arc<dyn EmailSender>,
    events: Option<Arc<dyn EventPublisher>>,
    ids: OrderIdGenerator,
    max_attempts: u32,
    public_base_url: String,
}

impl CheckoutService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogRepository>,
        gateway: Arc<dyn PaymentGateway>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            orders, catalog, gateway, email, events: None,
            ids: OrderIdGenerator::default(),
            max_attempts: 3,
            public_base_url: "http://localhost:3000".to_string(),
        }
    }

    pub fn with_events(mut self, events: Option<Arc<dyn EventPublisher>>) -> Self {
        self.events = events;
        self
    }

    pub fn with_id_generator(mut self, ids: OrderIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn place_order(&self, request: CheckoutRequest) -> Result<CheckoutReceipt> {
        request.validate()?;

        let cart = self.build_cart(&request.items).await?;
        let method = request.payment_method;
        let courier = request.courier_service.unwrap_or_else(|| CourierService::default_for(method));
        let pricing = pricing::resolve(&cart, method, courier)?;

        let customer = Customer {
            name: request.customer_name.trim().to_string(),
            phone: request.customer_phone.trim().to_string(),
            email: request.customer_email.trim().to_string(),
            shipping_address: request.shipping_address.trim().to_string(),
        };
        let mut order = Order::place(self.ids.generate(), customer, cart, method, courier, pricing);
        self.insert_with_retry(&mut order).await?;
        order.confirm_placed();

        tracing::info!(
            order_id = %order.order_id(),
            payment_method = %method,
            courier = %courier,
            total = %order.total().amount(),
            "order placed"
        );

        let mut receipt = CheckoutReceipt {
            order_id: order.order_id().clone(),
            subtotal: order.subtotal().clone(),
            shipping_charge: order.shipping_charge().clone(),
            total: order.total().clone(),
            payment_session_id: None,
            message: None,
        };

        if method == PaymentMethod::Online {
            match self.open_payment_session(&mut order).await {
                Some(session_id) => receipt.payment_session_id = Some(session_id),
                None => receipt.message = Some(GATEWAY_FALLBACK_MESSAGE.to_string()),
            }
        }

        match self.email.send_order_confirmation(&order).await {
            Ok(()) => tracing::debug!(order_id = %order.order_id(), "confirmation e-mail sent"),
            Err(EmailError::NotConfigured) => {
                tracing::warn!(order_id = %order.order_id(), "e-mail not configured, skipping confirmation")
            }
            Err(e) => tracing::warn!(order_id = %order.order_id(), error = %e, "confirmation e-mail failed"),
        }

        publish_events(self.events.as_ref(), order.take_events()).await;
        Ok(receipt)
    }

    pub async fn order_confirmation(&self, order_id: &str) -> Result<OrderConfirmation> {
        let id = OrderId::new(order_id)?;
        self.orders
            .get_order(&id)
            .await?
            .map(|order| OrderConfirmation::from(&order))
            .ok_or_else(|| StorefrontError::OrderNotFound(id.to_string()))
    }

    /// Every request line is checked before lines for the same product are merged.
    async fn build_cart(&self, items: &[CheckoutItem]) -> Result<Cart> {
        let quantities = items.iter().map(CheckoutItem::checked_quantity).collect::<std::result::Result<Vec<_>, _>>()?;
        let mut cart = Cart::new();
        for (item, quantity) in items.iter().zip(quantities) {
            let product = self
                .catalog
                .get_product(item.product_id)
                .await?
                .ok_or_else(|| StorefrontError::ProductNotFound(item.product_id.to_string()))?;
            if !product.in_stock {
                return Err(StorefrontError::OutOfStock(product.name));
            }
            let unit_price = product.price().amount();
            cart.add_item(LineItem::new(product.id, product.name, unit_price, quantity));
        }
        Ok(cart)
    }

    async fn insert_with_retry(&self, order: &mut Order) -> Result<()> {
        let mut attempt = 1;
        loop {
            match self.orders.create_order(order).await {
                Ok(()) => return Ok(()),
                Err(RepositoryError::DuplicateKey(id)) if attempt < self.max_attempts => {
                    tracing::warn!(order_id = %id, attempt, "order id collision, regenerating");
                    order.reassign_id(self.ids.generate());
                    attempt += 1;
                }
                Err(RepositoryError::DuplicateKey(id)) => {
                    tracing::error!(order_id = %id, attempts = attempt, "giving up on order id allocation");
                    return Err(StorefrontError::IdentifierCollision(attempt));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Returns the session id, or `None` when the order falls back to cash on delivery.
    async fn open_payment_session(&self, order: &mut Order) -> Option<String> {
        let request = PaymentSessionRequest {
            order_id: order.order_id().clone(),
            amount: order.total().amount(),
            currency: order.total().currency().to_string(),
            customer: order.customer().clone(),
            return_url: format!("{}/api/v1/payment/callback?order_id={}", self.public_base_url, order.order_id()),
        };
        let session = match self.gateway.create_payment_session(&request).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(order_id = %order.order_id(), error = %e, "payment gateway failed, falling back to COD");
                return None;
            }
        };
        if let Some(reference) = session.gateway_order_id.as_deref() {
            order.attach_gateway_order(reference);
            if let Err(e) = self.orders.set_gateway_order_id(order.order_id(), reference).await {
                tracing::warn!(order_id = %order.order_id(), error = %e, "could not store gateway reference");
            }
        }
        Some(session.session_id)
    }
}
